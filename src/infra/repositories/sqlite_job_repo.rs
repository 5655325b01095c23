use crate::domain::{
    models::{actor::UserType, job_record::{JobRecord, JobStatus}, notification::Notification},
    ports::JobRepository,
};
use crate::error::AppError;
use crate::infra::repositories::sqlite_notification_repo::insert_notification;
use async_trait::async_trait;
use sqlx::{Sqlite, SqlitePool};

pub struct SqliteJobRepo {
    pool: SqlitePool,
}

impl SqliteJobRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

/// Used by the invitation repository: the job record is born inside the
/// acceptance transaction, never independently.
pub(crate) async fn insert_job<'e, E>(executor: E, job: &JobRecord) -> Result<(), AppError>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        "INSERT INTO job_records (id, invitation_id, project_id, company_id, worker_id, status, wage_amount, original_wage, wage_unit, arrival_time, arrival_location, start_work_time, complete_time, confirm_time, actual_hours, completion_notes, work_photo_refs, confirmation_notes, quality_rating, payment_status, cancel_reason, created_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
    )
        .bind(&job.id).bind(&job.invitation_id).bind(&job.project_id)
        .bind(&job.company_id).bind(&job.worker_id).bind(job.status)
        .bind(job.wage_amount).bind(job.original_wage).bind(job.wage_unit)
        .bind(job.arrival_time).bind(&job.arrival_location).bind(job.start_work_time)
        .bind(job.complete_time).bind(job.confirm_time).bind(job.actual_hours)
        .bind(&job.completion_notes).bind(&job.work_photo_refs).bind(&job.confirmation_notes)
        .bind(job.quality_rating).bind(job.payment_status).bind(&job.cancel_reason)
        .bind(job.created_at)
        .execute(executor).await.map_err(AppError::Database)?;
    Ok(())
}

#[async_trait]
impl JobRepository for SqliteJobRepo {
    async fn find_by_id(&self, id: &str) -> Result<Option<JobRecord>, AppError> {
        sqlx::query_as::<_, JobRecord>("SELECT * FROM job_records WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_for(&self, user_id: &str, user_type: UserType) -> Result<Vec<JobRecord>, AppError> {
        let query = match user_type {
            UserType::Company => "SELECT * FROM job_records WHERE company_id = ? ORDER BY created_at DESC",
            UserType::Worker => "SELECT * FROM job_records WHERE worker_id = ? ORDER BY created_at DESC",
        };
        sqlx::query_as::<_, JobRecord>(query)
            .bind(user_id)
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn transition(
        &self,
        updated: &JobRecord,
        expected: JobStatus,
        notification: &Notification,
    ) -> Result<JobRecord, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        // Status-guarded update: a concurrent transition already moved the
        // record, so zero rows here is a state-machine violation, not a retry.
        let persisted = sqlx::query_as::<_, JobRecord>(
            "UPDATE job_records SET status = ?, arrival_time = ?, arrival_location = ?, start_work_time = ?, complete_time = ?, confirm_time = ?, actual_hours = ?, completion_notes = ?, work_photo_refs = ?, confirmation_notes = ?, quality_rating = ?, payment_status = ?, cancel_reason = ?
             WHERE id = ? AND status = ?
             RETURNING *"
        )
            .bind(updated.status).bind(updated.arrival_time).bind(&updated.arrival_location)
            .bind(updated.start_work_time).bind(updated.complete_time).bind(updated.confirm_time)
            .bind(updated.actual_hours).bind(&updated.completion_notes).bind(&updated.work_photo_refs)
            .bind(&updated.confirmation_notes).bind(updated.quality_rating).bind(updated.payment_status)
            .bind(&updated.cancel_reason)
            .bind(&updated.id).bind(expected)
            .fetch_optional(&mut *tx).await.map_err(AppError::Database)?
            .ok_or_else(|| AppError::InvalidTransition("Job state changed concurrently".into()))?;

        insert_notification(&mut *tx, notification).await?;
        tx.commit().await.map_err(AppError::Database)?;
        Ok(persisted)
    }
}
