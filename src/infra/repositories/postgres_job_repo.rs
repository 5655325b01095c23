use crate::domain::{
    models::{actor::UserType, job_record::{JobRecord, JobStatus}, notification::Notification},
    ports::JobRepository,
};
use crate::error::AppError;
use crate::infra::repositories::postgres_notification_repo::insert_notification;
use async_trait::async_trait;
use sqlx::{PgPool, Postgres};

pub struct PostgresJobRepo {
    pool: PgPool,
}

impl PostgresJobRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

pub(crate) async fn insert_job<'e, E>(executor: E, job: &JobRecord) -> Result<(), AppError>
where
    E: sqlx::Executor<'e, Database = Postgres>,
{
    sqlx::query(
        "INSERT INTO job_records (id, invitation_id, project_id, company_id, worker_id, status, wage_amount, original_wage, wage_unit, arrival_time, arrival_location, start_work_time, complete_time, confirm_time, actual_hours, completion_notes, work_photo_refs, confirmation_notes, quality_rating, payment_status, cancel_reason, created_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19, $20, $21, $22)"
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
impl JobRepository for PostgresJobRepo {
    async fn find_by_id(&self, id: &str) -> Result<Option<JobRecord>, AppError> {
        sqlx::query_as::<_, JobRecord>("SELECT * FROM job_records WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_for(&self, user_id: &str, user_type: UserType) -> Result<Vec<JobRecord>, AppError> {
        let query = match user_type {
            UserType::Company => "SELECT * FROM job_records WHERE company_id = $1 ORDER BY created_at DESC",
            UserType::Worker => "SELECT * FROM job_records WHERE worker_id = $1 ORDER BY created_at DESC",
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

        let persisted = sqlx::query_as::<_, JobRecord>(
            "UPDATE job_records SET status = $1, arrival_time = $2, arrival_location = $3, start_work_time = $4, complete_time = $5, confirm_time = $6, actual_hours = $7, completion_notes = $8, work_photo_refs = $9, confirmation_notes = $10, quality_rating = $11, payment_status = $12, cancel_reason = $13
             WHERE id = $14 AND status = $15
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
