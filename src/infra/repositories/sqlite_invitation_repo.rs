use crate::domain::{
    models::{actor::UserType, invitation::Invitation, job_record::JobRecord, notification::Notification},
    ports::InvitationRepository,
};
use crate::error::AppError;
use crate::infra::repositories::sqlite_job_repo::insert_job;
use crate::infra::repositories::sqlite_notification_repo::insert_notification;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

pub struct SqliteInvitationRepo {
    pool: SqlitePool,
}

impl SqliteInvitationRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InvitationRepository for SqliteInvitationRepo {
    async fn create(&self, invitation: &Invitation, notification: &Notification) -> Result<Invitation, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        let created = sqlx::query_as::<_, Invitation>(
            "INSERT INTO invitations (id, project_id, company_id, worker_id, status, wage_amount, original_wage, wage_unit, message, response_note, responded_at, expires_at, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *"
        )
            .bind(&invitation.id).bind(&invitation.project_id).bind(&invitation.company_id)
            .bind(&invitation.worker_id).bind(invitation.status).bind(invitation.wage_amount)
            .bind(invitation.original_wage).bind(invitation.wage_unit).bind(&invitation.message)
            .bind(&invitation.response_note).bind(invitation.responded_at)
            .bind(invitation.expires_at).bind(invitation.created_at)
            .fetch_one(&mut *tx).await.map_err(AppError::Database)?;

        insert_notification(&mut *tx, notification).await?;
        tx.commit().await.map_err(AppError::Database)?;
        Ok(created)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Invitation>, AppError> {
        sqlx::query_as::<_, Invitation>("SELECT * FROM invitations WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_pending(&self, project_id: &str, worker_id: &str) -> Result<Option<Invitation>, AppError> {
        sqlx::query_as::<_, Invitation>(
            "SELECT * FROM invitations WHERE project_id = ? AND worker_id = ? AND status = 'pending'"
        )
            .bind(project_id).bind(worker_id)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_for(&self, user_id: &str, user_type: UserType) -> Result<Vec<Invitation>, AppError> {
        let query = match user_type {
            UserType::Company => "SELECT * FROM invitations WHERE company_id = ? ORDER BY created_at DESC",
            UserType::Worker => "SELECT * FROM invitations WHERE worker_id = ? ORDER BY created_at DESC",
        };
        sqlx::query_as::<_, Invitation>(query)
            .bind(user_id)
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn respond(
        &self,
        updated: &Invitation,
        job: Option<&JobRecord>,
        notification: &Notification,
    ) -> Result<Invitation, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        // The status guard is the race arbiter: of two concurrent responses
        // only one finds the row still pending.
        let responded = sqlx::query_as::<_, Invitation>(
            "UPDATE invitations SET status = ?, response_note = ?, responded_at = ?
             WHERE id = ? AND status = 'pending'
             RETURNING *"
        )
            .bind(updated.status).bind(&updated.response_note).bind(updated.responded_at)
            .bind(&updated.id)
            .fetch_optional(&mut *tx).await.map_err(AppError::Database)?
            .ok_or(AppError::AlreadyResponded)?;

        if let Some(job) = job {
            insert_job(&mut *tx, job).await?;
        }
        insert_notification(&mut *tx, notification).await?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok(responded)
    }

    async fn expire(&self, invitation_id: &str, notification: &Notification) -> Result<bool, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let result = sqlx::query(
            "UPDATE invitations SET status = 'expired' WHERE id = ? AND status = 'pending'"
        )
            .bind(invitation_id)
            .execute(&mut *tx).await.map_err(AppError::Database)?;

        if result.rows_affected() == 0 {
            return Ok(false);
        }

        insert_notification(&mut *tx, notification).await?;
        tx.commit().await.map_err(AppError::Database)?;
        Ok(true)
    }

    async fn find_expired_pending(&self, now: DateTime<Utc>) -> Result<Vec<Invitation>, AppError> {
        sqlx::query_as::<_, Invitation>(
            "SELECT * FROM invitations WHERE status = 'pending' AND expires_at < ? ORDER BY expires_at ASC LIMIT 200"
        )
            .bind(now)
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }
}
