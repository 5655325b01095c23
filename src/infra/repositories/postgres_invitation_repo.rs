use crate::domain::{
    models::{actor::UserType, invitation::Invitation, job_record::JobRecord, notification::Notification},
    ports::InvitationRepository,
};
use crate::error::AppError;
use crate::infra::repositories::postgres_job_repo::insert_job;
use crate::infra::repositories::postgres_notification_repo::insert_notification;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

pub struct PostgresInvitationRepo {
    pool: PgPool,
}

impl PostgresInvitationRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InvitationRepository for PostgresInvitationRepo {
    async fn create(&self, invitation: &Invitation, notification: &Notification) -> Result<Invitation, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        let created = sqlx::query_as::<_, Invitation>(
            "INSERT INTO invitations (id, project_id, company_id, worker_id, status, wage_amount, original_wage, wage_unit, message, response_note, responded_at, expires_at, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
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
        sqlx::query_as::<_, Invitation>("SELECT * FROM invitations WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_pending(&self, project_id: &str, worker_id: &str) -> Result<Option<Invitation>, AppError> {
        sqlx::query_as::<_, Invitation>(
            "SELECT * FROM invitations WHERE project_id = $1 AND worker_id = $2 AND status = 'pending'"
        )
            .bind(project_id).bind(worker_id)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_for(&self, user_id: &str, user_type: UserType) -> Result<Vec<Invitation>, AppError> {
        let query = match user_type {
            UserType::Company => "SELECT * FROM invitations WHERE company_id = $1 ORDER BY created_at DESC",
            UserType::Worker => "SELECT * FROM invitations WHERE worker_id = $1 ORDER BY created_at DESC",
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

        let responded = sqlx::query_as::<_, Invitation>(
            "UPDATE invitations SET status = $1, response_note = $2, responded_at = $3
             WHERE id = $4 AND status = 'pending'
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
            "UPDATE invitations SET status = 'expired' WHERE id = $1 AND status = 'pending'"
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
            "SELECT * FROM invitations WHERE status = 'pending' AND expires_at < $1 ORDER BY expires_at ASC LIMIT 200"
        )
            .bind(now)
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }
}
