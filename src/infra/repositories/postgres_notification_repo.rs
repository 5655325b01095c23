use crate::domain::{
    models::{actor::UserType, notification::Notification},
    ports::NotificationRepository,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{PgPool, Postgres};

pub struct PostgresNotificationRepo {
    pool: PgPool,
}

impl PostgresNotificationRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

pub(crate) async fn insert_notification<'e, E>(executor: E, n: &Notification) -> Result<(), AppError>
where
    E: sqlx::Executor<'e, Database = Postgres>,
{
    sqlx::query(
        "INSERT INTO notifications (id, user_id, user_type, sender_id, sender_type, notification_type, title, message, project_id, invitation_id, job_id, metadata, is_read, read_at, created_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)"
    )
        .bind(&n.id).bind(&n.user_id).bind(n.user_type)
        .bind(&n.sender_id).bind(n.sender_type).bind(n.notification_type)
        .bind(&n.title).bind(&n.message)
        .bind(&n.project_id).bind(&n.invitation_id).bind(&n.job_id)
        .bind(&n.metadata).bind(n.is_read).bind(n.read_at).bind(n.created_at)
        .execute(executor).await.map_err(AppError::Database)?;
    Ok(())
}

#[async_trait]
impl NotificationRepository for PostgresNotificationRepo {
    async fn list(
        &self,
        user_id: &str,
        user_type: UserType,
        is_read: Option<bool>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Notification>, AppError> {
        let query = if is_read.is_some() {
            "SELECT * FROM notifications WHERE user_id = $1 AND user_type = $2 AND is_read = $3 ORDER BY created_at DESC LIMIT $4 OFFSET $5"
        } else {
            "SELECT * FROM notifications WHERE user_id = $1 AND user_type = $2 ORDER BY created_at DESC LIMIT $3 OFFSET $4"
        };

        let mut q = sqlx::query_as::<_, Notification>(query).bind(user_id).bind(user_type);
        if let Some(read) = is_read {
            q = q.bind(read);
        }
        q.bind(limit).bind(offset)
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn count(&self, user_id: &str, user_type: UserType, is_read: Option<bool>) -> Result<i64, AppError> {
        let query = if is_read.is_some() {
            "SELECT COUNT(*) FROM notifications WHERE user_id = $1 AND user_type = $2 AND is_read = $3"
        } else {
            "SELECT COUNT(*) FROM notifications WHERE user_id = $1 AND user_type = $2"
        };

        let mut q = sqlx::query_scalar::<_, i64>(query).bind(user_id).bind(user_type);
        if let Some(read) = is_read {
            q = q.bind(read);
        }
        q.fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn mark_read(&self, id: &str, user_id: &str, user_type: UserType) -> Result<Notification, AppError> {
        sqlx::query_as::<_, Notification>(
            "UPDATE notifications SET is_read = TRUE, read_at = COALESCE(read_at, $1)
             WHERE id = $2 AND user_id = $3 AND user_type = $4
             RETURNING *"
        )
            .bind(Utc::now()).bind(id).bind(user_id).bind(user_type)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)?
            .ok_or_else(|| AppError::NotFound("Notification not found".into()))
    }

    async fn mark_all_read(&self, user_id: &str, user_type: UserType) -> Result<u64, AppError> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = TRUE, read_at = $1 WHERE user_id = $2 AND user_type = $3 AND is_read = FALSE"
        )
            .bind(Utc::now()).bind(user_id).bind(user_type)
            .execute(&self.pool).await.map_err(AppError::Database)?;
        Ok(result.rows_affected())
    }
}
