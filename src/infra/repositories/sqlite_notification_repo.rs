use crate::domain::{
    models::{actor::UserType, notification::Notification},
    ports::NotificationRepository,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Sqlite, SqlitePool};

pub struct SqliteNotificationRepo {
    pool: SqlitePool,
}

impl SqliteNotificationRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

/// Shared by the invitation and job repositories so the notification lands in
/// the same transaction as the state change that caused it.
pub(crate) async fn insert_notification<'e, E>(executor: E, n: &Notification) -> Result<(), AppError>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        "INSERT INTO notifications (id, user_id, user_type, sender_id, sender_type, notification_type, title, message, project_id, invitation_id, job_id, metadata, is_read, read_at, created_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
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
impl NotificationRepository for SqliteNotificationRepo {
    async fn list(
        &self,
        user_id: &str,
        user_type: UserType,
        is_read: Option<bool>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Notification>, AppError> {
        let query = if is_read.is_some() {
            "SELECT * FROM notifications WHERE user_id = ? AND user_type = ? AND is_read = ? ORDER BY created_at DESC LIMIT ? OFFSET ?"
        } else {
            "SELECT * FROM notifications WHERE user_id = ? AND user_type = ? ORDER BY created_at DESC LIMIT ? OFFSET ?"
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
            "SELECT COUNT(*) FROM notifications WHERE user_id = ? AND user_type = ? AND is_read = ?"
        } else {
            "SELECT COUNT(*) FROM notifications WHERE user_id = ? AND user_type = ?"
        };

        let mut q = sqlx::query_scalar::<_, i64>(query).bind(user_id).bind(user_type);
        if let Some(read) = is_read {
            q = q.bind(read);
        }
        q.fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn mark_read(&self, id: &str, user_id: &str, user_type: UserType) -> Result<Notification, AppError> {
        sqlx::query_as::<_, Notification>(
            "UPDATE notifications SET is_read = 1, read_at = COALESCE(read_at, ?)
             WHERE id = ? AND user_id = ? AND user_type = ?
             RETURNING *"
        )
            .bind(Utc::now()).bind(id).bind(user_id).bind(user_type)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)?
            .ok_or_else(|| AppError::NotFound("Notification not found".into()))
    }

    async fn mark_all_read(&self, user_id: &str, user_type: UserType) -> Result<u64, AppError> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = 1, read_at = ? WHERE user_id = ? AND user_type = ? AND is_read = 0"
        )
            .bind(Utc::now()).bind(user_id).bind(user_type)
            .execute(&self.pool).await.map_err(AppError::Database)?;
        Ok(result.rows_affected())
    }
}
