use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::domain::models::actor::UserType;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    InvitationReceived,
    InvitationAccepted,
    InvitationRejected,
    InvitationExpired,
    WorkerArrived,
    WorkStarted,
    WorkCompleted,
    WorkConfirmed,
    PaymentSent,
    JobCancelled,
}

/// A persisted in-app message addressed to one `(user_id, user_type)` pair.
/// Created only as a side effect of a lifecycle event, inside the same
/// transaction as the triggering state change; mutated only by the
/// read-state toggles.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Notification {
    pub id: String,
    pub user_id: String,
    pub user_type: UserType,
    pub sender_id: Option<String>,
    pub sender_type: Option<UserType>,
    pub notification_type: NotificationType,
    pub title: String,
    pub message: String,
    pub project_id: Option<String>,
    pub invitation_id: Option<String>,
    pub job_id: Option<String>,
    pub metadata: Option<Json<serde_json::Value>>,
    pub is_read: bool,
    pub read_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(
        user_id: String,
        user_type: UserType,
        notification_type: NotificationType,
        title: String,
        message: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id,
            user_type,
            sender_id: None,
            sender_type: None,
            notification_type,
            title,
            message,
            project_id: None,
            invitation_id: None,
            job_id: None,
            metadata: None,
            is_read: false,
            read_at: None,
            created_at: Utc::now(),
        }
    }
}
