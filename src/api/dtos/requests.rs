use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::domain::models::job_record::JobStatus;
use crate::domain::models::project::WageUnit;
use crate::domain::services::lifecycle::TransitionPayload;

#[derive(Deserialize)]
pub struct CreateProjectRequest {
    pub title: String,
    pub wage_amount: f64,
    pub wage_unit: WageUnit,
    pub required_workers: i32,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

#[derive(Deserialize)]
pub struct CreateInvitationRequest {
    pub project_id: String,
    pub worker_id: String,
    pub message: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum InvitationDecision {
    Accept,
    Reject,
}

#[derive(Deserialize)]
pub struct RespondInvitationRequest {
    pub decision: InvitationDecision,
    pub note: Option<String>,
}

#[derive(Deserialize)]
pub struct TransitionJobRequest {
    pub target_state: JobStatus,
    #[serde(default)]
    pub payload: TransitionPayload,
}

#[derive(Deserialize)]
pub struct ConfirmJobRequest {
    pub notes: Option<String>,
    pub quality_rating: Option<i32>,
}

#[derive(Deserialize)]
pub struct ListNotificationsQuery {
    pub is_read: Option<bool>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}
