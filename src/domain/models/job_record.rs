use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::domain::models::invitation::Invitation;
use crate::domain::models::project::WageUnit;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Accepted,
    Arrived,
    Working,
    Completed,
    Confirmed,
    Paid,
    Cancelled,
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Paid | JobStatus::Cancelled)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Paid,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
    pub accuracy: f64,
}

/// The operational record of accepted work. Exactly one exists per accepted
/// invitation, created inside the acceptance transaction, and it is never
/// deleted; terminal states are retained for audit.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct JobRecord {
    pub id: String,
    pub invitation_id: String,
    pub project_id: String,
    pub company_id: String,
    pub worker_id: String,
    pub status: JobStatus,
    pub wage_amount: f64,
    pub original_wage: f64,
    pub wage_unit: WageUnit,
    pub arrival_time: Option<DateTime<Utc>>,
    pub arrival_location: Option<Json<GeoPoint>>,
    pub start_work_time: Option<DateTime<Utc>>,
    pub complete_time: Option<DateTime<Utc>>,
    pub confirm_time: Option<DateTime<Utc>>,
    /// Stored once at the `completed` transition, never recomputed.
    pub actual_hours: Option<f64>,
    pub completion_notes: Option<String>,
    pub work_photo_refs: Json<Vec<String>>,
    pub confirmation_notes: Option<String>,
    pub quality_rating: Option<i32>,
    pub payment_status: PaymentStatus,
    pub cancel_reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl JobRecord {
    pub fn from_accepted_invitation(invitation: &Invitation) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            invitation_id: invitation.id.clone(),
            project_id: invitation.project_id.clone(),
            company_id: invitation.company_id.clone(),
            worker_id: invitation.worker_id.clone(),
            status: JobStatus::Accepted,
            wage_amount: invitation.wage_amount,
            original_wage: invitation.original_wage,
            wage_unit: invitation.wage_unit,
            arrival_time: None,
            arrival_location: None,
            start_work_time: None,
            complete_time: None,
            confirm_time: None,
            actual_hours: None,
            completion_notes: None,
            work_photo_refs: Json(Vec::new()),
            confirmation_notes: None,
            quality_rating: None,
            payment_status: PaymentStatus::Pending,
            cancel_reason: None,
            created_at: Utc::now(),
        }
    }
}
