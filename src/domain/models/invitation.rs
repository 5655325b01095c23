use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::domain::models::project::{Project, WageUnit};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum InvitationStatus {
    Pending,
    Accepted,
    Rejected,
    Expired,
    Cancelled,
}

impl InvitationStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, InvitationStatus::Pending)
    }
}

/// A company's offer to a worker for one project. The wage fields are a
/// snapshot of the project terms at creation time; later project edits must
/// not retroactively alter an outstanding offer.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Invitation {
    pub id: String,
    pub project_id: String,
    pub company_id: String,
    pub worker_id: String,
    pub status: InvitationStatus,
    /// Canonical daily figure, produced by the wage normalizer.
    pub wage_amount: f64,
    pub original_wage: f64,
    pub wage_unit: WageUnit,
    pub message: Option<String>,
    pub response_note: Option<String>,
    pub responded_at: Option<DateTime<Utc>>,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Invitation {
    pub fn new(project: &Project, worker_id: String, message: Option<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            project_id: project.id.clone(),
            company_id: project.company_id.clone(),
            worker_id,
            status: InvitationStatus::Pending,
            wage_amount: project.daily_wage,
            original_wage: project.original_wage,
            wage_unit: project.wage_unit,
            message,
            response_note: None,
            responded_at: None,
            expires_at,
            created_at: Utc::now(),
        }
    }
}
