use serde::Serialize;

use crate::domain::models::invitation::Invitation;
use crate::domain::models::job_record::JobRecord;
use crate::domain::models::notification::Notification;
use crate::domain::models::project::Project;
use crate::domain::services::wage::WageView;

/// Every wage-bearing payload carries the server-computed `wage` view so
/// clients never redo unit conversions.

#[derive(Serialize)]
pub struct ProjectView {
    #[serde(flatten)]
    pub project: Project,
    pub wage: WageView,
}

impl ProjectView {
    pub fn from(project: Project) -> Self {
        let wage = WageView::build(project.original_wage, project.wage_unit, project.daily_wage);
        Self { project, wage }
    }
}

#[derive(Serialize)]
pub struct InvitationView {
    #[serde(flatten)]
    pub invitation: Invitation,
    pub wage: WageView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,
}

impl InvitationView {
    pub fn from(invitation: Invitation) -> Self {
        let wage = WageView::build(invitation.original_wage, invitation.wage_unit, invitation.wage_amount);
        Self { invitation, wage, job_id: None }
    }

    pub fn with_job(invitation: Invitation, job_id: String) -> Self {
        let mut view = Self::from(invitation);
        view.job_id = Some(job_id);
        view
    }
}

#[derive(Serialize)]
pub struct JobView {
    #[serde(flatten)]
    pub job: JobRecord,
    pub wage: WageView,
}

impl JobView {
    pub fn from(job: JobRecord) -> Self {
        let wage = WageView::build(job.original_wage, job.wage_unit, job.wage_amount);
        Self { job, wage }
    }
}

#[derive(Serialize)]
pub struct NotificationListResponse {
    pub items: Vec<Notification>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}
