use crate::config::Config;
use crate::domain::ports::{
    InvitationRepository, JobRepository, NotificationRepository, ProjectRepository,
};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub project_repo: Arc<dyn ProjectRepository>,
    pub invitation_repo: Arc<dyn InvitationRepository>,
    pub job_repo: Arc<dyn JobRepository>,
    pub notification_repo: Arc<dyn NotificationRepository>,
}
