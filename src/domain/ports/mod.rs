use crate::domain::models::{
    actor::UserType,
    invitation::Invitation,
    job_record::{JobRecord, JobStatus},
    notification::Notification,
    project::Project,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[async_trait]
pub trait ProjectRepository: Send + Sync {
    async fn create(&self, project: &Project) -> Result<Project, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Project>, AppError>;
    async fn list_by_company(&self, company_id: &str) -> Result<Vec<Project>, AppError>;
}

#[async_trait]
pub trait InvitationRepository: Send + Sync {
    /// Persists the invitation together with the worker's notification in one
    /// transaction. The partial unique index on pending rows backs up the
    /// application-level duplicate check.
    async fn create(&self, invitation: &Invitation, notification: &Notification) -> Result<Invitation, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Invitation>, AppError>;
    async fn find_pending(&self, project_id: &str, worker_id: &str) -> Result<Option<Invitation>, AppError>;
    async fn list_for(&self, user_id: &str, user_type: UserType) -> Result<Vec<Invitation>, AppError>;
    /// Applies the worker's response with a status-guarded update
    /// (`WHERE status = 'pending'`); a miss is `AlreadyResponded`. On accept
    /// the job record and the company notification are written in the same
    /// transaction.
    async fn respond(
        &self,
        updated: &Invitation,
        job: Option<&JobRecord>,
        notification: &Notification,
    ) -> Result<Invitation, AppError>;
    /// CAS-flips one pending invitation to expired and writes the company
    /// notification. Returns false (and writes nothing) when another sweep or
    /// response got there first.
    async fn expire(&self, invitation_id: &str, notification: &Notification) -> Result<bool, AppError>;
    async fn find_expired_pending(&self, now: DateTime<Utc>) -> Result<Vec<Invitation>, AppError>;
}

#[async_trait]
pub trait JobRepository: Send + Sync {
    async fn find_by_id(&self, id: &str) -> Result<Option<JobRecord>, AppError>;
    async fn list_for(&self, user_id: &str, user_type: UserType) -> Result<Vec<JobRecord>, AppError>;
    /// Persists a validated transition with a status-guarded update plus the
    /// counterparty notification, all in one transaction. Zero rows affected
    /// means a concurrent transition won and surfaces as `InvalidTransition`.
    async fn transition(
        &self,
        updated: &JobRecord,
        expected: JobStatus,
        notification: &Notification,
    ) -> Result<JobRecord, AppError>;
}

#[async_trait]
pub trait NotificationRepository: Send + Sync {
    async fn list(
        &self,
        user_id: &str,
        user_type: UserType,
        is_read: Option<bool>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Notification>, AppError>;
    async fn count(&self, user_id: &str, user_type: UserType, is_read: Option<bool>) -> Result<i64, AppError>;
    async fn mark_read(&self, id: &str, user_id: &str, user_type: UserType) -> Result<Notification, AppError>;
    async fn mark_all_read(&self, user_id: &str, user_type: UserType) -> Result<u64, AppError>;
}
