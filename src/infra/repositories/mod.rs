pub mod postgres_invitation_repo;
pub mod postgres_job_repo;
pub mod postgres_notification_repo;
pub mod postgres_project_repo;
pub mod sqlite_invitation_repo;
pub mod sqlite_job_repo;
pub mod sqlite_notification_repo;
pub mod sqlite_project_repo;
