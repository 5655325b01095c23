pub mod actor;
pub mod invitation;
pub mod job_record;
pub mod notification;
pub mod project;
