pub mod health;
pub mod invitation;
pub mod job;
pub mod notification;
pub mod project;
