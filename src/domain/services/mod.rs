pub mod lifecycle;
pub mod notify;
pub mod wage;
