pub mod audits;
pub mod auth;
pub mod companies;
pub mod dashboard;
pub mod forms;
pub mod operators;
pub mod reports;
