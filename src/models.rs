pub mod audit;
pub mod auth;
pub mod company;
pub mod dashboard;
pub mod form;
pub mod report;
pub mod user;
