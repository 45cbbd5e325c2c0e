pub mod audit_service;
pub mod auth;
pub mod company_service;
pub mod dashboard_service;
pub mod form_service;
pub mod operator_service;
pub mod report_service;
pub mod tenancy_service;
