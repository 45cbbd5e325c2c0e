pub mod document_store;
pub use document_store::DocumentStore;
pub mod memory_store;
pub use memory_store::MemoryDocumentStore;
pub mod pg_store;
pub use pg_store::PgDocumentStore;
pub mod object_storage;
pub use object_storage::{LocalObjectStorage, ObjectStorage};

pub mod user_repo;
pub use user_repo::UserRepository;
pub mod company_repo;
pub use company_repo::CompanyRepository;
pub mod form_repo;
pub use form_repo::FormRepository;
pub mod audit_repo;
pub use audit_repo::AuditRepository;
pub mod report_repo;
pub use report_repo::ReportRepository;
