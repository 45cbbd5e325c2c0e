// src/db/report_repo.rs

use std::sync::Arc;

use crate::{
    common::error::AppError,
    db::document_store::{decode_all, to_fields, Collection, DocumentStore, Query},
    models::report::{NewReport, Report},
};

#[derive(Clone)]
pub struct ReportRepository {
    store: Arc<dyn DocumentStore>,
}

impl ReportRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub async fn list_all(&self) -> Result<Vec<Report>, AppError> {
        decode_all(self.store.query(Query::new(Collection::Reportes)).await?)
    }

    /// Reportes cujo campo de dono (`usuarioId` ou `clienteAdminId`) é igual a `owner_id`.
    pub async fn list_by_owner(&self, owner_field: &str, owner_id: &str) -> Result<Vec<Report>, AppError> {
        let query = Query::new(Collection::Reportes).eq(owner_field, owner_id);
        decode_all(self.store.query(query).await?)
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Report>, AppError> {
        self.store
            .get(Collection::Reportes, id)
            .await?
            .map(|doc| doc.decode())
            .transpose()
    }

    pub async fn create(&self, report: &NewReport<'_>) -> Result<Report, AppError> {
        self.store
            .create(Collection::Reportes, to_fields(report)?)
            .await?
            .decode()
    }
}
