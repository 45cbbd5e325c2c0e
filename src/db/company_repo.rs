// src/db/company_repo.rs

use std::sync::Arc;

use crate::{
    common::error::AppError,
    db::document_store::{decode_all, to_fields, Collection, DocumentStore, Query, IN_QUERY_LIMIT},
    models::company::{Branch, Company, NewBranch, NewCompany},
};

// Empresas e suas sucursais
#[derive(Clone)]
pub struct CompanyRepository {
    store: Arc<dyn DocumentStore>,
}

impl CompanyRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    // =========================================================================
    //  EMPRESAS
    // =========================================================================

    pub async fn list_all(&self) -> Result<Vec<Company>, AppError> {
        decode_all(self.store.query(Query::new(Collection::Empresas)).await?)
    }

    pub async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<Company>, AppError> {
        let query = Query::new(Collection::Empresas).eq("propietarioId", owner_id);
        decode_all(self.store.query(query).await?)
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Company>, AppError> {
        self.store
            .get(Collection::Empresas, id)
            .await?
            .map(|doc| doc.decode())
            .transpose()
    }

    pub async fn create(&self, company: &NewCompany<'_>) -> Result<Company, AppError> {
        self.store
            .create(Collection::Empresas, to_fields(company)?)
            .await?
            .decode()
    }

    // =========================================================================
    //  SUCURSAIS
    // =========================================================================

    pub async fn list_all_branches(&self) -> Result<Vec<Branch>, AppError> {
        decode_all(self.store.query(Query::new(Collection::Sucursales)).await?)
    }

    /// Uma única consulta "in": `values` precisa caber no limite do backend.
    pub async fn branches_where_in(&self, field: &str, values: &[String]) -> Result<Vec<Branch>, AppError> {
        if values.is_empty() {
            return Ok(Vec::new());
        }
        if values.len() > IN_QUERY_LIMIT {
            return Err(AppError::QueryTooLarge(values.len()));
        }
        let query = Query::new(Collection::Sucursales).is_in(field, values.iter().cloned());
        decode_all(self.store.query(query).await?)
    }

    pub async fn create_branch(&self, branch: &NewBranch<'_>) -> Result<Branch, AppError> {
        self.store
            .create(Collection::Sucursales, to_fields(branch)?)
            .await?
            .decode()
    }
}
