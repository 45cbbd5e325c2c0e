// src/db/form_repo.rs

use std::sync::Arc;

use crate::{
    common::error::AppError,
    db::document_store::{decode_all, to_fields, Collection, DocumentStore, Query},
    models::form::{Form, NewForm},
};

#[derive(Clone)]
pub struct FormRepository {
    store: Arc<dyn DocumentStore>,
}

impl FormRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub async fn list_all(&self) -> Result<Vec<Form>, AppError> {
        decode_all(self.store.query(Query::new(Collection::Formularios)).await?)
    }

    // Formulários são do usuário que os criou (campo `clienteAdminId`)
    pub async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<Form>, AppError> {
        let query = Query::new(Collection::Formularios).eq("clienteAdminId", owner_id);
        decode_all(self.store.query(query).await?)
    }

    pub async fn create(&self, form: &NewForm<'_>) -> Result<Form, AppError> {
        self.store
            .create(Collection::Formularios, to_fields(form)?)
            .await?
            .decode()
    }
}
