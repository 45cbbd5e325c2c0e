// src/db/audit_repo.rs

use serde_json::{json, Map};
use std::sync::Arc;

use crate::{
    common::error::AppError,
    db::document_store::{
        decode_all, to_fields, Collection, Direction, DocumentStore, Query, SERVER_TIMESTAMP,
    },
    models::audit::{AuditState, NewScheduledAudit, ScheduledAudit},
};

#[derive(Clone)]
pub struct AuditRepository {
    store: Arc<dyn DocumentStore>,
}

impl AuditRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// As `limit` auditorias mais recentes (por `fechaCreacion`), de qualquer usuário.
    pub async fn recent(&self, limit: usize) -> Result<Vec<ScheduledAudit>, AppError> {
        let query = Query::new(Collection::AuditoriasAgendadas)
            .order_by("fechaCreacion", Direction::Desc)
            .limit(limit);
        decode_all(self.store.query(query).await?)
    }

    pub async fn recent_by_user(&self, user_id: &str, limit: usize) -> Result<Vec<ScheduledAudit>, AppError> {
        let query = Query::new(Collection::AuditoriasAgendadas)
            .eq("usuarioId", user_id)
            .order_by("fechaCreacion", Direction::Desc)
            .limit(limit);
        decode_all(self.store.query(query).await?)
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<ScheduledAudit>, AppError> {
        self.store
            .get(Collection::AuditoriasAgendadas, id)
            .await?
            .map(|doc| doc.decode())
            .transpose()
    }

    pub async fn create(&self, audit: &NewScheduledAudit<'_>) -> Result<ScheduledAudit, AppError> {
        self.store
            .create(Collection::AuditoriasAgendadas, to_fields(audit)?)
            .await?
            .decode()
    }

    pub async fn mark_completed(&self, id: &str) -> Result<(), AppError> {
        let mut patch = Map::new();
        patch.insert("estado".to_string(), json!(AuditState::Completada));
        patch.insert("fechaCompletada".to_string(), json!(SERVER_TIMESTAMP));
        patch.insert("fechaActualizacion".to_string(), json!(SERVER_TIMESTAMP));
        self.store.update(Collection::AuditoriasAgendadas, id, patch).await
    }

    pub async fn delete(&self, id: &str) -> Result<(), AppError> {
        self.store.delete(Collection::AuditoriasAgendadas, id).await
    }
}
