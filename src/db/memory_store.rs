// src/db/memory_store.rs

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::common::error::AppError;
use crate::db::document_store::{
    compare_directed, resolve_server_timestamps, Collection, Document, DocumentStore, Query,
};

// Store em memória: usado com STORE_BACKEND=memory e nos testes.
// Mantém a ordem de inserção por coleção.
#[derive(Default)]
pub struct MemoryDocumentStore {
    collections: RwLock<HashMap<Collection, Vec<Document>>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insere com id conhecido. Útil para semear perfis de usuário vindos do provedor de autenticação.
    pub async fn insert_with_id(&self, collection: Collection, id: &str, mut data: Map<String, Value>) {
        resolve_server_timestamps(&mut data);
        let mut guard = self.collections.write().await;
        let docs = guard.entry(collection).or_default();
        docs.retain(|d| d.id != id);
        docs.push(Document { id: id.to_string(), data });
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn get(&self, collection: Collection, id: &str) -> Result<Option<Document>, AppError> {
        let guard = self.collections.read().await;
        Ok(guard
            .get(&collection)
            .and_then(|docs| docs.iter().find(|d| d.id == id))
            .cloned())
    }

    async fn query(&self, query: Query) -> Result<Vec<Document>, AppError> {
        query.check_limits()?;

        let guard = self.collections.read().await;
        let mut found: Vec<Document> = guard
            .get(&query.collection)
            .map(|docs| {
                docs.iter()
                    .filter(|d| query.filters.iter().all(|f| f.matches(&d.data)))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        if let Some((field, direction)) = &query.order_by {
            found.sort_by(|a, b| compare_directed(a.field(field), b.field(field), *direction));
        }
        if let Some(limit) = query.limit {
            found.truncate(limit);
        }
        Ok(found)
    }

    async fn create(&self, collection: Collection, mut data: Map<String, Value>) -> Result<Document, AppError> {
        resolve_server_timestamps(&mut data);
        let doc = Document { id: Uuid::new_v4().to_string(), data };

        self.collections
            .write()
            .await
            .entry(collection)
            .or_default()
            .push(doc.clone());
        Ok(doc)
    }

    async fn update(&self, collection: Collection, id: &str, mut patch: Map<String, Value>) -> Result<(), AppError> {
        resolve_server_timestamps(&mut patch);
        let mut guard = self.collections.write().await;
        let doc = guard
            .get_mut(&collection)
            .and_then(|docs| docs.iter_mut().find(|d| d.id == id))
            .ok_or_else(|| AppError::DocumentNotFound { collection: collection.as_str(), id: id.to_string() })?;

        for (key, value) in patch {
            doc.data.insert(key, value);
        }
        Ok(())
    }

    async fn delete(&self, collection: Collection, id: &str) -> Result<(), AppError> {
        let mut guard = self.collections.write().await;
        let docs = guard.entry(collection).or_default();
        let before = docs.len();
        docs.retain(|d| d.id != id);

        if docs.len() == before {
            return Err(AppError::DocumentNotFound { collection: collection.as_str(), id: id.to_string() });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::document_store::Direction;
    use serde_json::json;

    fn fields(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap_or_default()
    }

    #[tokio::test]
    async fn query_filters_orders_and_limits() {
        let store = MemoryDocumentStore::new();
        for (owner, fecha) in [("a", "2024-03-01"), ("b", "2024-01-01"), ("a", "2024-02-01"), ("a", "2024-04-01")] {
            store
                .create(Collection::AuditoriasAgendadas, fields(json!({ "usuarioId": owner, "fechaCreacion": fecha })))
                .await
                .unwrap();
        }

        let docs = store
            .query(
                Query::new(Collection::AuditoriasAgendadas)
                    .eq("usuarioId", "a")
                    .order_by("fechaCreacion", Direction::Desc)
                    .limit(2),
            )
            .await
            .unwrap();

        let fechas: Vec<&str> = docs.iter().filter_map(|d| d.field("fechaCreacion")?.as_str()).collect();
        assert_eq!(fechas, vec!["2024-04-01", "2024-03-01"]);
    }

    #[tokio::test]
    async fn descending_order_keeps_undated_documents_last() {
        let store = MemoryDocumentStore::new();
        for data in [
            json!({ "fechaCreacion": "2024-01-01" }),
            json!({ "empresa": "Sin fecha" }),
            json!({ "fechaCreacion": "2024-05-01" }),
        ] {
            store.create(Collection::AuditoriasAgendadas, fields(data)).await.unwrap();
        }

        let docs = store
            .query(
                Query::new(Collection::AuditoriasAgendadas)
                    .order_by("fechaCreacion", Direction::Desc)
                    .limit(2),
            )
            .await
            .unwrap();
        let fechas: Vec<Option<&str>> = docs.iter().map(|d| d.field("fechaCreacion").and_then(Value::as_str)).collect();
        assert_eq!(fechas, vec![Some("2024-05-01"), Some("2024-01-01")]);

        let ascending = store
            .query(Query::new(Collection::AuditoriasAgendadas).order_by("fechaCreacion", Direction::Asc))
            .await
            .unwrap();
        assert!(ascending[2].field("fechaCreacion").is_none());
    }

    #[tokio::test]
    async fn update_merges_and_delete_removes() {
        let store = MemoryDocumentStore::new();
        let doc = store
            .create(Collection::Empresas, fields(json!({ "nombre": "Acme", "logo": "" })))
            .await
            .unwrap();

        store
            .update(Collection::Empresas, &doc.id, fields(json!({ "logo": "http://x/logo.png" })))
            .await
            .unwrap();
        let reloaded = store.get(Collection::Empresas, &doc.id).await.unwrap().unwrap();
        assert_eq!(reloaded.data["nombre"], "Acme");
        assert_eq!(reloaded.data["logo"], "http://x/logo.png");

        store.delete(Collection::Empresas, &doc.id).await.unwrap();
        assert!(store.get(Collection::Empresas, &doc.id).await.unwrap().is_none());
        assert!(matches!(
            store.delete(Collection::Empresas, &doc.id).await,
            Err(AppError::DocumentNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn oversized_membership_query_is_rejected() {
        let store = MemoryDocumentStore::new();
        let ids: Vec<String> = (0..11).map(|i| i.to_string()).collect();
        let result = store.query(Query::new(Collection::Sucursales).is_in("empresaId", ids)).await;
        assert!(matches!(result, Err(AppError::QueryTooLarge(11))));
    }
}
