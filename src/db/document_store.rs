// src/db/document_store.rs

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::cmp::Ordering;

use crate::common::error::AppError;

/// Limite de valores aceitos por um filtro "in" no backend de documentos.
pub const IN_QUERY_LIMIT: usize = 10;

/// Valor sentinela: o store troca pelo instante atual (UTC) ao gravar.
pub const SERVER_TIMESTAMP: &str = "__serverTimestamp__";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Empresas,
    Sucursales,
    Usuarios,
    Formularios,
    AuditoriasAgendadas,
    Reportes,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Empresas => "empresas",
            Collection::Sucursales => "sucursales",
            Collection::Usuarios => "usuarios",
            Collection::Formularios => "formularios",
            Collection::AuditoriasAgendadas => "auditorias_agendadas",
            Collection::Reportes => "reportes",
        }
    }
}

// Um documento cru, como vem do store.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub data: Map<String, Value>,
}

impl Document {
    /// Converte para o tipo do domínio, injetando o `id` no objeto.
    pub fn decode<T: DeserializeOwned>(self) -> Result<T, AppError> {
        let mut data = self.data;
        data.insert("id".to_string(), Value::String(self.id));
        Ok(serde_json::from_value(Value::Object(data))?)
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.data.get(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Eq(String, Value),
    In(String, Vec<Value>),
}

impl Filter {
    pub fn matches(&self, data: &Map<String, Value>) -> bool {
        match self {
            Filter::Eq(field, expected) => data.get(field) == Some(expected),
            Filter::In(field, values) => data.get(field).is_some_and(|v| values.contains(v)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub collection: Collection,
    pub filters: Vec<Filter>,
    pub order_by: Option<(String, Direction)>,
    pub limit: Option<usize>,
}

impl Query {
    pub fn new(collection: Collection) -> Self {
        Self { collection, filters: Vec::new(), order_by: None, limit: None }
    }

    pub fn eq(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.filters.push(Filter::Eq(field.to_string(), value.into()));
        self
    }

    pub fn is_in<V: Into<Value>>(mut self, field: &str, values: impl IntoIterator<Item = V>) -> Self {
        let values = values.into_iter().map(Into::into).collect();
        self.filters.push(Filter::In(field.to_string(), values));
        self
    }

    pub fn order_by(mut self, field: &str, direction: Direction) -> Self {
        self.order_by = Some((field.to_string(), direction));
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Rejeita filtros "in" maiores que o limite do backend.
    pub fn check_limits(&self) -> Result<(), AppError> {
        for filter in &self.filters {
            if let Filter::In(_, values) = filter {
                if values.len() > IN_QUERY_LIMIT {
                    return Err(AppError::QueryTooLarge(values.len()));
                }
            }
        }
        Ok(())
    }
}

// O banco de documentos hospedado. O núcleo só depende deste contrato.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn get(&self, collection: Collection, id: &str) -> Result<Option<Document>, AppError>;

    async fn query(&self, query: Query) -> Result<Vec<Document>, AppError>;

    async fn create(&self, collection: Collection, data: Map<String, Value>) -> Result<Document, AppError>;

    /// Merge raso dos campos de topo.
    async fn update(&self, collection: Collection, id: &str, patch: Map<String, Value>) -> Result<(), AppError>;

    async fn delete(&self, collection: Collection, id: &str) -> Result<(), AppError>;
}

pub fn decode_all<T: DeserializeOwned>(docs: Vec<Document>) -> Result<Vec<T>, AppError> {
    docs.into_iter().map(Document::decode).collect()
}

/// Divide uma lista de ids em grupos de até `size`, preservando a ordem.
pub fn chunk_ids<T: Clone>(ids: &[T], size: usize) -> Vec<Vec<T>> {
    ids.chunks(size.max(1)).map(|c| c.to_vec()).collect()
}

pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Troca todas as sentinelas de topo pelo instante atual.
pub fn resolve_server_timestamps(data: &mut Map<String, Value>) {
    let now = now_timestamp();
    for value in data.values_mut() {
        if value.as_str() == Some(SERVER_TIMESTAMP) {
            *value = Value::String(now.clone());
        }
    }
}

/// Serializa um payload do domínio para o mapa de campos gravado no store.
pub fn to_fields<T: serde::Serialize>(value: &T) -> Result<Map<String, Value>, AppError> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(AppError::BadRequest(format!("esperado objeto JSON, recebido {}", other))),
    }
}

/// Ordenação entre valores JSON do mesmo campo. Ausentes/null vão para o fim.
pub fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (None | Some(Value::Null), None | Some(Value::Null)) => Ordering::Equal,
        (None | Some(Value::Null), _) => Ordering::Greater,
        (_, None | Some(Value::Null)) => Ordering::Less,
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (Some(x), Some(y)) => x.to_string().cmp(&y.to_string()),
    }
}

fn is_missing(value: Option<&Value>) -> bool {
    matches!(value, None | Some(Value::Null))
}

/// Ordem de um `order_by`: só a comparação entre valores presentes inverte no `Desc`.
/// Ausentes/null ficam no fim nas duas direções, como o `NULLS LAST` do Postgres.
pub fn compare_directed(a: Option<&Value>, b: Option<&Value>, direction: Direction) -> Ordering {
    match (is_missing(a), is_missing(b)) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => match direction {
            Direction::Asc => compare_values(a, b),
            Direction::Desc => compare_values(a, b).reverse(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashSet;

    #[test]
    fn chunking_25_ids_gives_10_10_5_without_repeats() {
        let ids: Vec<String> = (0..25).map(|i| format!("id{i}")).collect();
        let chunks = chunk_ids(&ids, IN_QUERY_LIMIT);

        let sizes: Vec<usize> = chunks.iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![10, 10, 5]);

        let flat: Vec<String> = chunks.into_iter().flatten().collect();
        assert_eq!(flat.len(), ids.len());
        let unique: HashSet<&String> = flat.iter().collect();
        let expected: HashSet<&String> = ids.iter().collect();
        assert_eq!(unique, expected);
    }

    #[test]
    fn chunking_nothing_issues_no_queries() {
        let empty: Vec<String> = Vec::new();
        assert!(chunk_ids(&empty, IN_QUERY_LIMIT).is_empty());
    }

    #[test]
    fn in_filter_above_limit_is_rejected() {
        let ok = Query::new(Collection::Sucursales).is_in("empresaId", (0..10).map(|i| i.to_string()));
        assert!(ok.check_limits().is_ok());

        let too_big = Query::new(Collection::Sucursales).is_in("empresaId", (0..11).map(|i| i.to_string()));
        assert!(matches!(too_big.check_limits(), Err(AppError::QueryTooLarge(11))));
    }

    #[test]
    fn decode_injects_the_document_id() {
        #[derive(serde::Deserialize)]
        struct Named {
            id: String,
            nombre: String,
        }

        let doc = Document {
            id: "abc".into(),
            data: json!({ "nombre": "Acme" }).as_object().cloned().unwrap_or_default(),
        };
        let named: Named = doc.decode().unwrap();
        assert_eq!(named.id, "abc");
        assert_eq!(named.nombre, "Acme");
    }

    #[test]
    fn sentinel_timestamps_are_resolved() {
        let mut data = json!({ "fechaCreacion": SERVER_TIMESTAMP, "nombre": "x" })
            .as_object()
            .cloned()
            .unwrap_or_default();
        resolve_server_timestamps(&mut data);

        let stamp = data["fechaCreacion"].as_str().unwrap();
        assert_ne!(stamp, SERVER_TIMESTAMP);
        assert!(stamp.ends_with('Z'));
        assert_eq!(data["nombre"], "x");
    }

    #[test]
    fn missing_values_sort_last() {
        let a = json!("2024-01-01");
        assert_eq!(compare_values(Some(&a), None), Ordering::Less);
        assert_eq!(compare_values(None, Some(&a)), Ordering::Greater);
    }

    #[test]
    fn missing_values_stay_last_when_descending() {
        let old = json!("2024-01-01");
        let new = json!("2024-05-01");
        assert_eq!(compare_directed(Some(&new), Some(&old), Direction::Desc), Ordering::Less);
        assert_eq!(compare_directed(None, Some(&old), Direction::Desc), Ordering::Greater);
        assert_eq!(compare_directed(Some(&Value::Null), Some(&old), Direction::Asc), Ordering::Greater);
    }
}
