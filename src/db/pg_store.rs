// src/db/pg_store.rs

use async_trait::async_trait;
use serde_json::{Map, Value};
use sqlx::{types::Json, FromRow, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::common::error::AppError;
use crate::db::document_store::{
    resolve_server_timestamps, Collection, Direction, Document, DocumentStore, Filter, Query,
};

// Store de documentos sobre uma única tabela JSONB (ver migrations/).
#[derive(Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

#[derive(FromRow)]
struct DocumentRow {
    id: String,
    data: Json<Map<String, Value>>,
}

impl From<DocumentRow> for Document {
    fn from(row: DocumentRow) -> Self {
        Document { id: row.id, data: row.data.0 }
    }
}

// `data->>'campo'` devolve texto: strings sem aspas, o resto na forma JSON.
fn as_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl PgDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn build_select(query: &Query) -> QueryBuilder<'static, Postgres> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT id, data FROM documents WHERE collection = ");
        qb.push_bind(query.collection.as_str());

        for filter in &query.filters {
            match filter {
                Filter::Eq(field, Value::Null) => {
                    qb.push(" AND data->>");
                    qb.push_bind(field.clone());
                    qb.push(" IS NULL");
                }
                Filter::Eq(field, value) => {
                    qb.push(" AND data->>");
                    qb.push_bind(field.clone());
                    qb.push(" = ");
                    qb.push_bind(as_text(value));
                }
                Filter::In(field, values) => {
                    qb.push(" AND data->>");
                    qb.push_bind(field.clone());
                    qb.push(" = ANY(");
                    qb.push_bind(values.iter().map(as_text).collect::<Vec<String>>());
                    qb.push(")");
                }
            }
        }

        if let Some((field, direction)) = &query.order_by {
            qb.push(" ORDER BY data->>");
            qb.push_bind(field.clone());
            qb.push(match direction {
                Direction::Asc => " ASC NULLS LAST",
                Direction::Desc => " DESC NULLS LAST",
            });
        }
        if let Some(limit) = query.limit {
            qb.push(" LIMIT ");
            qb.push_bind(limit as i64);
        }
        qb
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn get(&self, collection: Collection, id: &str) -> Result<Option<Document>, AppError> {
        let row = sqlx::query_as::<_, DocumentRow>(
            "SELECT id, data FROM documents WHERE collection = $1 AND id = $2",
        )
        .bind(collection.as_str())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Document::from))
    }

    async fn query(&self, query: Query) -> Result<Vec<Document>, AppError> {
        query.check_limits()?;

        let rows = Self::build_select(&query)
            .build_query_as::<DocumentRow>()
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Document::from).collect())
    }

    async fn create(&self, collection: Collection, mut data: Map<String, Value>) -> Result<Document, AppError> {
        resolve_server_timestamps(&mut data);
        let id = Uuid::new_v4().to_string();

        sqlx::query("INSERT INTO documents (collection, id, data) VALUES ($1, $2, $3)")
            .bind(collection.as_str())
            .bind(&id)
            .bind(Json(&data))
            .execute(&self.pool)
            .await?;

        Ok(Document { id, data })
    }

    async fn update(&self, collection: Collection, id: &str, mut patch: Map<String, Value>) -> Result<(), AppError> {
        resolve_server_timestamps(&mut patch);

        // `||` entre jsonb faz o merge raso que o contrato pede
        let result = sqlx::query(
            "UPDATE documents SET data = data || $3, updated_at = NOW() WHERE collection = $1 AND id = $2",
        )
        .bind(collection.as_str())
        .bind(id)
        .bind(Json(&patch))
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::DocumentNotFound { collection: collection.as_str(), id: id.to_string() });
        }
        Ok(())
    }

    async fn delete(&self, collection: Collection, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2")
            .bind(collection.as_str())
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::DocumentNotFound { collection: collection.as_str(), id: id.to_string() });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::Execute;

    #[test]
    fn select_places_filters_order_and_limit() {
        let query = Query::new(Collection::AuditoriasAgendadas)
            .eq("usuarioId", "u1")
            .is_in("estado", ["agendada", "completada"])
            .order_by("fechaCreacion", Direction::Desc)
            .limit(30);

        let mut qb = PgDocumentStore::build_select(&query);
        let sql = qb.build().sql().to_string();

        assert_eq!(
            sql,
            "SELECT id, data FROM documents WHERE collection = $1 AND data->>$2 = $3 \
             AND data->>$4 = ANY($5) ORDER BY data->>$6 DESC NULLS LAST LIMIT $7"
        );
    }

    #[test]
    fn non_string_values_compare_as_json_text() {
        assert_eq!(as_text(&Value::Bool(true)), "true");
        assert_eq!(as_text(&Value::String("max".into())), "max");
    }
}
