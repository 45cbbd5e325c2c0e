// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use thiserror::Error;

use crate::common::i18n::I18nStore;
use crate::middleware::i18n::Locale;

// Erros de domínio e de infraestrutura. Nenhum deles é fatal ao processo:
// todos viram uma resposta JSON através de `to_api_error`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Requisição inválida: {0}")]
    BadRequest(String),

    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Usuário não encontrado")]
    UserNotFound,

    #[error("Documento não encontrado: {collection}/{id}")]
    DocumentNotFound { collection: &'static str, id: String },

    #[error("Acesso negado ao registro")]
    AccessDenied,

    #[error("Ação restrita a administradores")]
    AdminOnly,

    #[error("Permissão ausente: {0}")]
    MissingCapability(&'static str),

    #[error("Auditoria já completada: {0}")]
    AuditAlreadyCompleted(String),

    #[error("Reporte sem respostas")]
    EmptyReport,

    // O store rejeita filtros "in" acima do limite; quem chama deve usar chunk_ids.
    #[error("Consulta com {0} valores excede o limite do filtro 'in'")]
    QueryTooLarge(usize),

    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Erro de armazenamento: {0}")]
    StorageError(#[from] std::io::Error),

    #[error("Documento malformado: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),

    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),
}

// O erro que sai pela API, já traduzido.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: String,
    pub details: Option<Value>,
}

impl AppError {
    pub fn to_api_error(&self, locale: &Locale, i18n: &I18nStore) -> ApiError {
        let lang = locale.0.as_str();
        let (status, key, details) = match self {
            AppError::ValidationError(errors) => {
                let mut details: HashMap<String, Vec<String>> = HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                (StatusCode::BAD_REQUEST, "validation", Some(json!(details)))
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", Some(json!(msg))),
            AppError::EmailAlreadyExists => (StatusCode::CONFLICT, "email_exists", None),
            AppError::InvalidToken => (StatusCode::UNAUTHORIZED, "invalid_token", None),
            AppError::UserNotFound => (StatusCode::NOT_FOUND, "user_not_found", None),
            AppError::DocumentNotFound { collection, id } => (
                StatusCode::NOT_FOUND,
                "not_found",
                Some(json!({ "collection": collection, "id": id })),
            ),
            AppError::AccessDenied => (StatusCode::FORBIDDEN, "access_denied", None),
            AppError::AdminOnly => (StatusCode::FORBIDDEN, "admin_only", None),
            AppError::MissingCapability(slug) => (
                StatusCode::FORBIDDEN,
                "missing_capability",
                Some(json!({ "permiso": slug })),
            ),
            AppError::AuditAlreadyCompleted(id) => (
                StatusCode::CONFLICT,
                "audit_completed",
                Some(json!({ "id": id })),
            ),
            AppError::EmptyReport => (StatusCode::UNPROCESSABLE_ENTITY, "empty_report", None),

            // Todo o resto é falha de infraestrutura: loga o detalhe, responde genérico.
            e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "internal", None)
            }
        };

        ApiError {
            status,
            error: i18n.translate(lang, key),
            details,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.details {
            Some(details) => json!({ "error": self.error, "details": details }),
            None => json!({ "error": self.error }),
        };
        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_keeps_collection_and_id_in_details() {
        let err = AppError::DocumentNotFound { collection: "empresas", id: "e1".into() };
        let api = err.to_api_error(&Locale("es".into()), &I18nStore::new());

        assert_eq!(api.status, StatusCode::NOT_FOUND);
        assert_eq!(api.details, Some(json!({ "collection": "empresas", "id": "e1" })));
    }

    #[test]
    fn infrastructure_errors_are_hidden_behind_a_generic_message() {
        let err = AppError::StorageError(std::io::Error::other("disk on fire"));
        let api = err.to_api_error(&Locale("en".into()), &I18nStore::new());

        assert_eq!(api.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!api.error.contains("disk"));
        assert!(api.details.is_none());
    }
}
