// src/handlers/audits.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        i18n::Locale,
        rbac::{PermCreateAudits, RequireCapability},
    },
    models::audit::{AuditListQuery, ScheduleAuditPayload, ScheduledAudit},
};

// GET /api/audits?fecha=YYYY-MM-DD
#[utoipa::path(
    get,
    path = "/api/audits",
    tag = "Audits",
    params(AuditListQuery),
    responses(
        (status = 200, description = "Auditorias agendadas visíveis", body = Vec<ScheduledAudit>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_audits(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(query): Query<AuditListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let audits = app_state
        .audit_service
        .list(&user, query.fecha.as_deref())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(audits)))
}

// POST /api/audits
#[utoipa::path(
    post,
    path = "/api/audits",
    tag = "Audits",
    request_body = ScheduleAuditPayload,
    responses(
        (status = 201, description = "Auditoria agendada", body = ScheduledAudit),
        (status = 400, description = "Data ou hora inválida"),
        (status = 403, description = "Sem a permissão puedeCrearAuditorias")
    ),
    security(("api_jwt" = []))
)]
pub async fn schedule_audit(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    _guard: RequireCapability<PermCreateAudits>,
    Json(payload): Json<ScheduleAuditPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let audit = app_state
        .audit_service
        .schedule(&user, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(audit)))
}

// POST /api/audits/{id}/complete
#[utoipa::path(
    post,
    path = "/api/audits/{id}/complete",
    tag = "Audits",
    params(("id" = String, Path, description = "ID da auditoria")),
    responses(
        (status = 200, description = "Auditoria completada", body = ScheduledAudit),
        (status = 403, description = "Fora do escopo do usuário"),
        (status = 404, description = "Auditoria não encontrada"),
        (status = 409, description = "Auditoria já completada")
    ),
    security(("api_jwt" = []))
)]
pub async fn complete_audit(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let audit = app_state
        .audit_service
        .complete(&user, &id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(audit)))
}

// DELETE /api/audits/{id}
#[utoipa::path(
    delete,
    path = "/api/audits/{id}",
    tag = "Audits",
    params(("id" = String, Path, description = "ID da auditoria")),
    responses(
        (status = 204, description = "Auditoria excluída"),
        (status = 403, description = "Fora do escopo do usuário"),
        (status = 404, description = "Auditoria não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_audit(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .audit_service
        .delete(&user, &id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}
