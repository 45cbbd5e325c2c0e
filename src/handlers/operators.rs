// src/handlers/operators.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale, rbac::RequireAdmin},
    models::{
        auth::PermissionPatch,
        user::{CreateOperatorPayload, UserProfile},
    },
};

#[utoipa::path(
    get,
    path = "/api/operators",
    tag = "Operators",
    responses(
        (status = 200, description = "Operários do administrador", body = Vec<UserProfile>),
        (status = 403, description = "Apenas max e supermax")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_operators(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    _admin: RequireAdmin,
) -> Result<impl IntoResponse, ApiError> {
    let operators = app_state
        .operator_service
        .list(&user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(operators)))
}

#[utoipa::path(
    post,
    path = "/api/operators",
    tag = "Operators",
    request_body = CreateOperatorPayload,
    responses(
        (status = 201, description = "Operário criado sem permissões", body = UserProfile),
        (status = 400, description = "E-mail inválido"),
        (status = 403, description = "Apenas max e supermax"),
        (status = 409, description = "E-mail já cadastrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_operator(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    _admin: RequireAdmin,
    Json(payload): Json<CreateOperatorPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let operator = app_state
        .operator_service
        .create(&user, &payload.email)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(operator)))
}

// PATCH /api/operators/{id}/permissions
// Só as chaves enviadas mudam; as demais ficam como estão.
#[utoipa::path(
    patch,
    path = "/api/operators/{id}/permissions",
    tag = "Operators",
    params(("id" = String, Path, description = "ID do operário")),
    request_body = PermissionPatch,
    responses(
        (status = 200, description = "Operário com as permissões atualizadas", body = UserProfile),
        (status = 403, description = "Operário de outro administrador"),
        (status = 404, description = "Operário não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_operator_permissions(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    _admin: RequireAdmin,
    Path(id): Path<String>,
    Json(patch): Json<PermissionPatch>,
) -> Result<impl IntoResponse, ApiError> {
    let operator = app_state
        .operator_service
        .update_permissions(&user, &id, &patch)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(operator)))
}
