// src/handlers/forms.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::form::{CreateFormPayload, Form},
};

#[utoipa::path(
    get,
    path = "/api/forms",
    tag = "Forms",
    responses(
        (status = 200, description = "Formulários visíveis", body = Vec<Form>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_forms(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let forms = app_state
        .form_service
        .list(&user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(forms)))
}

#[utoipa::path(
    post,
    path = "/api/forms",
    tag = "Forms",
    request_body = CreateFormPayload,
    responses(
        (status = 201, description = "Formulário criado", body = Form),
        (status = 400, description = "Payload inválido")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_form(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<CreateFormPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let form = app_state
        .form_service
        .create(&user, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(form)))
}
