// src/handlers/dashboard.rs

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use chrono::NaiveDate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::dashboard::{DashboardOverview, DashboardQuery},
};

// GET /api/dashboard
// Nunca falha por causa de uma seção: cada uma degrada para lista vazia.
#[utoipa::path(
    get,
    path = "/api/dashboard",
    tag = "Dashboard",
    params(DashboardQuery),
    responses(
        (status = 200, description = "Contadores, auditorias do dia e próximas auditorias", body = DashboardOverview),
        (status = 400, description = "`today` fora do formato YYYY-MM-DD"),
        (status = 401, description = "Não autorizado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_overview(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(query): Query<DashboardQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let today = match query.today.as_deref() {
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
            AppError::BadRequest(format!("data inválida em 'today': {}", raw))
                .to_api_error(&locale, &app_state.i18n_store)
        })?,
        None => chrono::Utc::now().date_naive(),
    };
    let overview = app_state.dashboard_service.overview(&user, today).await;

    Ok((StatusCode::OK, Json(overview)))
}
