// src/handlers/reports.rs

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::report::{PendingImage, Report, ReportDetail, ReportListQuery, SaveReportPayload},
};

const REPORT_PART: &str = "reporte";
const IMAGE_PART: &str = "imagenes";

// Lê o multipart: uma parte JSON "reporte" e zero ou mais arquivos "imagenes"
async fn read_report_parts(mut multipart: Multipart) -> Result<(SaveReportPayload, Vec<PendingImage>), AppError> {
    let mut payload = None;
    let mut images = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.body_text()))?
    {
        let name = field.name().map(String::from);
        match name.as_deref() {
            Some(REPORT_PART) => {
                let text = field.text().await.map_err(|e| AppError::BadRequest(e.body_text()))?;
                payload = Some(serde_json::from_str::<SaveReportPayload>(&text).map_err(|e| {
                    AppError::BadRequest(format!("parte '{}' inválida: {}", REPORT_PART, e))
                })?);
            }
            Some(IMAGE_PART) => {
                let file_name = field
                    .file_name()
                    .map(String::from)
                    .unwrap_or_else(|| format!("{}.bin", uuid::Uuid::new_v4()));
                let content_type = field.content_type().map(String::from);
                let bytes = field.bytes().await.map_err(|e| AppError::BadRequest(e.body_text()))?;
                images.push(PendingImage { file_name, content_type, bytes: bytes.to_vec() });
            }
            other => tracing::warn!("Parte multipart ignorada: {:?}", other),
        }
    }

    let payload = payload.ok_or_else(|| AppError::BadRequest(format!("parte '{}' ausente", REPORT_PART)))?;
    Ok((payload, images))
}

// POST /api/reports (multipart)
#[utoipa::path(
    post,
    path = "/api/reports",
    tag = "Reports",
    request_body(
        content = SaveReportPayload,
        content_type = "multipart/form-data",
        description = "Parte 'reporte' (JSON SaveReportPayload) e arquivos 'imagenes'"
    ),
    responses(
        (status = 201, description = "Reporte salvo", body = Report),
        (status = 400, description = "Multipart inválido ou empresa/sucursal vazias"),
        (status = 422, description = "Sem respostas")
    ),
    security(("api_jwt" = []))
)]
pub async fn save_report(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let (payload, images) = read_report_parts(multipart)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let report = app_state
        .report_service
        .save(&user, payload, images)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(report)))
}

// GET /api/reports?empresa=Nombre
#[utoipa::path(
    get,
    path = "/api/reports",
    tag = "Reports",
    params(ReportListQuery),
    responses(
        (status = 200, description = "Reportes visíveis, do mais recente ao mais antigo", body = Vec<Report>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_reports(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(query): Query<ReportListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let reports = app_state
        .report_service
        .list(&user, query.empresa.as_deref())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(reports)))
}

// GET /api/reports/companies
#[utoipa::path(
    get,
    path = "/api/reports/companies",
    tag = "Reports",
    responses(
        (status = 200, description = "Nomes distintos de empresa com reportes", body = Vec<String>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_report_companies(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let names = app_state
        .report_service
        .company_names(&user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(names)))
}

// GET /api/reports/{id}
#[utoipa::path(
    get,
    path = "/api/reports/{id}",
    tag = "Reports",
    params(("id" = String, Path, description = "ID do reporte")),
    responses(
        (status = 200, description = "Reporte e suas linhas imprimíveis", body = ReportDetail),
        (status = 403, description = "Fora do escopo do usuário"),
        (status = 404, description = "Reporte não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_report(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let detail = app_state
        .report_service
        .detail(&user, &id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(detail)))
}
