//src/main.rs

use anyhow::Context;
use axum::{
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{delete, get, patch, post},
    Router,
};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::{AppState, Config};
use crate::docs::ApiDoc;
use crate::middleware::auth::auth_guard;

// Reportes chegam com fotos; o limite padrão do axum (2 MB) é pequeno demais
const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

fn build_router(app_state: AppState) -> Router {
    // Tudo aqui exige Bearer token
    let protected_routes = Router::new()
        .route("/users/me", get(handlers::auth::get_me))
        .route("/companies"
               ,get(handlers::companies::list_companies)
               .post(handlers::companies::create_company)
        )
        .route("/companies/{id}", get(handlers::companies::get_company))
        .route("/companies/{id}/branches"
               ,get(handlers::companies::list_company_branches)
               .post(handlers::companies::create_branch)
        )
        .route("/branches", get(handlers::companies::list_branches))
        .route("/forms"
               ,get(handlers::forms::list_forms)
               .post(handlers::forms::create_form)
        )
        .route("/audits"
               ,get(handlers::audits::list_audits)
               .post(handlers::audits::schedule_audit)
        )
        .route("/audits/{id}/complete", post(handlers::audits::complete_audit))
        .route("/audits/{id}", delete(handlers::audits::delete_audit))
        .route("/dashboard", get(handlers::dashboard::get_overview))
        .route("/reports"
               ,get(handlers::reports::list_reports)
               .post(handlers::reports::save_report)
        )
        .route("/reports/companies", get(handlers::reports::list_report_companies))
        .route("/reports/{id}", get(handlers::reports::get_report))
        .route("/operators"
               ,get(handlers::operators::list_operators)
               .post(handlers::operators::create_operator)
        )
        .route("/operators/{id}/permissions", patch(handlers::operators::update_operator_permissions))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Combina tudo no router principal
    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api", protected_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    let config = Config::from_env()?;
    let app_state = AppState::new(&config).await?;
    let app = build_router(app_state);

    let listener = TcpListener::bind(&config.server_addr)
        .await
        .with_context(|| format!("Falha ao iniciar o listener TCP em {}", config.server_addr))?;
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr()?);

    axum::serve(listener, app).await.context("Erro no servidor Axum")?;
    Ok(())
}
