// src/handlers/auth.rs

use axum::Json;

use crate::{middleware::auth::AuthenticatedUser, models::user::SessionProfile};

// Handler da rota protegida /me
#[utoipa::path(
    get,
    path = "/api/users/me",
    tag = "Users",
    responses(
        (status = 200, description = "Perfil da sessão e permissões efetivas", body = SessionProfile),
        (status = 401, description = "Token ausente ou inválido")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn get_me(AuthenticatedUser(user): AuthenticatedUser) -> Json<SessionProfile> {
    Json(SessionProfile::from(user))
}
