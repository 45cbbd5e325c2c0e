// src/models/user.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::auth::{Permissions, Role, SessionUser};

// Perfil guardado na coleção `usuarios`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub display_name: Option<String>,
    pub role: Role,
    #[serde(default)]
    pub cliente_admin_id: Option<String>,
    #[serde(default)]
    pub permisos: Permissions,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl From<UserProfile> for SessionUser {
    fn from(profile: UserProfile) -> Self {
        SessionUser {
            uid: profile.id,
            email: profile.email,
            display_name: profile.display_name,
            role: profile.role,
            cliente_admin_id: profile.cliente_admin_id,
            permisos: profile.permisos,
        }
    }
}

// O que é gravado ao criar um operário (o id é atribuído pelo store)
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOperator<'a> {
    pub email: &'a str,
    pub role: Role,
    pub cliente_admin_id: &'a str,
    pub permisos: Permissions,
    pub created_at: &'static str,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateOperatorPayload {
    #[validate(email(message = "El e-mail proporcionado es inválido."))]
    #[schema(example = "operario@empresa.com")]
    pub email: String,
}

// Resposta de GET /api/users/me
#[derive(Debug, Serialize, ToSchema)]
pub struct SessionProfile {
    pub usuario: SessionUser,
    /// Permissões efetivas, já considerando o papel.
    pub capacidades: Vec<String>,
}

impl From<SessionUser> for SessionProfile {
    fn from(usuario: SessionUser) -> Self {
        let capacidades = usuario.granted().into_iter().map(String::from).collect();
        SessionProfile { usuario, capacidades }
    }
}
