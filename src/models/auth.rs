// src/models/auth.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ---
// Papéis conhecidos pelo sistema
// ---
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Operário: só enxerga o que ele mesmo criou.
    Operario,
    /// Cliente administrador (tenant).
    Max,
    /// Super administrador: enxerga tudo.
    Supermax,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Operario => "operario",
            Role::Max => "max",
            Role::Supermax => "supermax",
        }
    }
}

// ---
// Mapa de permissões ("permisos") do perfil
// ---
// Chaves ausentes no documento valem `false`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct Permissions {
    pub puede_crear_empresas: bool,
    pub puede_crear_sucursales: bool,
    pub puede_crear_auditorias: bool,
    pub puede_compartir_auditorias: bool,
    pub puede_agregar_socios: bool,
    pub puede_gestionar_usuarios: bool,
}

// Edição parcial: só as chaves presentes sobrescrevem o valor atual.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PermissionPatch {
    pub puede_crear_empresas: Option<bool>,
    pub puede_crear_sucursales: Option<bool>,
    pub puede_crear_auditorias: Option<bool>,
    pub puede_compartir_auditorias: Option<bool>,
    pub puede_agregar_socios: Option<bool>,
    pub puede_gestionar_usuarios: Option<bool>,
}

impl PermissionPatch {
    pub fn is_empty(&self) -> bool {
        self.puede_crear_empresas.is_none()
            && self.puede_crear_sucursales.is_none()
            && self.puede_crear_auditorias.is_none()
            && self.puede_compartir_auditorias.is_none()
            && self.puede_agregar_socios.is_none()
            && self.puede_gestionar_usuarios.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    CreateCompanies,
    CreateBranches,
    CreateAudits,
    ShareAudits,
    AddPartners,
    ManageUsers,
}

impl Capability {
    pub const ALL: [Capability; 6] = [
        Capability::CreateCompanies,
        Capability::CreateBranches,
        Capability::CreateAudits,
        Capability::ShareAudits,
        Capability::AddPartners,
        Capability::ManageUsers,
    ];

    pub fn slug(&self) -> &'static str {
        match self {
            Capability::CreateCompanies => "puedeCrearEmpresas",
            Capability::CreateBranches => "puedeCrearSucursales",
            Capability::CreateAudits => "puedeCrearAuditorias",
            Capability::ShareAudits => "puedeCompartirAuditorias",
            Capability::AddPartners => "puedeAgregarSocios",
            Capability::ManageUsers => "puedeGestionarUsuarios",
        }
    }
}

impl Permissions {
    pub fn allows(&self, capability: Capability) -> bool {
        match capability {
            Capability::CreateCompanies => self.puede_crear_empresas,
            Capability::CreateBranches => self.puede_crear_sucursales,
            Capability::CreateAudits => self.puede_crear_auditorias,
            Capability::ShareAudits => self.puede_compartir_auditorias,
            Capability::AddPartners => self.puede_agregar_socios,
            Capability::ManageUsers => self.puede_gestionar_usuarios,
        }
    }

    /// Aplica as edições pendentes sobre as permissões atuais.
    pub fn merged_with(&self, patch: &PermissionPatch) -> Permissions {
        Permissions {
            puede_crear_empresas: patch.puede_crear_empresas.unwrap_or(self.puede_crear_empresas),
            puede_crear_sucursales: patch.puede_crear_sucursales.unwrap_or(self.puede_crear_sucursales),
            puede_crear_auditorias: patch.puede_crear_auditorias.unwrap_or(self.puede_crear_auditorias),
            puede_compartir_auditorias: patch
                .puede_compartir_auditorias
                .unwrap_or(self.puede_compartir_auditorias),
            puede_agregar_socios: patch.puede_agregar_socios.unwrap_or(self.puede_agregar_socios),
            puede_gestionar_usuarios: patch.puede_gestionar_usuarios.unwrap_or(self.puede_gestionar_usuarios),
        }
    }
}

// ---
// Usuário da sessão, montado pelo auth guard a partir do perfil
// ---
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub uid: String,
    pub email: String,
    pub display_name: Option<String>,
    pub role: Role,
    pub cliente_admin_id: Option<String>,
    pub permisos: Permissions,
}

impl SessionUser {
    /// O supermax passa por qualquer gate; os demais dependem do mapa de permissões.
    pub fn can(&self, capability: Capability) -> bool {
        self.role == Role::Supermax || self.permisos.allows(capability)
    }

    /// Slugs das permissões efetivas (o supermax tem todas).
    pub fn granted(&self) -> Vec<&'static str> {
        Capability::ALL
            .iter()
            .filter(|c| self.can(**c))
            .map(|c| c.slug())
            .collect()
    }

    pub fn is_admin(&self) -> bool {
        matches!(self.role, Role::Max | Role::Supermax)
    }

    /// Tenant ao qual os registros criados por este usuário pertencem.
    pub fn tenant_admin_id(&self) -> &str {
        self.cliente_admin_id.as_deref().unwrap_or(&self.uid)
    }

    pub fn display_label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.email)
    }
}

// Estrutura de dados ("claims") dentro do JWT do provedor de autenticação
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // Subject (ID do usuário)
    pub exp: usize,
    pub iat: usize,
}
