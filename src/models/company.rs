// src/models/company.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

// ---
// 1. Empresa
// ---
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: String,
    pub nombre: String,
    #[serde(default)]
    pub logo: String,
    pub propietario_id: String,
    #[serde(default)]
    pub fecha_creacion: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCompany<'a> {
    pub nombre: &'a str,
    pub logo: &'a str,
    pub propietario_id: &'a str,
    pub fecha_creacion: &'static str,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCompanyPayload {
    #[validate(length(min = 1, message = "El nombre de la empresa es obligatorio."))]
    #[schema(example = "Frigorífico del Sur")]
    pub nombre: String,
    #[schema(example = "https://cdn.example.com/logo.png")]
    pub logo: Option<String>,
}

// ---
// 2. Sucursal
// ---
// Sucursais antigas só têm o nome da empresa em `empresa`; as novas têm também `empresaId`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Branch {
    pub id: String,
    pub nombre: String,
    #[serde(default)]
    pub empresa_id: Option<String>,
    #[serde(default)]
    pub empresa: Option<String>,
    #[serde(default)]
    pub direccion: Option<String>,
    #[serde(default)]
    pub telefono: Option<String>,
    #[serde(default)]
    pub fecha_creacion: Option<String>,
    #[serde(default)]
    pub creado_por: Option<String>,
    #[serde(default)]
    pub creado_por_email: Option<String>,
    #[serde(default)]
    pub cliente_admin_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBranch<'a> {
    pub nombre: &'a str,
    pub empresa_id: &'a str,
    pub empresa: &'a str,
    pub direccion: Option<&'a str>,
    pub telefono: Option<&'a str>,
    pub fecha_creacion: &'static str,
    pub creado_por: &'a str,
    pub creado_por_email: &'a str,
    pub cliente_admin_id: &'a str,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBranchPayload {
    #[validate(length(min = 1, message = "El nombre de la sucursal es obligatorio."))]
    #[schema(example = "Planta Norte")]
    pub nombre: String,
    pub direccion: Option<String>,
    pub telefono: Option<String>,
}
