// src/models/form.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Section {
    pub nombre: String,
    #[serde(default)]
    pub preguntas: Vec<String>,
}

// Formulário de checklist (coleção `formularios`)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Form {
    pub id: String,
    pub nombre: String,
    #[serde(default)]
    pub secciones: Vec<Section>,
    #[serde(default)]
    pub creador_id: Option<String>,
    #[serde(default)]
    pub cliente_admin_id: String,
    #[serde(default)]
    pub fecha_creacion: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewForm<'a> {
    pub nombre: &'a str,
    pub secciones: &'a [Section],
    pub creador_id: &'a str,
    pub cliente_admin_id: &'a str,
    pub fecha_creacion: &'static str,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateFormPayload {
    #[validate(length(min = 1, message = "El nombre del formulario es obligatorio."))]
    #[schema(example = "Higiene y Seguridad - General")]
    pub nombre: String,
    #[validate(length(min = 1, message = "El formulario necesita al menos una sección."))]
    pub secciones: Vec<Section>,
}
