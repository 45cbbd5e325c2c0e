// src/models/report.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::models::form::Section;

pub const CONFORME: &str = "Conforme";
pub const NO_CONFORME: &str = "No conforme";
pub const NECESITA_MEJORA: &str = "Necesita mejora";
pub const NO_APLICA: &str = "No aplica";

// Contagem por categoria de resposta ("estadisticas")
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AnswerTally {
    #[serde(rename = "Conforme")]
    pub conforme: usize,
    #[serde(rename = "No conforme")]
    pub no_conforme: usize,
    #[serde(rename = "Necesita mejora")]
    pub necesita_mejora: usize,
    #[serde(rename = "No aplica")]
    pub no_aplica: usize,
}

// A mesma contagem sem a categoria "No aplica"
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AnswerTallyExcludingNa {
    #[serde(rename = "Conforme")]
    pub conforme: usize,
    #[serde(rename = "No conforme")]
    pub no_conforme: usize,
    #[serde(rename = "Necesita mejora")]
    pub necesita_mejora: usize,
}

impl From<&AnswerTally> for AnswerTallyExcludingNa {
    fn from(tally: &AnswerTally) -> Self {
        AnswerTallyExcludingNa {
            conforme: tally.conforme,
            no_conforme: tally.no_conforme,
            necesita_mejora: tally.necesita_mejora,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReportCompany {
    #[serde(default)]
    pub id: Option<String>,
    pub nombre: String,
    #[serde(default)]
    pub logo: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReportForm {
    pub id: String,
    pub nombre: String,
}

// Fotografia desnormalizada de uma auditoria concluída (coleção `reportes`)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub id: String,
    pub empresa: ReportCompany,
    pub sucursal: String,
    pub formulario: ReportForm,
    #[serde(default)]
    pub respuestas: Vec<String>,
    #[serde(default)]
    pub comentarios: Vec<String>,
    #[serde(default)]
    pub imagenes: Vec<String>,
    #[serde(default)]
    pub secciones: Vec<Section>,
    #[serde(default)]
    pub estadisticas: AnswerTally,
    #[serde(default)]
    pub estadisticas_sin_no_aplica: AnswerTallyExcludingNa,
    #[serde(default)]
    pub total_respuestas: usize,
    #[serde(default)]
    pub todas_preguntas_contestadas: bool,
    #[serde(default)]
    pub usuario_id: Option<String>,
    #[serde(default)]
    pub cliente_admin_id: Option<String>,
    #[serde(default)]
    pub fecha_guardado: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReport<'a> {
    pub empresa: &'a ReportCompany,
    pub sucursal: &'a str,
    pub formulario: &'a ReportForm,
    pub respuestas: Vec<String>,
    pub comentarios: Vec<String>,
    pub imagenes: Vec<String>,
    pub secciones: &'a [Section],
    pub estadisticas: AnswerTally,
    pub estadisticas_sin_no_aplica: AnswerTallyExcludingNa,
    pub total_respuestas: usize,
    pub todas_preguntas_contestadas: bool,
    pub usuario_id: &'a str,
    pub cliente_admin_id: &'a str,
    pub fecha_guardado: &'static str,
}

fn validate_empresa(empresa: &ReportCompany) -> Result<(), ValidationError> {
    if empresa.nombre.trim().is_empty() {
        return Err(ValidationError::new("empresa").with_message("La empresa es obligatoria.".into()));
    }
    Ok(())
}

fn validate_formulario(formulario: &ReportForm) -> Result<(), ValidationError> {
    if formulario.id.trim().is_empty() || formulario.nombre.trim().is_empty() {
        return Err(ValidationError::new("formulario").with_message("El formulario es obligatorio.".into()));
    }
    Ok(())
}

// Parte JSON ("reporte") do multipart de gravação
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct SaveReportPayload {
    #[validate(custom(function = "validate_empresa"))]
    pub empresa: ReportCompany,
    #[validate(length(min = 1, message = "La sucursal es obligatoria."))]
    pub sucursal: String,
    #[validate(custom(function = "validate_formulario"))]
    pub formulario: ReportForm,
    /// Respostas por seção.
    pub respuestas: Vec<Vec<String>>,
    #[serde(default)]
    pub comentarios: Vec<Vec<String>>,
    pub secciones: Vec<Section>,
}

// Arquivo de imagem ainda não enviado ao storage
#[derive(Debug, Clone)]
pub struct PendingImage {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

// Linha "imprimível" do reporte: seção / pergunta / resposta / comentário
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ReportLine {
    pub formulario: String,
    pub seccion: String,
    pub pregunta: String,
    pub respuesta: String,
    pub comentario: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReportDetail {
    pub reporte: Report,
    pub lineas: Vec<ReportLine>,
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct ReportListQuery {
    /// Nome exato da empresa.
    pub empresa: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(empresa: &str, sucursal: &str) -> SaveReportPayload {
        serde_json::from_value(json!({
            "empresa": { "nombre": empresa },
            "sucursal": sucursal,
            "formulario": { "id": "f1", "nombre": "General" },
            "respuestas": [["Conforme"]],
            "secciones": [{ "nombre": "Orden", "preguntas": ["¿Piso limpio?"] }]
        }))
        .unwrap()
    }

    #[test]
    fn complete_header_is_accepted() {
        assert!(payload("Acme", "Centro").validate().is_ok());
    }

    #[test]
    fn blank_company_and_branch_are_rejected() {
        let errors = payload("  ", "").validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("empresa"));
        assert!(fields.contains_key("sucursal"));
        assert!(!fields.contains_key("formulario"));
    }
}
