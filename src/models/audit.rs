// src/models/audit.rs

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

// Ciclo de vida: agendada -> completada (ou exclusão)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AuditState {
    Agendada,
    Completada,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledAudit {
    pub id: String,
    pub empresa: String,
    #[serde(default)]
    pub sucursal: Option<String>,
    #[serde(default)]
    pub formulario: Option<String>,
    #[serde(default)]
    pub descripcion: Option<String>,
    /// Data no formato YYYY-MM-DD.
    #[schema(example = "2025-06-15")]
    pub fecha: String,
    #[schema(example = "09:30")]
    pub hora: String,
    pub estado: AuditState,
    pub usuario_id: String,
    #[serde(default)]
    pub usuario_nombre: Option<String>,
    #[serde(default)]
    pub cliente_admin_id: Option<String>,
    #[serde(default)]
    pub fecha_creacion: Option<String>,
    #[serde(default)]
    pub fecha_actualizacion: Option<String>,
    #[serde(default)]
    pub fecha_completada: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewScheduledAudit<'a> {
    pub empresa: &'a str,
    pub sucursal: Option<&'a str>,
    pub formulario: Option<&'a str>,
    pub descripcion: Option<&'a str>,
    pub fecha: &'a str,
    pub hora: &'a str,
    pub estado: AuditState,
    pub usuario_id: &'a str,
    pub usuario_nombre: &'a str,
    pub cliente_admin_id: &'a str,
    pub fecha_creacion: &'static str,
    pub fecha_actualizacion: &'static str,
}

fn validate_fecha(value: &str) -> Result<(), ValidationError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(|_| ())
        .map_err(|_| ValidationError::new("fecha").with_message("La fecha debe tener el formato AAAA-MM-DD.".into()))
}

fn validate_hora(value: &str) -> Result<(), ValidationError> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .map(|_| ())
        .map_err(|_| ValidationError::new("hora").with_message("La hora debe tener el formato HH:MM.".into()))
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ScheduleAuditPayload {
    #[validate(length(min = 1, message = "La empresa es obligatoria."))]
    pub empresa: String,
    pub sucursal: Option<String>,
    pub formulario: Option<String>,
    pub descripcion: Option<String>,
    #[validate(custom(function = "validate_fecha"))]
    #[schema(example = "2025-06-15")]
    pub fecha: String,
    #[validate(custom(function = "validate_hora"))]
    #[schema(example = "09:30")]
    pub hora: String,
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct AuditListQuery {
    /// Filtra por um dia exato (YYYY-MM-DD).
    pub fecha: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(fecha: &str, hora: &str) -> ScheduleAuditPayload {
        ScheduleAuditPayload {
            empresa: "Acme".into(),
            sucursal: None,
            formulario: None,
            descripcion: None,
            fecha: fecha.into(),
            hora: hora.into(),
        }
    }

    #[test]
    fn accepts_iso_date_and_24h_time() {
        assert!(payload("2025-06-15", "09:30").validate().is_ok());
    }

    #[test]
    fn rejects_malformed_date_and_time() {
        let errors = payload("15/06/2025", "9h30").validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("fecha"));
        assert!(fields.contains_key("hora"));
    }
}
