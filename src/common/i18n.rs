// src/common/i18n.rs

use std::collections::HashMap;

pub const DEFAULT_LANG: &str = "es";

// (chave, espanhol, inglês)
const MESSAGES: &[(&str, &str, &str)] = &[
    ("validation", "Uno o más campos son inválidos.", "One or more fields are invalid."),
    ("bad_request", "Solicitud inválida.", "Invalid request."),
    ("email_exists", "Este e-mail ya está en uso.", "This e-mail is already in use."),
    ("invalid_token", "Token de autenticación inválido o ausente.", "Missing or invalid authentication token."),
    ("user_not_found", "Usuario no encontrado.", "User not found."),
    ("not_found", "Registro no encontrado.", "Record not found."),
    ("access_denied", "No tienes permisos para acceder a este registro.", "You are not allowed to access this record."),
    ("admin_only", "Acceso restringido solo para administradores (max) y super administradores (supermax).", "Access restricted to administrators (max) and super administrators (supermax)."),
    ("missing_capability", "No tienes el permiso necesario para esta acción.", "You lack the permission required for this action."),
    ("audit_completed", "La auditoría ya fue completada.", "The audit has already been completed."),
    ("empty_report", "No hay datos de respuestas disponibles.", "No answer data available."),
    ("internal", "Ocurrió un error inesperado.", "An unexpected error occurred."),
];

struct Translations {
    es: &'static str,
    en: &'static str,
}

#[derive(Clone)]
pub struct I18nStore {
    messages: std::sync::Arc<HashMap<&'static str, Translations>>,
}

impl I18nStore {
    pub fn new() -> Self {
        let messages = MESSAGES
            .iter()
            .map(|&(key, es, en)| (key, Translations { es, en }))
            .collect();
        Self { messages: std::sync::Arc::new(messages) }
    }

    /// Traduz a chave para o idioma pedido, caindo para o espanhol e, por último, para a própria chave.
    pub fn translate(&self, lang: &str, key: &str) -> String {
        match self.messages.get(key) {
            Some(t) if lang == "en" => t.en.to_string(),
            Some(t) => t.es.to_string(),
            None => key.to_string(),
        }
    }
}

impl Default for I18nStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_language_falls_back_to_spanish() {
        let store = I18nStore::new();
        assert_eq!(store.translate("pt", "not_found"), "Registro no encontrado.");
        assert_eq!(store.translate("en", "not_found"), "Record not found.");
    }

    #[test]
    fn unknown_key_is_returned_verbatim() {
        assert_eq!(I18nStore::new().translate("es", "nope"), "nope");
    }
}
