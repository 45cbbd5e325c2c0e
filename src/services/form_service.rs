// src/services/form_service.rs

use crate::{
    common::error::AppError,
    db::{document_store::SERVER_TIMESTAMP, FormRepository},
    models::{
        auth::SessionUser,
        form::{CreateFormPayload, Form, NewForm},
    },
    services::tenancy_service::TenancyService,
};

#[derive(Clone)]
pub struct FormService {
    forms: FormRepository,
    tenancy: TenancyService,
}

impl FormService {
    pub fn new(forms: FormRepository, tenancy: TenancyService) -> Self {
        Self { forms, tenancy }
    }

    pub async fn list(&self, user: &SessionUser) -> Result<Vec<Form>, AppError> {
        self.tenancy.visible_forms(user).await
    }

    // O formulário pertence a quem o criou
    pub async fn create(&self, user: &SessionUser, payload: &CreateFormPayload) -> Result<Form, AppError> {
        let form = self
            .forms
            .create(&NewForm {
                nombre: &payload.nombre,
                secciones: &payload.secciones,
                creador_id: &user.uid,
                cliente_admin_id: &user.uid,
                fecha_creacion: SERVER_TIMESTAMP,
            })
            .await?;

        tracing::info!("📋 Formulário '{}' criado por {}", form.nombre, user.uid);
        Ok(form)
    }
}
