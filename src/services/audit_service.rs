// src/services/audit_service.rs

use crate::{
    common::error::AppError,
    db::{document_store::SERVER_TIMESTAMP, AuditRepository},
    models::{
        audit::{AuditState, NewScheduledAudit, ScheduleAuditPayload, ScheduledAudit},
        auth::{Capability, SessionUser},
    },
    services::tenancy_service::TenancyService,
};

#[derive(Clone)]
pub struct AuditService {
    audits: AuditRepository,
    tenancy: TenancyService,
}

impl AuditService {
    pub fn new(audits: AuditRepository, tenancy: TenancyService) -> Self {
        Self { audits, tenancy }
    }

    /// Auditorias visíveis; com `fecha`, só as daquele dia.
    pub async fn list(&self, user: &SessionUser, fecha: Option<&str>) -> Result<Vec<ScheduledAudit>, AppError> {
        let mut audits = self.tenancy.visible_audits(user).await?;
        if let Some(fecha) = fecha {
            audits.retain(|a| a.fecha == fecha);
        }
        Ok(audits)
    }

    pub async fn schedule(&self, user: &SessionUser, payload: &ScheduleAuditPayload) -> Result<ScheduledAudit, AppError> {
        if !user.can(Capability::CreateAudits) {
            return Err(AppError::MissingCapability(Capability::CreateAudits.slug()));
        }

        let audit = self
            .audits
            .create(&NewScheduledAudit {
                empresa: &payload.empresa,
                sucursal: payload.sucursal.as_deref(),
                formulario: payload.formulario.as_deref(),
                descripcion: payload.descripcion.as_deref(),
                fecha: &payload.fecha,
                hora: &payload.hora,
                estado: AuditState::Agendada,
                usuario_id: &user.uid,
                usuario_nombre: user.display_label(),
                cliente_admin_id: user.tenant_admin_id(),
                fecha_creacion: SERVER_TIMESTAMP,
                fecha_actualizacion: SERVER_TIMESTAMP,
            })
            .await?;

        tracing::info!("📅 Auditoria {} agendada para {} {} por {}", audit.id, audit.fecha, audit.hora, user.uid);
        Ok(audit)
    }

    // Busca a auditoria e confere se o dono está no escopo de quem pede
    async fn load_owned(&self, user: &SessionUser, id: &str) -> Result<ScheduledAudit, AppError> {
        let audit = self
            .audits
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::DocumentNotFound { collection: "auditorias_agendadas", id: id.to_string() })?;

        if !self.tenancy.scope_for(user).await?.admits(&audit.usuario_id) {
            return Err(AppError::AccessDenied);
        }
        Ok(audit)
    }

    /// agendada -> completada. Completar de novo é conflito.
    pub async fn complete(&self, user: &SessionUser, id: &str) -> Result<ScheduledAudit, AppError> {
        let audit = self.load_owned(user, id).await?;
        if audit.estado == AuditState::Completada {
            return Err(AppError::AuditAlreadyCompleted(audit.id));
        }

        self.audits.mark_completed(id).await?;
        tracing::info!("✅ Auditoria {} completada por {}", id, user.uid);

        self.audits
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::DocumentNotFound { collection: "auditorias_agendadas", id: id.to_string() })
    }

    pub async fn delete(&self, user: &SessionUser, id: &str) -> Result<(), AppError> {
        self.load_owned(user, id).await?;
        self.audits.delete(id).await?;
        tracing::info!("🗑️ Auditoria {} excluída por {}", id, user.uid);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::{
            document_store::{Collection, DocumentStore},
            CompanyRepository, FormRepository, MemoryDocumentStore, ReportRepository, UserRepository,
        },
        models::auth::{Permissions, Role},
    };
    use serde_json::json;
    use std::sync::Arc;

    fn session(uid: &str, role: Role, permisos: Permissions) -> SessionUser {
        SessionUser {
            uid: uid.into(),
            email: format!("{uid}@example.com"),
            display_name: Some(format!("Nombre {uid}")),
            role,
            cliente_admin_id: None,
            permisos,
        }
    }

    fn can_schedule() -> Permissions {
        Permissions { puede_crear_auditorias: true, ..Default::default() }
    }

    fn payload(fecha: &str) -> ScheduleAuditPayload {
        ScheduleAuditPayload {
            empresa: "Acme".into(),
            sucursal: Some("Centro".into()),
            formulario: None,
            descripcion: None,
            fecha: fecha.into(),
            hora: "08:00".into(),
        }
    }

    async fn setup() -> (Arc<MemoryDocumentStore>, AuditService) {
        let memory = Arc::new(MemoryDocumentStore::new());
        let store: Arc<dyn DocumentStore> = memory.clone();
        let audits = AuditRepository::new(store.clone());
        let tenancy = TenancyService::new(
            UserRepository::new(store.clone()),
            CompanyRepository::new(store.clone()),
            FormRepository::new(store.clone()),
            audits.clone(),
            ReportRepository::new(store.clone()),
        );
        (memory, AuditService::new(audits, tenancy))
    }

    #[tokio::test]
    async fn schedule_requires_capability() {
        let (_, service) = setup().await;
        let user = session("op1", Role::Operario, Permissions::default());

        let err = service.schedule(&user, &payload("2025-06-15")).await.unwrap_err();
        assert!(matches!(err, AppError::MissingCapability("puedeCrearAuditorias")));
    }

    #[tokio::test]
    async fn scheduled_audit_starts_pending_and_completes_once() {
        let (_, service) = setup().await;
        let user = session("T", Role::Max, can_schedule());

        let audit = service.schedule(&user, &payload("2025-06-15")).await.unwrap();
        assert_eq!(audit.estado, AuditState::Agendada);
        assert_eq!(audit.usuario_nombre.as_deref(), Some("Nombre T"));
        assert_eq!(audit.cliente_admin_id.as_deref(), Some("T"));
        assert!(audit.fecha_creacion.is_some());

        let done = service.complete(&user, &audit.id).await.unwrap();
        assert_eq!(done.estado, AuditState::Completada);
        assert!(done.fecha_completada.is_some());

        let again = service.complete(&user, &audit.id).await.unwrap_err();
        assert!(matches!(again, AppError::AuditAlreadyCompleted(_)));
    }

    #[tokio::test]
    async fn admin_can_act_on_delegated_operator_audits_but_not_strangers() {
        let (memory, service) = setup().await;
        memory
            .insert_with_id(
                Collection::Usuarios,
                "op1",
                json!({ "email": "op1@example.com", "role": "operario", "clienteAdminId": "T" })
                    .as_object()
                    .cloned()
                    .unwrap(),
            )
            .await;

        let operator = session("op1", Role::Operario, can_schedule());
        let audit = service.schedule(&operator, &payload("2025-06-20")).await.unwrap();

        let stranger = session("X", Role::Max, can_schedule());
        let denied = service.delete(&stranger, &audit.id).await.unwrap_err();
        assert!(matches!(denied, AppError::AccessDenied));

        let admin = session("T", Role::Max, Permissions::default());
        service.delete(&admin, &audit.id).await.unwrap();
        assert!(service.list(&admin, None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn list_filters_by_exact_day() {
        let (_, service) = setup().await;
        let user = session("T", Role::Max, can_schedule());
        service.schedule(&user, &payload("2025-06-15")).await.unwrap();
        service.schedule(&user, &payload("2025-06-16")).await.unwrap();

        assert_eq!(service.list(&user, None).await.unwrap().len(), 2);
        let day = service.list(&user, Some("2025-06-16")).await.unwrap();
        assert_eq!(day.len(), 1);
        assert_eq!(day[0].fecha, "2025-06-16");
    }

    #[tokio::test]
    async fn missing_audit_is_not_found() {
        let (_, service) = setup().await;
        let user = session("T", Role::Max, Permissions::default());
        let err = service.complete(&user, "nope").await.unwrap_err();
        assert!(matches!(err, AppError::DocumentNotFound { .. }));
    }
}
