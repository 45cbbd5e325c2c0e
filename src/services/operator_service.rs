// src/services/operator_service.rs

use crate::{
    common::error::AppError,
    db::UserRepository,
    models::{
        auth::{PermissionPatch, Role, SessionUser},
        user::UserProfile,
    },
};

// Gestão dos operários de um cliente administrador
#[derive(Clone)]
pub struct OperatorService {
    users: UserRepository,
}

impl OperatorService {
    pub fn new(users: UserRepository) -> Self {
        Self { users }
    }

    fn require_admin(user: &SessionUser) -> Result<(), AppError> {
        if user.is_admin() { Ok(()) } else { Err(AppError::AdminOnly) }
    }

    /// supermax vê todos os operários; max só os seus.
    pub async fn list(&self, user: &SessionUser) -> Result<Vec<UserProfile>, AppError> {
        Self::require_admin(user)?;
        let admin_filter = match user.role {
            Role::Supermax => None,
            _ => Some(user.uid.as_str()),
        };
        self.users.list_operators(admin_filter).await
    }

    pub async fn create(&self, user: &SessionUser, email: &str) -> Result<UserProfile, AppError> {
        Self::require_admin(user)?;
        let operator = self.users.create_operator(email, &user.uid).await?;
        tracing::info!("👷 Operário {} ({}) criado por {}", operator.id, operator.email, user.uid);
        Ok(operator)
    }

    /// Aplica as edições pendentes sobre as permissões atuais do operário e grava só esse usuário.
    pub async fn update_permissions(
        &self,
        user: &SessionUser,
        operator_id: &str,
        patch: &PermissionPatch,
    ) -> Result<UserProfile, AppError> {
        Self::require_admin(user)?;

        let mut operator = self
            .users
            .find_by_id(operator_id)
            .await?
            .ok_or(AppError::UserNotFound)?;

        let managed = user.role == Role::Supermax
            || (operator.role == Role::Operario && operator.cliente_admin_id.as_deref() == Some(user.uid.as_str()));
        if !managed {
            return Err(AppError::AccessDenied);
        }

        if patch.is_empty() {
            return Ok(operator);
        }

        let merged = operator.permisos.merged_with(patch);
        self.users.update_permissions(operator_id, &merged).await?;
        tracing::info!("🔐 Permissões do operário {} atualizadas por {}", operator_id, user.uid);

        operator.permisos = merged;
        Ok(operator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::{document_store::DocumentStore, MemoryDocumentStore},
        models::auth::Permissions,
    };
    use std::sync::Arc;

    fn session(uid: &str, role: Role) -> SessionUser {
        SessionUser {
            uid: uid.into(),
            email: format!("{uid}@example.com"),
            display_name: None,
            role,
            cliente_admin_id: None,
            permisos: Permissions::default(),
        }
    }

    fn service() -> OperatorService {
        let store: Arc<dyn DocumentStore> = Arc::new(MemoryDocumentStore::new());
        OperatorService::new(UserRepository::new(store))
    }

    #[tokio::test]
    async fn operators_cannot_manage_operators() {
        let service = service();
        let err = service.list(&session("op", Role::Operario)).await.unwrap_err();
        assert!(matches!(err, AppError::AdminOnly));
    }

    #[tokio::test]
    async fn new_operator_has_no_permissions_and_email_is_unique() {
        let service = service();
        let admin = session("T", Role::Max);

        let operator = service.create(&admin, "op@acme.com").await.unwrap();
        assert_eq!(operator.role, Role::Operario);
        assert_eq!(operator.cliente_admin_id.as_deref(), Some("T"));
        assert_eq!(operator.permisos, Permissions::default());

        let dup = service.create(&admin, "op@acme.com").await.unwrap_err();
        assert!(matches!(dup, AppError::EmailAlreadyExists));
    }

    #[tokio::test]
    async fn email_uniqueness_ignores_case() {
        let service = service();
        let admin = session("T", Role::Max);

        let operator = service.create(&admin, "Op@Acme.com").await.unwrap();
        assert_eq!(operator.email, "op@acme.com");

        let dup = service.create(&admin, "op@acme.com").await.unwrap_err();
        assert!(matches!(dup, AppError::EmailAlreadyExists));
    }

    #[tokio::test]
    async fn admins_only_list_their_own_operators() {
        let service = service();
        let t = session("T", Role::Max);
        let u = session("U", Role::Max);
        service.create(&t, "a@acme.com").await.unwrap();
        service.create(&t, "b@acme.com").await.unwrap();
        service.create(&u, "c@beta.com").await.unwrap();

        service.create(&t, "0@acme.com").await.unwrap();

        let emails: Vec<String> = service.list(&t).await.unwrap().into_iter().map(|o| o.email).collect();
        assert_eq!(emails, vec!["0@acme.com", "a@acme.com", "b@acme.com"]);
        assert_eq!(service.list(&u).await.unwrap().len(), 1);
        assert_eq!(service.list(&session("root", Role::Supermax)).await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn permission_edit_merges_over_current_values() {
        let service = service();
        let admin = session("T", Role::Max);
        let operator = service.create(&admin, "op@acme.com").await.unwrap();

        let first = PermissionPatch { puede_crear_empresas: Some(true), ..Default::default() };
        service.update_permissions(&admin, &operator.id, &first).await.unwrap();

        let second = PermissionPatch { puede_crear_auditorias: Some(true), ..Default::default() };
        let updated = service.update_permissions(&admin, &operator.id, &second).await.unwrap();

        assert!(updated.permisos.puede_crear_empresas);
        assert!(updated.permisos.puede_crear_auditorias);
        assert!(!updated.permisos.puede_gestionar_usuarios);

        let reloaded = service.list(&admin).await.unwrap();
        assert_eq!(reloaded[0].permisos, updated.permisos);
    }

    #[tokio::test]
    async fn another_tenant_cannot_edit_the_operator() {
        let service = service();
        let operator = service.create(&session("T", Role::Max), "op@acme.com").await.unwrap();

        let patch = PermissionPatch { puede_agregar_socios: Some(true), ..Default::default() };
        let err = service
            .update_permissions(&session("U", Role::Max), &operator.id, &patch)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::AccessDenied));
    }
}
