// src/db/user_repo.rs

use serde_json::{json, Map};
use std::sync::Arc;

use crate::{
    common::error::AppError,
    db::document_store::{decode_all, to_fields, Collection, Direction, DocumentStore, Query, SERVER_TIMESTAMP},
    models::{
        auth::{Permissions, Role},
        user::{NewOperator, UserProfile},
    },
};

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

// O repositório de usuários, responsável por todas as interações com a coleção `usuarios`
#[derive(Clone)]
pub struct UserRepository {
    store: Arc<dyn DocumentStore>,
}

impl UserRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    // Busca um perfil pelo seu ID (o `sub` do token)
    pub async fn find_by_id(&self, id: &str) -> Result<Option<UserProfile>, AppError> {
        self.store
            .get(Collection::Usuarios, id)
            .await?
            .map(|doc| doc.decode())
            .transpose()
    }

    // E-mails são gravados normalizados (minúsculas, sem espaços)
    pub async fn find_by_email(&self, email: &str) -> Result<Option<UserProfile>, AppError> {
        let docs = self
            .store
            .query(Query::new(Collection::Usuarios).eq("email", normalize_email(email)).limit(1))
            .await?;
        docs.into_iter().next().map(|doc| doc.decode()).transpose()
    }

    /// IDs dos usuários delegados a um administrador (um nível só).
    pub async fn delegated_ids(&self, admin_id: &str) -> Result<Vec<String>, AppError> {
        let docs = self
            .store
            .query(Query::new(Collection::Usuarios).eq("clienteAdminId", admin_id))
            .await?;
        Ok(docs.into_iter().map(|doc| doc.id).collect())
    }

    /// Operários em ordem de e-mail; com `admin_id`, apenas os daquele administrador.
    pub async fn list_operators(&self, admin_id: Option<&str>) -> Result<Vec<UserProfile>, AppError> {
        let mut query = Query::new(Collection::Usuarios).eq("role", Role::Operario.as_str());
        if let Some(admin_id) = admin_id {
            query = query.eq("clienteAdminId", admin_id);
        }
        decode_all(self.store.query(query.order_by("email", Direction::Asc)).await?)
    }

    // Cria o perfil de um novo operário, sem nenhuma permissão
    pub async fn create_operator(&self, email: &str, admin_id: &str) -> Result<UserProfile, AppError> {
        let email = normalize_email(email);
        if self.find_by_email(&email).await?.is_some() {
            return Err(AppError::EmailAlreadyExists);
        }

        let fields = to_fields(&NewOperator {
            email: &email,
            role: Role::Operario,
            cliente_admin_id: admin_id,
            permisos: Permissions::default(),
            created_at: SERVER_TIMESTAMP,
        })?;
        self.store.create(Collection::Usuarios, fields).await?.decode()
    }

    pub async fn update_permissions(&self, id: &str, permisos: &Permissions) -> Result<(), AppError> {
        let mut patch = Map::new();
        patch.insert("permisos".to_string(), json!(permisos));
        self.store.update(Collection::Usuarios, id, patch).await
    }
}
