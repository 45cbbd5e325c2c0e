// src/config.rs

use anyhow::Context;
use serde_json::{Map, Value};
use sqlx::postgres::PgPoolOptions;
use std::{
    env,
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use crate::{
    common::i18n::I18nStore,
    db::{
        document_store::Collection,
        AuditRepository, CompanyRepository, DocumentStore, FormRepository, LocalObjectStorage,
        MemoryDocumentStore, ObjectStorage, PgDocumentStore, ReportRepository, UserRepository,
    },
    services::{
        audit_service::AuditService, auth::AuthService, company_service::CompanyService,
        dashboard_service::DashboardService, form_service::FormService, operator_service::OperatorService,
        report_service::ReportService, tenancy_service::TenancyService,
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

// Tudo que vem do ambiente (.env incluso)
#[derive(Debug, Clone)]
pub struct Config {
    pub server_addr: String,
    pub jwt_secret: String,
    pub store_backend: StoreBackend,
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub storage_dir: PathBuf,
    pub storage_public_url: String,
    /// Perfis `{ uid: perfil }` carregados no store em memória na subida.
    pub seed_profiles_file: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let store_backend = match env::var("STORE_BACKEND").unwrap_or_else(|_| "postgres".into()).as_str() {
            "postgres" => StoreBackend::Postgres,
            "memory" => StoreBackend::Memory,
            other => anyhow::bail!("STORE_BACKEND desconhecido: {}", other),
        };

        let database_max_connections = match env::var("DATABASE_MAX_CONNECTIONS") {
            Ok(value) => value
                .parse()
                .with_context(|| format!("DATABASE_MAX_CONNECTIONS inválido: {}", value))?,
            Err(_) => 5,
        };

        Ok(Self {
            server_addr: env::var("SERVER_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into()),
            jwt_secret: env::var("JWT_SECRET").context("JWT_SECRET deve ser definido")?,
            store_backend,
            database_url: env::var("DATABASE_URL").ok(),
            database_max_connections,
            storage_dir: env::var("STORAGE_DIR").unwrap_or_else(|_| "./storage".into()).into(),
            storage_public_url: env::var("STORAGE_PUBLIC_URL")
                .unwrap_or_else(|_| "http://localhost:3000/files".into()),
            seed_profiles_file: env::var("SEED_PROFILES_FILE").ok().map(PathBuf::from),
        })
    }
}

// Os perfis vivem no provedor de autenticação; no store em memória eles vêm de um arquivo
async fn seed_profiles(store: &MemoryDocumentStore, path: &Path) -> anyhow::Result<usize> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Falha ao ler {}", path.display()))?;
    let profiles: Map<String, Value> =
        serde_json::from_str(&raw).with_context(|| format!("{} deve ser um objeto {{ uid: perfil }}", path.display()))?;

    let mut seeded = 0;
    for (uid, profile) in profiles {
        let Value::Object(data) = profile else {
            anyhow::bail!("O perfil {} não é um objeto JSON", uid);
        };
        store.insert_with_id(Collection::Usuarios, &uid, data).await;
        seeded += 1;
    }
    Ok(seeded)
}

// O estado compartilhado, clonado para cada handler
#[derive(Clone)]
pub struct AppState {
    pub i18n_store: I18nStore,
    pub auth_service: AuthService,
    pub company_service: CompanyService,
    pub form_service: FormService,
    pub audit_service: AuditService,
    pub dashboard_service: DashboardService,
    pub report_service: ReportService,
    pub operator_service: OperatorService,
}

impl AppState {
    /// Conecta o backend escolhido (rodando as migrações no Postgres) e monta os serviços.
    pub async fn new(config: &Config) -> anyhow::Result<Self> {
        let store: Arc<dyn DocumentStore> = match config.store_backend {
            StoreBackend::Postgres => {
                let database_url = config
                    .database_url
                    .as_deref()
                    .context("DATABASE_URL deve ser definida com STORE_BACKEND=postgres")?;

                let db_pool = PgPoolOptions::new()
                    .max_connections(config.database_max_connections)
                    .acquire_timeout(Duration::from_secs(3))
                    .connect(database_url)
                    .await
                    .context("Falha ao conectar ao banco de dados")?;
                tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

                sqlx::migrate!()
                    .run(&db_pool)
                    .await
                    .context("Falha ao rodar as migrações do banco de dados")?;
                tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

                Arc::new(PgDocumentStore::new(db_pool))
            }
            StoreBackend::Memory => {
                tracing::warn!("⚠️ Usando o store em memória: nada será persistido");
                let memory = MemoryDocumentStore::new();
                match &config.seed_profiles_file {
                    Some(path) => {
                        let seeded = seed_profiles(&memory, path).await?;
                        tracing::info!("✅ {} perfis de usuário carregados de {}", seeded, path.display());
                    }
                    None => tracing::warn!("⚠️ SEED_PROFILES_FILE não definido: nenhum token terá perfil"),
                }
                Arc::new(memory)
            }
        };

        let storage = Arc::new(LocalObjectStorage::new(&config.storage_dir, &config.storage_public_url));
        Ok(Self::from_parts(store, storage, config.jwt_secret.clone()))
    }

    // --- Monta o grafo de dependências ---
    pub fn from_parts(store: Arc<dyn DocumentStore>, storage: Arc<dyn ObjectStorage>, jwt_secret: String) -> Self {
        let user_repo = UserRepository::new(store.clone());
        let company_repo = CompanyRepository::new(store.clone());
        let form_repo = FormRepository::new(store.clone());
        let audit_repo = AuditRepository::new(store.clone());
        let report_repo = ReportRepository::new(store);

        let tenancy = TenancyService::new(
            user_repo.clone(),
            company_repo.clone(),
            form_repo.clone(),
            audit_repo.clone(),
            report_repo.clone(),
        );

        Self {
            i18n_store: I18nStore::new(),
            auth_service: AuthService::new(user_repo.clone(), jwt_secret),
            company_service: CompanyService::new(company_repo, tenancy.clone()),
            form_service: FormService::new(form_repo, tenancy.clone()),
            audit_service: AuditService::new(audit_repo, tenancy.clone()),
            dashboard_service: DashboardService::new(tenancy.clone()),
            report_service: ReportService::new(report_repo, storage, tenancy),
            operator_service: OperatorService::new(user_repo),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::error::AppError;

    fn memory_config(dir: &Path, seed: Option<PathBuf>) -> Config {
        Config {
            server_addr: "127.0.0.1:0".into(),
            jwt_secret: "segredo".into(),
            store_backend: StoreBackend::Memory,
            database_url: None,
            database_max_connections: 1,
            storage_dir: dir.join("storage"),
            storage_public_url: "http://localhost/files".into(),
            seed_profiles_file: seed,
        }
    }

    #[tokio::test]
    async fn memory_backend_sessions_come_from_seeded_profiles() {
        let dir = tempfile::tempdir().unwrap();
        let seed = dir.path().join("perfiles.json");
        std::fs::write(
            &seed,
            r#"{ "T": { "email": "admin@acme.com", "role": "max", "permisos": { "puedeCrearEmpresas": true } } }"#,
        )
        .unwrap();

        let state = AppState::new(&memory_config(dir.path(), Some(seed))).await.unwrap();

        let token = state.auth_service.issue_token("T").unwrap();
        let session = state.auth_service.validate_token(&token).await.unwrap();
        assert_eq!(session.email, "admin@acme.com");
        assert!(session.permisos.puede_crear_empresas);

        let stranger = state.auth_service.issue_token("nadie").unwrap();
        assert!(matches!(
            state.auth_service.validate_token(&stranger).await,
            Err(AppError::UserNotFound)
        ));
    }

    #[tokio::test]
    async fn seed_file_must_map_uids_to_objects() {
        let dir = tempfile::tempdir().unwrap();
        let seed = dir.path().join("perfiles.json");
        std::fs::write(&seed, r#"{ "T": "max" }"#).unwrap();

        assert!(AppState::new(&memory_config(dir.path(), Some(seed))).await.is_err());
    }
}
