// src/services/company_service.rs

use crate::{
    common::error::AppError,
    db::{document_store::SERVER_TIMESTAMP, CompanyRepository},
    models::{
        auth::{Capability, SessionUser},
        company::{Branch, Company, CreateBranchPayload, CreateCompanyPayload, NewBranch, NewCompany},
    },
    services::tenancy_service::TenancyService,
};

// Empresas e sucursais, sempre filtradas pelo escopo de quem pede
#[derive(Clone)]
pub struct CompanyService {
    companies: CompanyRepository,
    tenancy: TenancyService,
}

impl CompanyService {
    pub fn new(companies: CompanyRepository, tenancy: TenancyService) -> Self {
        Self { companies, tenancy }
    }

    pub async fn list(&self, user: &SessionUser) -> Result<Vec<Company>, AppError> {
        self.tenancy.visible_companies(user).await
    }

    pub async fn create(&self, user: &SessionUser, payload: &CreateCompanyPayload) -> Result<Company, AppError> {
        if !user.can(Capability::CreateCompanies) {
            return Err(AppError::MissingCapability(Capability::CreateCompanies.slug()));
        }

        let company = self
            .companies
            .create(&NewCompany {
                nombre: &payload.nombre,
                logo: payload.logo.as_deref().unwrap_or_default(),
                propietario_id: &user.uid,
                fecha_creacion: SERVER_TIMESTAMP,
            })
            .await?;

        tracing::info!("🏢 Empresa '{}' ({}) criada por {}", company.nombre, company.id, user.uid);
        Ok(company)
    }

    /// 404 quando não existe, 403 quando existe mas está fora do escopo.
    pub async fn get(&self, user: &SessionUser, id: &str) -> Result<Company, AppError> {
        let company = self
            .companies
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::DocumentNotFound { collection: "empresas", id: id.to_string() })?;

        if !self.tenancy.can_view_company(user, &company).await? {
            return Err(AppError::AccessDenied);
        }
        Ok(company)
    }

    pub async fn list_all_branches(&self, user: &SessionUser) -> Result<Vec<Branch>, AppError> {
        let companies = self.tenancy.visible_companies(user).await?;
        self.tenancy.visible_branches(user, &companies).await
    }

    pub async fn list_branches(&self, user: &SessionUser, company_id: &str) -> Result<Vec<Branch>, AppError> {
        let company = self.get(user, company_id).await?;
        self.tenancy.branches_of_company(&company).await
    }

    pub async fn create_branch(
        &self,
        user: &SessionUser,
        company_id: &str,
        payload: &CreateBranchPayload,
    ) -> Result<Branch, AppError> {
        if !user.can(Capability::CreateBranches) {
            return Err(AppError::MissingCapability(Capability::CreateBranches.slug()));
        }
        let company = self.get(user, company_id).await?;

        let branch = self
            .companies
            .create_branch(&NewBranch {
                nombre: &payload.nombre,
                empresa_id: &company.id,
                empresa: &company.nombre,
                direccion: payload.direccion.as_deref(),
                telefono: payload.telefono.as_deref(),
                fecha_creacion: SERVER_TIMESTAMP,
                creado_por: &user.uid,
                creado_por_email: &user.email,
                cliente_admin_id: user.tenant_admin_id(),
            })
            .await?;

        tracing::info!("🏬 Sucursal '{}' criada na empresa {}", branch.nombre, company.id);
        Ok(branch)
    }
}
