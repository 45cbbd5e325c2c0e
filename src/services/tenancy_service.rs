// src/services/tenancy_service.rs

use futures::future::try_join_all;
use std::collections::HashSet;

use crate::{
    common::error::AppError,
    db::{
        document_store::{chunk_ids, IN_QUERY_LIMIT},
        AuditRepository, CompanyRepository, FormRepository, ReportRepository, UserRepository,
    },
    models::{
        audit::ScheduledAudit,
        auth::{Role, SessionUser},
        company::{Branch, Company},
        form::Form,
        report::Report,
    },
};

/// Limites de leitura de auditorias por papel.
pub const SUPERMAX_AUDIT_CAP: usize = 50;
pub const ADMIN_AUDIT_CAP: usize = 30;
pub const DELEGATED_AUDIT_CAP: usize = 20;

// ---
// A regra de visibilidade
// ---
/// Quais donos (`propietarioId`, `clienteAdminId`, `usuarioId`) um usuário enxerga.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TenancyScope {
    Everything,
    /// O próprio usuário primeiro, depois os delegados, sem repetição.
    Owners(Vec<String>),
}

impl TenancyScope {
    /// supermax: tudo. max: ele mesmo + usuários com `clienteAdminId` = ele (um nível).
    /// operario: só ele mesmo.
    pub fn for_session(user: &SessionUser, delegated: impl IntoIterator<Item = String>) -> Self {
        match user.role {
            Role::Supermax => TenancyScope::Everything,
            Role::Operario => TenancyScope::Owners(vec![user.uid.clone()]),
            Role::Max => {
                let mut owners = vec![user.uid.clone()];
                for id in delegated {
                    if !owners.contains(&id) {
                        owners.push(id);
                    }
                }
                TenancyScope::Owners(owners)
            }
        }
    }

    pub fn admits(&self, owner: &str) -> bool {
        match self {
            TenancyScope::Everything => true,
            TenancyScope::Owners(owners) => owners.iter().any(|o| o == owner),
        }
    }

    /// Mantém os registros cujo dono é admitido. Registros sem dono só passam no `Everything`.
    pub fn filter<T>(&self, records: Vec<T>, owner_of: impl Fn(&T) -> Option<&str>) -> Vec<T> {
        match self {
            TenancyScope::Everything => records,
            TenancyScope::Owners(_) => records
                .into_iter()
                .filter(|r| owner_of(r).is_some_and(|o| self.admits(o)))
                .collect(),
        }
    }
}

#[derive(Clone)]
pub struct TenancyService {
    users: UserRepository,
    companies: CompanyRepository,
    forms: FormRepository,
    audits: AuditRepository,
    reports: ReportRepository,
}

impl TenancyService {
    pub fn new(
        users: UserRepository,
        companies: CompanyRepository,
        forms: FormRepository,
        audits: AuditRepository,
        reports: ReportRepository,
    ) -> Self {
        Self { users, companies, forms, audits, reports }
    }

    /// Resolve o escopo. Só o `max` precisa consultar os delegados.
    pub async fn scope_for(&self, user: &SessionUser) -> Result<TenancyScope, AppError> {
        let delegated = match user.role {
            Role::Max => self.users.delegated_ids(&user.uid).await?,
            _ => Vec::new(),
        };
        Ok(TenancyScope::for_session(user, delegated))
    }

    pub async fn visible_companies(&self, user: &SessionUser) -> Result<Vec<Company>, AppError> {
        match self.scope_for(user).await? {
            TenancyScope::Everything => self.companies.list_all().await,
            // Uma leitura por dono, em paralelo
            TenancyScope::Owners(owners) => {
                let per_owner = try_join_all(owners.iter().map(|o| self.companies.list_by_owner(o))).await?;
                Ok(per_owner.into_iter().flatten().collect())
            }
        }
    }

    pub async fn can_view_company(&self, user: &SessionUser, company: &Company) -> Result<bool, AppError> {
        Ok(self.scope_for(user).await?.admits(&company.propietario_id))
    }

    /// Sucursais das empresas visíveis. As consultas "in" vão em lotes de IN_QUERY_LIMIT.
    pub async fn visible_branches(&self, user: &SessionUser, companies: &[Company]) -> Result<Vec<Branch>, AppError> {
        if user.role == Role::Supermax {
            return self.companies.list_all_branches().await;
        }
        if companies.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<String> = companies.iter().map(|c| c.id.clone()).collect();
        let names: Vec<String> = companies.iter().map(|c| c.nombre.clone()).collect();
        self.branches_of(&ids, &names).await
    }

    pub async fn branches_of_company(&self, company: &Company) -> Result<Vec<Branch>, AppError> {
        self.branches_of(std::slice::from_ref(&company.id), std::slice::from_ref(&company.nombre))
            .await
    }

    // Casa por `empresaId`; sucursais antigas, sem `empresaId`, casam pelo nome da empresa.
    async fn branches_of(&self, ids: &[String], names: &[String]) -> Result<Vec<Branch>, AppError> {
        let by_id = try_join_all(
            chunk_ids(ids, IN_QUERY_LIMIT)
                .into_iter()
                .map(|chunk| async move { self.companies.branches_where_in("empresaId", &chunk).await }),
        );
        let by_name = try_join_all(
            chunk_ids(names, IN_QUERY_LIMIT)
                .into_iter()
                .map(|chunk| async move { self.companies.branches_where_in("empresa", &chunk).await }),
        );
        let (by_id, by_name) = tokio::try_join!(by_id, by_name)?;

        let legacy = by_name.into_iter().flatten().filter(|b| b.empresa_id.is_none());
        let mut seen = HashSet::new();
        Ok(by_id
            .into_iter()
            .flatten()
            .chain(legacy)
            .filter(|b| seen.insert(b.id.clone()))
            .collect())
    }

    pub async fn visible_forms(&self, user: &SessionUser) -> Result<Vec<Form>, AppError> {
        match self.scope_for(user).await? {
            TenancyScope::Everything => self.forms.list_all().await,
            TenancyScope::Owners(owners) => {
                let per_owner = try_join_all(owners.iter().map(|o| self.forms.list_by_owner(o))).await?;
                Ok(per_owner.into_iter().flatten().collect())
            }
        }
    }

    /// Auditorias com limite de leitura: 50 (supermax), 30 próprias + 20 por delegado (max).
    pub async fn visible_audits(&self, user: &SessionUser) -> Result<Vec<ScheduledAudit>, AppError> {
        match self.scope_for(user).await? {
            TenancyScope::Everything => self.audits.recent(SUPERMAX_AUDIT_CAP).await,
            TenancyScope::Owners(owners) => {
                let reads = owners.iter().map(|owner| {
                    let cap = if *owner == user.uid { ADMIN_AUDIT_CAP } else { DELEGATED_AUDIT_CAP };
                    self.audits.recent_by_user(owner, cap)
                });
                let per_owner = try_join_all(reads).await?;
                Ok(per_owner.into_iter().flatten().collect())
            }
        }
    }

    /// Reportes do tenant do usuário, filtrados pelo autor (`usuarioId`) dentro do escopo.
    pub async fn visible_reports(&self, user: &SessionUser) -> Result<Vec<Report>, AppError> {
        let scope = self.scope_for(user).await?;
        if scope == TenancyScope::Everything {
            return self.reports.list_all().await;
        }
        let tenant_reports = self
            .reports
            .list_by_owner("clienteAdminId", user.tenant_admin_id())
            .await?;
        Ok(scope.filter(tenant_reports, |r| r.usuario_id.as_deref()))
    }

    pub async fn can_view_report(&self, user: &SessionUser, report: &Report) -> Result<bool, AppError> {
        let scope = self.scope_for(user).await?;
        Ok(match &scope {
            TenancyScope::Everything => true,
            TenancyScope::Owners(_) => {
                report.cliente_admin_id.as_deref() == Some(user.tenant_admin_id())
                    && report.usuario_id.as_deref().is_some_and(|o| scope.admits(o))
            }
        })
    }
}
