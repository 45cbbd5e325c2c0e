// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Users ---
        handlers::auth::get_me,

        // --- Companies ---
        handlers::companies::list_companies,
        handlers::companies::create_company,
        handlers::companies::get_company,
        handlers::companies::list_company_branches,
        handlers::companies::create_branch,
        handlers::companies::list_branches,

        // --- Forms ---
        handlers::forms::list_forms,
        handlers::forms::create_form,

        // --- Audits ---
        handlers::audits::list_audits,
        handlers::audits::schedule_audit,
        handlers::audits::complete_audit,
        handlers::audits::delete_audit,

        // --- Dashboard ---
        handlers::dashboard::get_overview,

        // --- Reports ---
        handlers::reports::save_report,
        handlers::reports::list_reports,
        handlers::reports::list_report_companies,
        handlers::reports::get_report,

        // --- Operators ---
        handlers::operators::list_operators,
        handlers::operators::create_operator,
        handlers::operators::update_operator_permissions,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::Role,
            models::auth::Permissions,
            models::auth::PermissionPatch,
            models::auth::SessionUser,
            models::user::UserProfile,
            models::user::SessionProfile,
            models::user::CreateOperatorPayload,

            // --- Companies ---
            models::company::Company,
            models::company::Branch,
            models::company::CreateCompanyPayload,
            models::company::CreateBranchPayload,

            // --- Forms ---
            models::form::Section,
            models::form::Form,
            models::form::CreateFormPayload,

            // --- Audits ---
            models::audit::AuditState,
            models::audit::ScheduledAudit,
            models::audit::ScheduleAuditPayload,

            // --- Dashboard ---
            models::dashboard::DashboardCounts,
            models::dashboard::DashboardOverview,

            // --- Reports ---
            models::report::AnswerTally,
            models::report::AnswerTallyExcludingNa,
            models::report::ReportCompany,
            models::report::ReportForm,
            models::report::Report,
            models::report::SaveReportPayload,
            models::report::ReportLine,
            models::report::ReportDetail,
        )
    ),
    tags(
        (name = "Users", description = "Dados do Usuário e Perfil"),
        (name = "Companies", description = "Empresas e Sucursais"),
        (name = "Forms", description = "Formulários de Checklist"),
        (name = "Audits", description = "Agenda de Auditorias"),
        (name = "Dashboard", description = "Painel do Cliente Administrador"),
        (name = "Reports", description = "Reportes de Auditoria"),
        (name = "Operators", description = "Gestão de Operários e Permissões")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}
