// src/services/dashboard_service.rs

use chrono::NaiveDate;

use crate::{
    common::error::AppError,
    models::{
        audit::{AuditState, ScheduledAudit},
        auth::SessionUser,
        dashboard::{DashboardCounts, DashboardOverview},
    },
    services::tenancy_service::TenancyService,
};

pub const UPCOMING_LIMIT: usize = 5;

// ---
// Derivações puras sobre a lista já carregada
// ---

/// (agendadas, completadas)
pub fn partition_by_state(audits: &[ScheduledAudit]) -> (Vec<ScheduledAudit>, Vec<ScheduledAudit>) {
    audits
        .iter()
        .cloned()
        .partition(|a| a.estado == AuditState::Agendada)
}

/// Igualdade exata da string `fecha` (YYYY-MM-DD).
pub fn audits_on(audits: &[ScheduledAudit], day: NaiveDate) -> Vec<ScheduledAudit> {
    let day = day.format("%Y-%m-%d").to_string();
    audits.iter().filter(|a| a.fecha == day).cloned().collect()
}

/// Próximas agendadas a partir de hoje (inclusive), da mais próxima para a mais distante.
pub fn upcoming(audits: &[ScheduledAudit], today: NaiveDate, limit: usize) -> Vec<ScheduledAudit> {
    let today = today.format("%Y-%m-%d").to_string();
    let mut next: Vec<ScheduledAudit> = audits
        .iter()
        .filter(|a| a.estado == AuditState::Agendada && a.fecha >= today)
        .cloned()
        .collect();
    // Datas ISO ordenam corretamente como texto
    next.sort_by(|a, b| a.fecha.cmp(&b.fecha));
    next.truncate(limit);
    next
}

// Falha de leitura de uma seção não derruba o painel
fn or_empty<T>(section: &str, result: Result<Vec<T>, AppError>) -> Vec<T> {
    result.unwrap_or_else(|e| {
        tracing::error!("Erro carregando {}: {}", section, e);
        Vec::new()
    })
}

#[derive(Clone)]
pub struct DashboardService {
    tenancy: TenancyService,
}

impl DashboardService {
    pub fn new(tenancy: TenancyService) -> Self {
        Self { tenancy }
    }

    /// Empresas primeiro (as sucursais dependem delas); o resto em paralelo.
    pub async fn overview(&self, user: &SessionUser, today: NaiveDate) -> DashboardOverview {
        let empresas = or_empty("empresas", self.tenancy.visible_companies(user).await);

        let (sucursales, formularios, auditorias) = tokio::join!(
            self.tenancy.visible_branches(user, &empresas),
            self.tenancy.visible_forms(user),
            self.tenancy.visible_audits(user),
        );
        let sucursales = or_empty("sucursales", sucursales);
        let formularios = or_empty("formularios", formularios);
        let auditorias = or_empty("auditorias", auditorias);

        let (pendientes, completadas) = partition_by_state(&auditorias);
        let del_dia = audits_on(&auditorias, today);
        let proximas = upcoming(&auditorias, today, UPCOMING_LIMIT);

        tracing::info!(
            "📊 Painel de {}: {} empresas, {} sucursais, {} formulários, {} auditorias",
            user.uid,
            empresas.len(),
            sucursales.len(),
            formularios.len(),
            auditorias.len()
        );

        DashboardOverview {
            hoy: today.format("%Y-%m-%d").to_string(),
            resumen: DashboardCounts {
                empresas: empresas.len(),
                sucursales: sucursales.len(),
                formularios: formularios.len(),
                auditorias: auditorias.len(),
                pendientes: pendientes.len(),
                completadas: completadas.len(),
                del_dia: del_dia.len(),
            },
            empresas,
            sucursales,
            formularios,
            auditorias,
            pendientes,
            completadas,
            del_dia,
            proximas,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn audit(id: &str, fecha: &str, estado: AuditState) -> ScheduledAudit {
        ScheduledAudit {
            id: id.into(),
            empresa: "Acme".into(),
            sucursal: None,
            formulario: None,
            descripcion: None,
            fecha: fecha.into(),
            hora: "10:00".into(),
            estado,
            usuario_id: "u1".into(),
            usuario_nombre: None,
            cliente_admin_id: None,
            fecha_creacion: None,
            fecha_actualizacion: None,
            fecha_completada: None,
        }
    }

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn partition_counts_and_union_match_input() {
        let audits = vec![
            audit("1", "2025-01-01", AuditState::Agendada),
            audit("2", "2025-01-02", AuditState::Completada),
            audit("3", "2025-01-03", AuditState::Agendada),
            audit("4", "2025-01-04", AuditState::Completada),
            audit("5", "2025-01-05", AuditState::Agendada),
        ];
        let (pending, done) = partition_by_state(&audits);

        assert_eq!(pending.len(), 3);
        assert_eq!(done.len(), 2);
        let union: HashSet<String> = pending.iter().chain(done.iter()).map(|a| a.id.clone()).collect();
        let input: HashSet<String> = audits.iter().map(|a| a.id.clone()).collect();
        assert_eq!(union, input);
    }

    #[test]
    fn today_is_an_exact_date_match() {
        let audits = vec![
            audit("1", "2025-06-15", AuditState::Agendada),
            audit("2", "2025-06-15", AuditState::Completada),
            audit("3", "2025-06-16", AuditState::Agendada),
        ];
        let ids: Vec<String> = audits_on(&audits, day("2025-06-15")).into_iter().map(|a| a.id).collect();
        assert_eq!(ids, vec!["1", "2"]);
    }

    #[test]
    fn upcoming_keeps_five_future_scheduled_sorted() {
        let today = day("2025-06-15");
        let audits = vec![
            audit("a", "2025-06-20", AuditState::Agendada),
            audit("b", "2025-06-10", AuditState::Agendada),
            audit("c", "2025-06-15", AuditState::Agendada),
            audit("d", "2025-07-01", AuditState::Agendada),
            audit("e", "2025-06-16", AuditState::Completada),
            audit("f", "2025-06-18", AuditState::Agendada),
            audit("g", "2025-06-01", AuditState::Agendada),
            audit("h", "2025-06-30", AuditState::Agendada),
            audit("i", "2025-06-17", AuditState::Agendada),
            audit("j", "2025-06-14", AuditState::Completada),
        ];

        let next = upcoming(&audits, today, UPCOMING_LIMIT);

        assert!(next.len() <= 5);
        assert!(next.iter().all(|a| a.estado == AuditState::Agendada));
        assert!(next.iter().all(|a| a.fecha.as_str() >= "2025-06-15"));
        let fechas: Vec<&str> = next.iter().map(|a| a.fecha.as_str()).collect();
        assert_eq!(fechas, vec!["2025-06-15", "2025-06-17", "2025-06-18", "2025-06-20", "2025-06-30"]);
    }

    #[test]
    fn upcoming_with_nothing_ahead_is_empty() {
        let audits = vec![audit("old", "2020-01-01", AuditState::Agendada)];
        assert!(upcoming(&audits, day("2025-01-01"), UPCOMING_LIMIT).is_empty());
    }
}
