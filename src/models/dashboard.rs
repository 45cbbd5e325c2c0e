// src/models/dashboard.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{
    audit::ScheduledAudit,
    company::{Branch, Company},
    form::Form,
};

// 1. Contadores dos cards do topo
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardCounts {
    pub empresas: usize,
    pub sucursales: usize,
    pub formularios: usize,
    pub auditorias: usize,
    pub pendientes: usize,
    pub completadas: usize,
    pub del_dia: usize,
}

// 2. Visão completa do painel do cliente administrador
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardOverview {
    pub hoy: String,
    pub resumen: DashboardCounts,
    pub empresas: Vec<Company>,
    pub sucursales: Vec<Branch>,
    pub formularios: Vec<Form>,
    pub auditorias: Vec<ScheduledAudit>,
    pub pendientes: Vec<ScheduledAudit>,
    pub completadas: Vec<ScheduledAudit>,
    pub del_dia: Vec<ScheduledAudit>,
    pub proximas: Vec<ScheduledAudit>,
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct DashboardQuery {
    /// Sobrescreve o "hoje" (UTC) usado nas derivações. Formato YYYY-MM-DD.
    pub today: Option<String>,
}
