//! Dataset documents
//!
//! Typed shapes of the JSON files under `data/datasets/`. Keys on the wire
//! are the SIC3PRO export's Spanish names.

use serde::{Deserialize, Serialize};

/// Workflow state of a termination item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemState {
    #[serde(rename = "Completado")]
    Completed,
    #[serde(rename = "En progreso")]
    InProgress,
    #[serde(rename = "Pendiente")]
    Pending,
    #[serde(rename = "Retrasado")]
    Delayed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    #[serde(rename = "Alta")]
    High,
    #[serde(rename = "Media")]
    Medium,
    #[serde(rename = "Baja")]
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlertKind {
    #[serde(rename = "critica")]
    Critical,
    #[serde(rename = "advertencia")]
    Warning,
    #[serde(rename = "informativa")]
    Informative,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: String,
    #[serde(rename = "tipo")]
    pub kind: AlertKind,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "descripcion")]
    pub description: String,
    #[serde(rename = "fecha")]
    pub date: String,
    #[serde(rename = "accion_requerida")]
    pub action_required: bool,
}

// ============ termination.json ============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerminationItem {
    pub id: String,
    #[serde(rename = "descripcion")]
    pub description: String,
    pub area: String,
    #[serde(rename = "sistema")]
    pub system: String,
    #[serde(rename = "estado")]
    pub state: ItemState,
    #[serde(rename = "prioridad")]
    pub priority: Priority,
    #[serde(rename = "fecha_compromiso")]
    pub commitment_date: String,
    #[serde(rename = "fecha_real")]
    pub actual_date: Option<String>,
    #[serde(rename = "responsable")]
    pub owner: String,
    #[serde(rename = "dias_retraso")]
    pub days_delayed: u32,
    #[serde(rename = "progreso")]
    pub progress: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerminationMetadata {
    #[serde(rename = "tipo")]
    pub kind: String,
    #[serde(rename = "generado_en")]
    pub generated_at: String,
    #[serde(rename = "proyecto")]
    pub project: String,
    pub total_items: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerminationSummary {
    pub total: usize,
    #[serde(rename = "completados")]
    pub completed: usize,
    #[serde(rename = "en_progreso")]
    pub in_progress: usize,
    #[serde(rename = "pendientes")]
    pub pending: usize,
    #[serde(rename = "retrasados")]
    pub delayed: usize,
    #[serde(rename = "eficiencia")]
    pub efficiency: String,
    #[serde(rename = "tasa_completacion")]
    pub completion_rate: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaBreakdown {
    pub area: String,
    #[serde(rename = "sistema")]
    pub system: String,
    #[serde(rename = "completados")]
    pub completed: usize,
    #[serde(rename = "en_progreso")]
    pub in_progress: usize,
    #[serde(rename = "pendientes")]
    pub pending: usize,
    #[serde(rename = "retrasados")]
    pub delayed: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerminationReport {
    pub metadata: TerminationMetadata,
    #[serde(rename = "resumen")]
    pub summary: TerminationSummary,
    #[serde(rename = "por_area")]
    pub by_area: Vec<AreaBreakdown>,
    pub items: Vec<TerminationItem>,
    #[serde(rename = "alertas")]
    pub alerts: Vec<Alert>,
}

// ============ nonconformities.json / nonconforming.json ============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportMetadata {
    #[serde(rename = "tipo")]
    pub kind: String,
    #[serde(rename = "generado_en")]
    pub generated_at: String,
    #[serde(rename = "proyecto")]
    pub project: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NonconformitySummary {
    pub total: u32,
    #[serde(rename = "abiertas")]
    pub open: u32,
    #[serde(rename = "cerradas")]
    pub closed: u32,
    #[serde(rename = "en_progreso")]
    pub in_progress: u32,
    #[serde(rename = "tasa_resolucion")]
    pub resolution_rate: String,
    #[serde(rename = "tiempo_promedio_resolucion")]
    pub mean_resolution_time: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountByType {
    #[serde(rename = "tipo")]
    pub kind: String,
    #[serde(rename = "cantidad")]
    pub count: u32,
    #[serde(rename = "porcentaje")]
    pub percent: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountByMonth {
    #[serde(rename = "mes")]
    pub month: String,
    #[serde(rename = "cantidad")]
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriticalNonconformity {
    pub id: String,
    #[serde(rename = "descripcion")]
    pub description: String,
    #[serde(rename = "tipo")]
    pub kind: String,
    #[serde(rename = "prioridad")]
    pub priority: String,
    #[serde(rename = "fecha_deteccion")]
    pub detected_on: String,
    #[serde(rename = "estado")]
    pub state: String,
    #[serde(rename = "responsable")]
    pub owner: String,
    #[serde(rename = "dias_abierta")]
    pub days_open: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NonconformitiesReport {
    pub metadata: ReportMetadata,
    #[serde(rename = "resumen")]
    pub summary: NonconformitySummary,
    #[serde(rename = "por_tipo")]
    pub by_type: Vec<CountByType>,
    #[serde(rename = "por_mes")]
    pub by_month: Vec<CountByMonth>,
    #[serde(rename = "ncs_criticas")]
    pub critical: Vec<CriticalNonconformity>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NonconformingSummary {
    pub total: u32,
    #[serde(rename = "rechazados")]
    pub rejected: u32,
    #[serde(rename = "reprocesados")]
    pub reworked: u32,
    #[serde(rename = "en_revision")]
    pub under_review: u32,
    #[serde(rename = "tasa_rechazo")]
    pub rejection_rate: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialEntry {
    pub material: String,
    #[serde(rename = "cantidad")]
    pub count: u32,
    #[serde(rename = "estado")]
    pub state: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NonconformingReport {
    pub metadata: ReportMetadata,
    #[serde(rename = "resumen")]
    pub summary: NonconformingSummary,
    #[serde(rename = "por_material")]
    pub by_material: Vec<MaterialEntry>,
}

// ============ dashboard.json ============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardMetadata {
    #[serde(rename = "proyecto")]
    pub project: String,
    #[serde(rename = "ultima_actualizacion")]
    pub last_updated: String,
    #[serde(rename = "version_datos")]
    pub data_version: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardKpis {
    #[serde(rename = "total_terminaciones")]
    pub total: usize,
    #[serde(rename = "terminaciones_completadas")]
    pub completed: usize,
    #[serde(rename = "terminaciones_pendientes")]
    pub pending: usize,
    #[serde(rename = "terminaciones_retrasadas")]
    pub delayed: usize,
    #[serde(rename = "no_conformidades_abiertas")]
    pub open_nonconformities: u32,
    #[serde(rename = "productos_no_conformes")]
    pub nonconforming_products: u32,
    #[serde(rename = "eficiencia_general")]
    pub efficiency: String,
    #[serde(rename = "tasa_resolucion_nc")]
    pub nc_resolution_rate: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardReport {
    pub metadata: DashboardMetadata,
    pub kpis: DashboardKpis,
    #[serde(rename = "alertas_consolidadas")]
    pub alerts: Vec<Alert>,
    #[serde(rename = "ultima_actualizacion_ui")]
    pub last_updated_display: String,
}

/// `summary.json`, written next to the datasets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationSummary {
    #[serde(rename = "ultima_actualizacion")]
    pub last_updated: String,
    #[serde(rename = "archivos_generados")]
    pub files: Vec<String>,
    #[serde(rename = "estado")]
    pub status: String,
    #[serde(rename = "total_datos")]
    pub total_bytes: usize,
}
