//! Realistic dataset generator
//!
//! Produces the four dashboard datasets plus `summary.json` from a fixed
//! "now", so the same instant always yields the same documents.

use chrono::{Duration, NaiveDateTime};
use serde::Serialize;
use serde_json::Value;
use std::path::Path;

use super::model::*;
use super::{GeneratorError, GeneratorResult};
use crate::loader::Dataset;

const PROJECT_CODE: &str = "1253";
const TERMINATION_ITEMS: usize = 50;

const AREAS: [(&str, &str); 5] = [
    ("Área 1", "Eléctrica"),
    ("Área 2", "Mecánica"),
    ("Área 3", "Instrumentación"),
    ("Área 4", "Civil"),
    ("Área 5", "Montaje"),
];

const SYSTEMS: [&str; 5] = ["Eléctrico", "Mecánico", "Instrumentación", "Civil", "Montaje"];

const STATES: [ItemState; 4] = [
    ItemState::Completed,
    ItemState::InProgress,
    ItemState::Pending,
    ItemState::Delayed,
];

const PRIORITIES: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];

const NC_TYPES: [&str; 5] = ["Calidad", "Seguridad", "Ambiental", "Proceso", "Documentación"];

const MATERIALS: [&str; 6] = [
    "Tuberías A106",
    "Válvulas Globo",
    "Estructuras A36",
    "Equipos Rotativos",
    "Instrumentos",
    "Material Eléctrico",
];

const MATERIAL_STATES: [&str; 3] = ["Rechazado", "Reprocesado", "En revisión"];

/// The generated documents
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedDatasets {
    pub termination: TerminationReport,
    pub nonconformities: NonconformitiesReport,
    pub nonconforming: NonconformingReport,
    pub dashboard: DashboardReport,
    generated_at: NaiveDateTime,
}

/// Format a ratio as a one-decimal percentage
fn percent(part: f64, whole: f64) -> String {
    format!("{:.1}%", part / whole * 100.0)
}

fn iso(ts: NaiveDateTime) -> String {
    ts.format("%Y-%m-%dT%H:%M:%S").to_string()
}

fn day(ts: NaiveDateTime) -> String {
    ts.format("%Y-%m-%d").to_string()
}

/// Generate every dataset as of `now`
pub fn generate(now: NaiveDateTime) -> GeneratedDatasets {
    let termination = termination_report(now);
    let nonconformities = nonconformities_report(now);
    let nonconforming = nonconforming_report(now);
    let dashboard = dashboard_report(now, &termination, &nonconformities, &nonconforming);

    GeneratedDatasets {
        termination,
        nonconformities,
        nonconforming,
        dashboard,
        generated_at: now,
    }
}

fn termination_items(now: NaiveDateTime) -> Vec<TerminationItem> {
    (1..=TERMINATION_ITEMS)
        .map(|i| {
            let (area, specialty) = AREAS[i % AREAS.len()];
            let system = SYSTEMS[i % SYSTEMS.len()];
            let state = STATES[i % STATES.len()];
            let days_before = (TERMINATION_ITEMS - i) as i64;

            TerminationItem {
                id: format!("TERM-{}", 2024000 + i),
                description: format!("Terminación {}: {} en {}", i, system.to_lowercase(), area),
                area: format!("{} - {}", area, specialty),
                system: system.to_string(),
                state,
                priority: PRIORITIES[i % PRIORITIES.len()],
                commitment_date: day(now - Duration::days(days_before)),
                actual_date: (i % 4 == 0)
                    .then(|| day(now - Duration::days(days_before - (i % 7) as i64))),
                owner: format!("RESP_{}", (i % 5) + 1),
                days_delayed: if i % 4 == 3 { (i % 10) as u32 } else { 0 },
                progress: (i % 100) as u32,
            }
        })
        .collect()
}

fn count_state(items: &[TerminationItem], state: ItemState) -> usize {
    items.iter().filter(|i| i.state == state).count()
}

fn termination_report(now: NaiveDateTime) -> TerminationReport {
    let items = termination_items(now);
    let total = items.len();

    let completed = count_state(&items, ItemState::Completed);
    let in_progress = count_state(&items, ItemState::InProgress);
    let pending = count_state(&items, ItemState::Pending);
    let delayed = count_state(&items, ItemState::Delayed);

    let by_area = AREAS
        .iter()
        .map(|(area, specialty)| {
            let full_name = format!("{} - {}", area, specialty);
            let in_area: Vec<_> = items.iter().filter(|i| i.area == full_name).cloned().collect();
            AreaBreakdown {
                area: area.to_string(),
                system: specialty.to_string(),
                completed: count_state(&in_area, ItemState::Completed),
                in_progress: count_state(&in_area, ItemState::InProgress),
                pending: count_state(&in_area, ItemState::Pending),
                delayed: count_state(&in_area, ItemState::Delayed),
            }
        })
        .collect();

    let electrical_delayed = items
        .iter()
        .filter(|i| i.area.contains("Eléctrica") && i.state == ItemState::Delayed)
        .count();
    let undocumented = items
        .iter()
        .filter(|i| i.state == ItemState::Completed && i.progress < 100)
        .count();

    let alerts = vec![
        Alert {
            id: "ALT-001".to_string(),
            kind: AlertKind::Critical,
            title: "Retraso crítico en área eléctrica".to_string(),
            description: format!("{} items con retraso > 5 días", electrical_delayed),
            date: day(now),
            action_required: true,
        },
        Alert {
            id: "ALT-002".to_string(),
            kind: AlertKind::Warning,
            title: "Items pendientes de documentación".to_string(),
            description: format!("{} items completados sin documentación final", undocumented),
            date: day(now - Duration::days(1)),
            action_required: true,
        },
    ];

    TerminationReport {
        metadata: TerminationMetadata {
            kind: "detalles_terminacion".to_string(),
            generated_at: iso(now),
            project: PROJECT_CODE.to_string(),
            total_items: total,
        },
        summary: TerminationSummary {
            total,
            completed,
            in_progress,
            pending,
            delayed,
            efficiency: percent(completed as f64, total as f64),
            completion_rate: percent(completed as f64 + in_progress as f64 * 0.5, total as f64),
        },
        by_area,
        items,
        alerts,
    }
}

fn nonconformities_report(now: NaiveDateTime) -> NonconformitiesReport {
    let total = 48;
    let month = |days: i64| (now - Duration::days(days)).format("%b").to_string();

    NonconformitiesReport {
        metadata: ReportMetadata {
            kind: "no_conformidades".to_string(),
            generated_at: iso(now),
            project: PROJECT_CODE.to_string(),
        },
        summary: NonconformitySummary {
            total,
            open: 15,
            closed: 28,
            in_progress: 5,
            resolution_rate: "85.4%".to_string(),
            mean_resolution_time: "7.2 días".to_string(),
        },
        by_type: NC_TYPES
            .iter()
            .enumerate()
            .map(|(idx, kind)| {
                let count = (idx as u32 + 1) * 5;
                CountByType {
                    kind: kind.to_string(),
                    count,
                    percent: percent(count as f64, total as f64),
                }
            })
            .collect(),
        by_month: [(90, 8), (60, 12), (30, 15), (0, 13)]
            .into_iter()
            .map(|(days, count)| CountByMonth {
                month: month(days),
                count,
            })
            .collect(),
        critical: vec![CriticalNonconformity {
            id: "NC-2024-001".to_string(),
            description: "Soldadura no conforme en tubería principal".to_string(),
            kind: "Calidad".to_string(),
            priority: "Crítica".to_string(),
            detected_on: day(now - Duration::days(15)),
            state: "Abierta".to_string(),
            owner: "Área Mecánica".to_string(),
            days_open: 15,
        }],
    }
}

fn nonconforming_report(now: NaiveDateTime) -> NonconformingReport {
    NonconformingReport {
        metadata: ReportMetadata {
            kind: "productos_no_conformes".to_string(),
            generated_at: iso(now),
            project: PROJECT_CODE.to_string(),
        },
        summary: NonconformingSummary {
            total: 32,
            rejected: 15,
            reworked: 12,
            under_review: 5,
            rejection_rate: "46.9%".to_string(),
        },
        by_material: MATERIALS
            .iter()
            .enumerate()
            .map(|(idx, material)| MaterialEntry {
                material: material.to_string(),
                count: (idx as u32 + 2) * 2,
                state: MATERIAL_STATES[idx % MATERIAL_STATES.len()].to_string(),
            })
            .collect(),
    }
}

fn dashboard_report(
    now: NaiveDateTime,
    termination: &TerminationReport,
    nonconformities: &NonconformitiesReport,
    nonconforming: &NonconformingReport,
) -> DashboardReport {
    let summary = &termination.summary;

    let mut alerts = termination.alerts.clone();
    alerts.push(Alert {
        id: "ALT-003".to_string(),
        kind: AlertKind::Informative,
        title: "Revisión mensual programada".to_string(),
        description: "Revisión mensual de calidad programada para mañana".to_string(),
        date: day(now),
        action_required: false,
    });

    DashboardReport {
        metadata: DashboardMetadata {
            project: format!("Proyecto {}", PROJECT_CODE),
            last_updated: iso(now),
            data_version: "1.0".to_string(),
        },
        kpis: DashboardKpis {
            total: summary.total,
            completed: summary.completed,
            // In-progress items still count as pending on the dashboard
            pending: summary.pending + summary.in_progress,
            delayed: summary.delayed,
            open_nonconformities: nonconformities.summary.open,
            nonconforming_products: nonconforming.summary.total,
            efficiency: summary.efficiency.clone(),
            nc_resolution_rate: nonconformities.summary.resolution_rate.clone(),
        },
        alerts,
        last_updated_display: now.format("%Y-%m-%d %H:%M:%S").to_string(),
    }
}

impl GeneratedDatasets {
    /// Document for a dataset as JSON
    pub fn document(&self, dataset: Dataset) -> GeneratorResult<Value> {
        let value = match dataset {
            Dataset::Dashboard => serde_json::to_value(&self.dashboard)?,
            Dataset::Termination => serde_json::to_value(&self.termination)?,
            Dataset::Nonconformities => serde_json::to_value(&self.nonconformities)?,
            Dataset::Nonconforming => serde_json::to_value(&self.nonconforming)?,
        };
        Ok(value)
    }

    /// Write every dataset and `summary.json` into `dir`.
    ///
    /// Files are pretty-printed UTF-8; non-ASCII text is kept as is.
    pub async fn write_all(&self, dir: &Path) -> GeneratorResult<GenerationSummary> {
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|source| GeneratorError::Io {
                path: dir.to_path_buf(),
                source,
            })?;

        let mut files = Vec::new();
        let mut total_bytes = 0;

        for dataset in [
            Dataset::Termination,
            Dataset::Nonconformities,
            Dataset::Nonconforming,
            Dataset::Dashboard,
        ] {
            let path = dir.join(dataset.file_name());
            let written = write_json(&path, &self.document(dataset)?).await?;
            if dataset != Dataset::Dashboard {
                total_bytes += written;
            }
            tracing::info!(path = %path.display(), bytes = written, "Dataset written");
            files.push(dataset.file_name());
        }

        let summary = GenerationSummary {
            last_updated: iso(self.generated_at),
            files,
            status: "exito".to_string(),
            total_bytes,
        };

        let path = dir.join("summary.json");
        write_json(&path, &summary).await?;
        tracing::info!(path = %path.display(), "Summary written");

        Ok(summary)
    }
}

async fn write_json<T: Serialize>(path: &Path, value: &T) -> GeneratorResult<usize> {
    let body = serde_json::to_vec_pretty(value)?;
    tokio::fs::write(path, &body)
        .await
        .map_err(|source| GeneratorError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(body.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::KpiSnapshot;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn fixed_now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 15)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap()
    }

    #[test]
    fn test_termination_counts() {
        let data = generate(fixed_now());
        let summary = &data.termination.summary;

        assert_eq!(summary.total, 50);
        assert_eq!(summary.completed, 12);
        assert_eq!(summary.in_progress, 13);
        assert_eq!(summary.pending, 13);
        assert_eq!(summary.delayed, 12);
        assert_eq!(summary.efficiency, "24.0%");
        assert_eq!(summary.completion_rate, "37.0%");
    }

    #[test]
    fn test_item_fields() {
        let data = generate(fixed_now());
        let items = &data.termination.items;

        let first = &items[0];
        assert_eq!(first.id, "TERM-2024001");
        assert_eq!(first.area, "Área 2 - Mecánica");
        assert_eq!(first.description, "Terminación 1: mecánico en Área 2");
        assert_eq!(first.state, ItemState::InProgress);
        assert_eq!(first.priority, Priority::Medium);
        assert_eq!(first.commitment_date, "2024-01-26");
        assert_eq!(first.actual_date, None);

        let fourth = &items[3];
        assert_eq!(fourth.state, ItemState::Completed);
        assert_eq!(fourth.commitment_date, "2024-01-29");
        // 46 - (4 % 7) days back
        assert_eq!(fourth.actual_date.as_deref(), Some("2024-02-02"));

        let third = &items[2];
        assert_eq!(third.state, ItemState::Delayed);
        assert_eq!(third.days_delayed, 3);
    }

    #[test]
    fn test_area_breakdown_sums_to_total() {
        let data = generate(fixed_now());
        let by_area = &data.termination.by_area;

        assert_eq!(by_area.len(), 5);
        assert_eq!(by_area[0].area, "Área 1");
        assert_eq!(by_area[0].system, "Eléctrica");

        let total: usize = by_area
            .iter()
            .map(|a| a.completed + a.in_progress + a.pending + a.delayed)
            .sum();
        assert_eq!(total, 50);
    }

    #[test]
    fn test_dashboard_kpis() {
        let data = generate(fixed_now());
        let kpis = &data.dashboard.kpis;

        assert_eq!(kpis.completed, 12);
        assert_eq!(kpis.pending, 26);
        assert_eq!(kpis.delayed, 12);
        assert_eq!(kpis.open_nonconformities, 15);
        assert_eq!(kpis.nonconforming_products, 32);
        assert_eq!(kpis.efficiency, "24.0%");
        assert_eq!(data.dashboard.alerts.len(), 3);
        assert_eq!(data.dashboard.alerts[2].kind, AlertKind::Informative);
    }

    #[test]
    fn test_dashboard_document_feeds_kpi_projection() {
        let data = generate(fixed_now());
        let doc = data.document(Dataset::Dashboard).unwrap();
        let snapshot = KpiSnapshot::from_dashboard(&doc);

        assert_eq!(snapshot.completed.to_string(), "12");
        assert_eq!(snapshot.pending.to_string(), "26");
        assert_eq!(snapshot.critical_alerts, Some(3));
        assert_eq!(snapshot.efficiency.to_string(), "24.0%");
    }

    #[test]
    fn test_nonconformity_breakdown() {
        let data = generate(fixed_now());
        let by_type = &data.nonconformities.by_type;

        assert_eq!(by_type[0].count, 5);
        assert_eq!(by_type[0].percent, "10.4%");
        assert_eq!(by_type[4].count, 25);
        assert_eq!(data.nonconformities.by_month.len(), 4);
        assert_eq!(data.nonconformities.by_month[3].month, "Mar");

        let materials = &data.nonconforming.by_material;
        assert_eq!(materials.len(), 6);
        assert_eq!(materials[0].count, 4);
        assert_eq!(materials[4].state, "Reprocesado");
    }

    #[test]
    fn test_wire_keys_are_spanish() {
        let data = generate(fixed_now());
        let doc = data.document(Dataset::Termination).unwrap();

        assert_eq!(doc["resumen"]["completados"], 12);
        assert_eq!(doc["items"][0]["estado"], "En progreso");
        assert_eq!(doc["items"][0]["fecha_real"], Value::Null);
        assert_eq!(doc["alertas"][0]["tipo"], "critica");
    }

    #[tokio::test]
    async fn test_write_all() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("data").join("datasets");

        let summary = generate(fixed_now()).write_all(&out).await.unwrap();

        assert_eq!(summary.status, "exito");
        assert_eq!(summary.files.len(), 4);
        assert!(summary.total_bytes > 0);

        for dataset in Dataset::ALL {
            assert!(out.join(dataset.file_name()).exists());
        }

        let raw = std::fs::read_to_string(out.join("dashboard.json")).unwrap();
        assert!(raw.contains("Revisión mensual programada"));

        let parsed: GenerationSummary =
            serde_json::from_str(&std::fs::read_to_string(out.join("summary.json")).unwrap())
                .unwrap();
        assert_eq!(parsed, summary);
    }
}
