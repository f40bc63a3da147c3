//! Terminations chart
//!
//! The bar chart is drawn by an external charting library; this module only
//! owns its fixed dataset and emits the library's configuration. The
//! heartbeat task logs a timestamp while the dashboard is open.

use serde::Serialize;
use serde_json::{json, Value};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Canvas element the chart is drawn into
pub const CHART_ELEMENT_ID: &str = "myChart";

/// Default heartbeat period
pub const DEFAULT_HEARTBEAT_SECS: u64 = 60;

/// One bar series
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub label: String,
    pub color: String,
    pub data: Vec<u32>,
}

impl Series {
    fn new(label: &str, color: &str, data: &[u32]) -> Self {
        Self {
            label: label.to_string(),
            color: color.to_string(),
            data: data.to_vec(),
        }
    }
}

/// Legend placement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LegendPosition {
    Top,
    Bottom,
    Left,
    Right,
}

/// Static bar chart definition
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarChart {
    pub title: String,
    pub labels: Vec<String>,
    pub series: Vec<Series>,
    pub responsive: bool,
    pub legend: LegendPosition,
}

impl BarChart {
    /// Terminations per area: completed, pending and delayed
    pub fn terminations_by_area() -> Self {
        Self {
            title: "Estado de Terminaciones por Área".to_string(),
            labels: (1..=5).map(|i| format!("Área {}", i)).collect(),
            series: vec![
                Series::new("Completados", "#28a745", &[25, 18, 22, 19, 10]),
                Series::new("Pendientes", "#ffc107", &[8, 12, 6, 10, 6]),
                Series::new("Retrasados", "#dc3545", &[3, 5, 4, 6, 2]),
            ],
            responsive: true,
            legend: LegendPosition::Top,
        }
    }

    /// Configuration object accepted by Chart.js
    pub fn chartjs_config(&self) -> Value {
        let datasets: Vec<Value> = self
            .series
            .iter()
            .map(|s| {
                json!({
                    "label": s.label,
                    "data": s.data,
                    "backgroundColor": s.color,
                })
            })
            .collect();

        json!({
            "type": "bar",
            "data": {
                "labels": self.labels,
                "datasets": datasets,
            },
            "options": {
                "responsive": self.responsive,
                "plugins": {
                    "legend": { "position": self.legend },
                    "title": { "display": true, "text": self.title },
                },
            },
        })
    }

    /// Largest value across all series
    pub fn max_value(&self) -> u32 {
        self.series
            .iter()
            .flat_map(|s| s.data.iter().copied())
            .max()
            .unwrap_or(0)
    }

    /// Sum of one category across series
    pub fn category_total(&self, index: usize) -> u32 {
        self.series
            .iter()
            .filter_map(|s| s.data.get(index))
            .sum()
    }
}

impl Default for BarChart {
    fn default() -> Self {
        Self::terminations_by_area()
    }
}

/// Log "dashboard active" every `period` until cancelled.
///
/// Has no effect on the displayed data.
pub fn start_heartbeat(period: Duration, cancel: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        // The first tick completes immediately; the page just loaded
        interval.tick().await;

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = interval.tick() => {
                    let now = chrono::Local::now().format("%H:%M:%S");
                    tracing::info!("Dashboard active - last update: {}", now);
                }
            }
        }

        tracing::debug!("Heartbeat stopped");
    })
}
