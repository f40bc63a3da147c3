//! View state and KPI projection

use serde::Serialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::fmt;

use super::registry::Dataset;

/// Placeholder shown for a KPI that is missing from the payload
pub const MISSING_VALUE: &str = "—";

/// Share of delayed terminations reported as critical alerts
const CRITICAL_ALERT_RATIO: f64 = 0.3;

/// Decoded payloads keyed by dataset.
///
/// Rebuilt by every load cycle; entries from earlier successful loads stay
/// until a later batch overwrites them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState {
    entries: HashMap<Dataset, Value>,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, dataset: Dataset) -> Option<&Value> {
        self.entries.get(&dataset)
    }

    pub fn contains(&self, dataset: Dataset) -> bool {
        self.entries.contains_key(&dataset)
    }

    pub fn insert(&mut self, dataset: Dataset, payload: Value) -> Option<Value> {
        self.entries.insert(dataset, payload)
    }

    /// Merge a completed batch, overwriting entries key by key
    pub fn merge(&mut self, batch: impl IntoIterator<Item = (Dataset, Value)>) {
        for (dataset, payload) in batch {
            self.entries.insert(dataset, payload);
        }
    }

    pub fn dashboard(&self) -> Option<&Value> {
        self.get(Dataset::Dashboard)
    }

    pub fn datasets(&self) -> Vec<Dataset> {
        let mut keys: Vec<_> = self.entries.keys().copied().collect();
        keys.sort();
        keys
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Fixed dashboard document used in degraded mode
pub fn sample_dashboard() -> Value {
    json!({
        "kpis": {
            "terminaciones_completadas": 94,
            "terminaciones_pendientes": 42,
            "terminaciones_retrasadas": 20,
            "eficiencia_general": "78%"
        }
    })
}

/// A single KPI as read from the payload, unvalidated
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum KpiValue {
    Number(f64),
    Text(String),
    Missing,
}

impl KpiValue {
    fn read(value: Option<&Value>) -> Self {
        match value {
            Some(Value::Number(n)) => n.as_f64().map(KpiValue::Number).unwrap_or(KpiValue::Missing),
            Some(Value::String(s)) => KpiValue::Text(s.clone()),
            Some(Value::Null) | None => KpiValue::Missing,
            Some(other) => KpiValue::Text(other.to_string()),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            KpiValue::Number(n) => Some(*n),
            _ => None,
        }
    }
}

impl fmt::Display for KpiValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Whole numbers print without a fractional part
            KpiValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{}", *n as i64),
            KpiValue::Number(n) => write!(f, "{}", n),
            KpiValue::Text(s) => f.write_str(s),
            KpiValue::Missing => f.write_str(MISSING_VALUE),
        }
    }
}

/// Values projected from `dashboard.kpis`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiSnapshot {
    pub completed: KpiValue,
    pub pending: KpiValue,
    pub delayed: KpiValue,
    pub efficiency: KpiValue,
    pub critical_alerts: Option<i64>,
}

impl KpiSnapshot {
    /// Project the KPI block of a dashboard document.
    ///
    /// Fields are not validated: anything missing or of an unexpected type
    /// is carried through and renders as a placeholder.
    pub fn from_dashboard(dashboard: &Value) -> Self {
        let kpis = dashboard.get("kpis");
        let field = |name: &str| KpiValue::read(kpis.and_then(|k| k.get(name)));

        let delayed = field("terminaciones_retrasadas");
        let critical_alerts = delayed.as_f64().map(critical_alerts);

        Self {
            completed: field("terminaciones_completadas"),
            pending: field("terminaciones_pendientes"),
            delayed,
            efficiency: field("eficiencia_general"),
            critical_alerts,
        }
    }

    pub fn critical_alerts_text(&self) -> String {
        self.critical_alerts
            .map(|n| n.to_string())
            .unwrap_or_else(|| MISSING_VALUE.to_string())
    }
}

/// 30% of the delayed count, floored
pub fn critical_alerts(delayed: f64) -> i64 {
    (delayed * CRITICAL_ALERT_RATIO).floor() as i64
}
