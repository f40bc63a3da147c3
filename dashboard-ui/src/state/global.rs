//! Global Application State
//!
//! Reactive state management using Leptos signals.

use gloo_timers::callback::Timeout;
use leptos::*;
use serde_json::{json, Value};
use std::collections::HashMap;

/// How long a toast stays visible
pub const NOTIFICATION_MS: u32 = 3000;

/// Text shown for a missing or malformed KPI
pub const MISSING_VALUE: &str = "—";

pub const UPDATED_MESSAGE: &str = "Data updated successfully";
pub const FALLBACK_MESSAGE: &str = "Error loading data. Using sample data.";

/// Toast severity, used as a CSS colour class
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Warning,
    Danger,
}

impl Severity {
    pub fn css_class(&self) -> &'static str {
        match self {
            Severity::Info => "bg-info",
            Severity::Success => "bg-success",
            Severity::Warning => "bg-warning",
            Severity::Danger => "bg-danger",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Notification {
    pub id: u64,
    pub message: String,
    pub severity: Severity,
}

/// Display text of the four KPI fields
#[derive(Clone, Debug, PartialEq)]
pub struct KpiTexts {
    pub critical_alerts: String,
    pub pending: String,
    pub completed: String,
    pub efficiency: String,
}

impl Default for KpiTexts {
    fn default() -> Self {
        Self {
            critical_alerts: MISSING_VALUE.to_string(),
            pending: MISSING_VALUE.to_string(),
            completed: MISSING_VALUE.to_string(),
            efficiency: MISSING_VALUE.to_string(),
        }
    }
}

impl KpiTexts {
    /// Project `dashboard.kpis`. Missing fields render as the placeholder.
    pub fn from_dashboard(dashboard: &Value) -> Self {
        let kpis = &dashboard["kpis"];
        let delayed = kpis["terminaciones_retrasadas"].as_f64();

        Self {
            critical_alerts: delayed
                .map(|d| critical_alerts(d).to_string())
                .unwrap_or_else(|| MISSING_VALUE.to_string()),
            pending: display_value(&kpis["terminaciones_pendientes"]),
            completed: display_value(&kpis["terminaciones_completadas"]),
            efficiency: display_value(&kpis["eficiencia_general"]),
        }
    }
}

/// 30% of the delayed count, floored
pub fn critical_alerts(delayed: f64) -> i64 {
    (delayed * 0.3).floor() as i64
}

/// Numbers without a trailing `.0`, strings verbatim, anything else `—`
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => i.to_string(),
            (None, Some(f)) if f.fract() == 0.0 => format!("{}", f as i64),
            (None, Some(f)) => f.to_string(),
            _ => MISSING_VALUE.to_string(),
        },
        Value::String(s) => s.clone(),
        _ => MISSING_VALUE.to_string(),
    }
}

/// Dashboard shown when loading fails
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

/// Global application state provided to all components
#[derive(Clone, Copy)]
pub struct GlobalState {
    /// Loaded datasets keyed by name
    pub datasets: RwSignal<HashMap<String, Value>>,
    /// KPI display text
    pub kpis: RwSignal<KpiTexts>,
    /// Local time of the last display update
    pub last_update: RwSignal<Option<String>>,
    /// Visible toasts, oldest first
    pub notifications: RwSignal<Vec<Notification>>,
    /// A load is in flight
    pub loading: RwSignal<bool>,
    next_id: StoredValue<u64>,
    /// Expiry timers of the visible toasts
    timers: StoredValue<HashMap<u64, Timeout>>,
}

/// Provide global state to the component tree
pub fn provide_global_state() {
    provide_context(GlobalState::new());
}

impl GlobalState {
    fn new() -> Self {
        Self {
            datasets: create_rw_signal(HashMap::new()),
            kpis: create_rw_signal(KpiTexts::default()),
            last_update: create_rw_signal(None),
            notifications: create_rw_signal(Vec::new()),
            loading: create_rw_signal(false),
            next_id: store_value(0),
            timers: store_value(HashMap::new()),
        }
    }

    /// Merge a completed batch; earlier entries not in the batch stay
    pub fn merge(&self, batch: Vec<(String, Value)>) {
        self.datasets.update(|datasets| datasets.extend(batch));
    }

    /// Redraw the KPI fields from the loaded dashboard. No-op without one.
    pub fn update_dashboard(&self) {
        let kpis = self
            .datasets
            .with_untracked(|d| d.get("dashboard").map(KpiTexts::from_dashboard));

        let Some(kpis) = kpis else {
            return;
        };

        self.kpis.set(kpis);
        self.last_update
            .set(Some(chrono::Local::now().format("%H:%M:%S").to_string()));
        self.show_notification(UPDATED_MESSAGE, Severity::Success);
    }

    /// Warn, then fall back to sample data
    pub fn show_error(&self) {
        self.show_notification(FALLBACK_MESSAGE, Severity::Warning);
        self.load_sample_data();
    }

    pub fn load_sample_data(&self) {
        self.datasets.update(|d| {
            d.insert("dashboard".to_string(), sample_dashboard());
        });
        self.update_dashboard();
    }

    /// Show a toast that removes itself after [`NOTIFICATION_MS`]
    pub fn show_notification(&self, message: &str, severity: Severity) -> u64 {
        let id = self.next_id.get_value();
        self.next_id.set_value(id + 1);

        self.notifications.update(|n| {
            n.push(Notification {
                id,
                message: message.to_string(),
                severity,
            })
        });

        let notifications = self.notifications;
        let timers = self.timers;
        let timeout = Timeout::new(NOTIFICATION_MS, move || {
            notifications.update(|n| n.retain(|t| t.id != id));
            // A timer cannot be dropped from inside its own callback
            timers.update_value(|t| {
                if let Some(fired) = t.remove(&id) {
                    fired.forget();
                }
            });
        });
        self.timers.update_value(|t| {
            t.insert(id, timeout);
        });

        id
    }

    /// Close a toast before its timer fires. Dropping the timer cancels it.
    pub fn dismiss(&self, id: u64) {
        self.timers.update_value(|t| {
            t.remove(&id);
        });
        self.notifications.update(|n| n.retain(|t| t.id != id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kpis_from_dashboard() {
        let kpis = KpiTexts::from_dashboard(&sample_dashboard());
        assert_eq!(kpis.completed, "94");
        assert_eq!(kpis.pending, "42");
        assert_eq!(kpis.critical_alerts, "6");
        assert_eq!(kpis.efficiency, "78%");
    }

    #[test]
    fn test_missing_kpis() {
        let kpis = KpiTexts::from_dashboard(&json!({"kpis": {"terminaciones_retrasadas": "x"}}));
        assert_eq!(kpis, KpiTexts::default());

        let kpis = KpiTexts::from_dashboard(&json!({}));
        assert_eq!(kpis.completed, MISSING_VALUE);
    }

    #[test]
    fn test_critical_alerts() {
        assert_eq!(critical_alerts(20.0), 6);
        assert_eq!(critical_alerts(10.0), 3);
        assert_eq!(critical_alerts(1.0), 0);
    }

    #[test]
    fn test_display_value() {
        assert_eq!(display_value(&json!(12)), "12");
        assert_eq!(display_value(&json!(12.0)), "12");
        assert_eq!(display_value(&json!(2.5)), "2.5");
        assert_eq!(display_value(&json!("24.0%")), "24.0%");
        assert_eq!(display_value(&json!(null)), MISSING_VALUE);
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod browser_tests {
    use super::*;
    use gloo_timers::future::TimeoutFuture;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn pending_timers(state: &GlobalState) -> usize {
        state.timers.with_value(|t| t.len())
    }

    #[wasm_bindgen_test]
    async fn test_dismiss_cancels_timer() {
        let runtime = create_runtime();
        let state = GlobalState::new();

        let first = state.show_notification("first", Severity::Info);
        let second = state.show_notification("second", Severity::Success);
        assert_eq!(pending_timers(&state), 2);

        state.dismiss(first);
        assert_eq!(pending_timers(&state), 1);
        let visible: Vec<u64> = state
            .notifications
            .get_untracked()
            .iter()
            .map(|n| n.id)
            .collect();
        assert_eq!(visible, vec![second]);

        state.dismiss(second);
        assert_eq!(pending_timers(&state), 0);
        TimeoutFuture::new(NOTIFICATION_MS + 200).await;
        assert!(state.notifications.get_untracked().is_empty());

        runtime.dispose();
    }

    #[wasm_bindgen_test]
    async fn test_toast_expires() {
        let runtime = create_runtime();
        let state = GlobalState::new();

        state.show_notification("saved", Severity::Success);
        TimeoutFuture::new(NOTIFICATION_MS + 200).await;

        assert!(state.notifications.get_untracked().is_empty());
        assert_eq!(pending_timers(&state), 0);

        runtime.dispose();
    }
}
