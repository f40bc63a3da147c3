//! App Root Component
//!
//! Loads the datasets on start, renders the KPI panel and the chart, and
//! keeps a once-a-minute heartbeat in the console.

use leptos::*;

use crate::api;
use crate::components::{KpiCard, TerminationsChart, Toast};
use crate::state::global::{provide_global_state, GlobalState};

const HEARTBEAT_MS: u32 = 60_000;

/// Root application component
#[component]
pub fn App() -> impl IntoView {
    provide_global_state();
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    // Initial load
    spawn_local(async move {
        api::load_all(state).await;
    });

    gloo_timers::callback::Interval::new(HEARTBEAT_MS, || {
        let now = chrono::Local::now().format("%H:%M:%S");
        web_sys::console::log_1(&format!("Dashboard active - last update: {}", now).into());
    })
    .forget();

    let on_refresh = move |_| {
        spawn_local(async move {
            api::load_all(state).await;
        });
    };

    let kpis = state.kpis;

    view! {
        <div class="container">
            <header class="d-flex justify-content-between align-items-center">
                <h1>"SIC3PRO - Proyecto 1253"</h1>
                <div>
                    <span class="text-muted">
                        "Last update: "
                        <span id="lastUpdate">
                            {move || state.last_update.get().unwrap_or_else(|| "—".to_string())}
                        </span>
                    </span>
                    <button
                        id="refreshData"
                        class="btn btn-primary"
                        aria-busy=move || state.loading.get().to_string()
                        on:click=on_refresh
                    >
                        "Refresh"
                    </button>
                </div>
            </header>

            <section class="kpi-grid">
                <KpiCard
                    id="criticalAlerts"
                    label="Critical alerts"
                    value=Signal::derive(move || kpis.get().critical_alerts)
                    accent="border-danger"
                />
                <KpiCard
                    id="pendingItems"
                    label="Pending items"
                    value=Signal::derive(move || kpis.get().pending)
                    accent="border-warning"
                />
                <KpiCard
                    id="completedItems"
                    label="Completed items"
                    value=Signal::derive(move || kpis.get().completed)
                    accent="border-success"
                />
                <KpiCard
                    id="efficiencyRate"
                    label="Efficiency"
                    value=Signal::derive(move || kpis.get().efficiency)
                    accent="border-info"
                />
            </section>

            <section>
                <TerminationsChart />
            </section>

            <Toast />
        </div>
    }
}
