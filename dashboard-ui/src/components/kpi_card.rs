//! KPI Card Component

use leptos::*;

/// One headline figure. `id` is the element id the value is written to.
#[component]
pub fn KpiCard(
    id: &'static str,
    label: &'static str,
    #[prop(into)]
    value: Signal<String>,
    #[prop(default = "")]
    accent: &'static str,
) -> impl IntoView {
    view! {
        <div class=format!("kpi-card {}", accent)>
            <div class="text-muted">{label}</div>
            <div id=id class="kpi-value">{move || value.get()}</div>
        </div>
    }
}
