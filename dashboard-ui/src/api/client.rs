//! HTTP Dataset Client
//!
//! Fetches the four dashboard datasets relative to the page.

use futures_util::future::try_join_all;
use gloo_net::http::Request;
use serde_json::Value;

use crate::state::global::GlobalState;

/// Registered datasets and their locations, in registration order
pub const DATASETS: [(&str, &str); 4] = [
    ("dashboard", "data/datasets/dashboard.json"),
    ("termination", "data/datasets/termination.json"),
    ("nonconformities", "data/datasets/nonconformities.json"),
    ("nonconforming", "data/datasets/nonconforming.json"),
];

/// GET one dataset and decode it
pub async fn fetch_dataset(location: &str) -> Result<Value, String> {
    let response = Request::get(location)
        .send()
        .await
        .map_err(|e| format!("Network error for {}: {}", location, e))?;

    if !response.ok() {
        return Err(format!("HTTP {} for {}", response.status(), location));
    }

    response
        .json()
        .await
        .map_err(|e| format!("Parse error for {}: {}", location, e))
}

/// Fetch every dataset concurrently; fails on the first error
pub async fn fetch_all() -> Result<Vec<(String, Value)>, String> {
    try_join_all(DATASETS.iter().map(|(name, location)| async move {
        let value = fetch_dataset(location).await?;
        Ok::<_, String>((name.to_string(), value))
    }))
    .await
}

/// One load cycle. Returns `false` when sample data was substituted.
pub async fn load_all(state: GlobalState) -> bool {
    state.loading.set(true);

    let loaded = match fetch_all().await {
        Ok(batch) => {
            state.merge(batch);
            state.update_dashboard();
            true
        }
        Err(e) => {
            web_sys::console::error_1(&format!("Error loading data: {}", e).into());
            state.show_error();
            false
        }
    };

    state.loading.set(false);
    loaded
}
