//! Dashboard loader
//!
//! Fetches every registered dataset concurrently, merges the batch into the
//! view state and projects the dashboard KPIs into the display fields. Any
//! failure in the batch switches to degraded mode with fixed sample data.

use futures_util::future::try_join_all;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

use super::error::{FetchError, FetchResult};
use super::fetch::DatasetFetcher;
use super::registry::{DataSourceRegistry, Dataset};
use super::state::{sample_dashboard, KpiSnapshot, ViewState};
use super::view::{DashboardView, DisplayField};
use crate::notify::{NotificationCenter, NotificationId, Severity};

/// Shown after the display fields were refreshed
pub const UPDATED_MESSAGE: &str = "Data updated successfully";

/// Shown when the batch failed and sample data is used instead
pub const FALLBACK_MESSAGE: &str = "Error loading data. Using sample data.";

/// How a load cycle ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Every dataset was fetched and merged
    Loaded,
    /// The batch failed; sample data is displayed
    Fallback,
    /// Cancelled before the batch resolved; nothing changed
    Cancelled,
}

/// Controller for one dashboard session.
///
/// Owns the view state; there is no global instance. Overlapping calls to
/// [`load_all`](Self::load_all) are allowed: each batch is merged under a
/// single write lock, so the last batch to complete wins and two batches
/// never interleave.
pub struct DashboardLoader<F, V> {
    registry: DataSourceRegistry,
    fetcher: F,
    view: V,
    state: Arc<RwLock<ViewState>>,
    notifications: NotificationCenter,
}

impl<F, V> DashboardLoader<F, V>
where
    F: DatasetFetcher,
    V: DashboardView,
{
    pub fn new(
        registry: DataSourceRegistry,
        fetcher: F,
        view: V,
        notifications: NotificationCenter,
    ) -> Self {
        Self {
            registry,
            fetcher,
            view,
            state: Arc::new(RwLock::new(ViewState::new())),
            notifications,
        }
    }

    /// Run one load cycle. Returns `true` if the real data was loaded,
    /// `false` if sample data was substituted.
    pub async fn load_all(&self) -> bool {
        self.load_with_cancel(&CancellationToken::new()).await == LoadOutcome::Loaded
    }

    /// Run one load cycle unless `cancel` fires first.
    ///
    /// A cancelled cycle leaves the view state and display untouched.
    pub async fn load_with_cancel(&self, cancel: &CancellationToken) -> LoadOutcome {
        let batch = tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Dataset load cancelled");
                return LoadOutcome::Cancelled;
            }
            batch = self.fetch_batch() => batch,
        };

        match batch {
            Ok(batch) => {
                self.state.write().await.merge(batch);
                self.update_dashboard().await;
                LoadOutcome::Loaded
            }
            Err(e) => {
                tracing::error!(error = %e, location = %e.location(), "Error loading datasets");
                self.show_error().await;
                LoadOutcome::Fallback
            }
        }
    }

    /// Fetch every dataset; fails on the first error
    async fn fetch_batch(&self) -> FetchResult<Vec<(Dataset, Value)>> {
        let fetches = self.registry.iter().map(|(dataset, location)| async move {
            let payload = self.fetcher.fetch(location).await?;
            tracing::info!(dataset = %dataset, "Dataset loaded");
            Ok::<_, FetchError>((dataset, payload))
        });

        try_join_all(fetches).await
    }

    /// Project `dashboard.kpis` into the display fields.
    ///
    /// No-op when no dashboard document is loaded.
    pub async fn update_dashboard(&self) {
        let snapshot = {
            let state = self.state.read().await;
            match state.dashboard() {
                Some(dashboard) => KpiSnapshot::from_dashboard(dashboard),
                None => return,
            }
        };

        self.render(&snapshot);
        self.show_notification(UPDATED_MESSAGE, Severity::Success)
            .await;
    }

    fn render(&self, snapshot: &KpiSnapshot) {
        self.view
            .write_text(DisplayField::CriticalAlerts, &snapshot.critical_alerts_text());
        self.view
            .write_text(DisplayField::PendingItems, &snapshot.pending.to_string());
        self.view
            .write_text(DisplayField::CompletedItems, &snapshot.completed.to_string());
        self.view
            .write_text(DisplayField::EfficiencyRate, &snapshot.efficiency.to_string());

        let now = chrono::Local::now().format("%H:%M:%S").to_string();
        if !self.view.write_text(DisplayField::LastUpdate, &now) {
            tracing::trace!("No last-update field on this view");
        }
    }

    /// Show a transient notification
    pub async fn show_notification(
        &self,
        message: impl Into<String>,
        severity: Severity,
    ) -> NotificationId {
        self.notifications.show(message, severity).await
    }

    /// Warn the user, then switch to sample data
    pub async fn show_error(&self) {
        self.show_notification(FALLBACK_MESSAGE, Severity::Warning)
            .await;
        self.load_sample_data().await;
    }

    /// Replace the dashboard document with the fixed sample and redraw
    pub async fn load_sample_data(&self) {
        self.state
            .write()
            .await
            .insert(Dataset::Dashboard, sample_dashboard());
        self.update_dashboard().await;
    }

    /// Copy of the current view state
    pub async fn view_state(&self) -> ViewState {
        self.state.read().await.clone()
    }

    /// KPIs of the currently loaded dashboard document
    pub async fn kpi_snapshot(&self) -> Option<KpiSnapshot> {
        self.state
            .read()
            .await
            .dashboard()
            .map(KpiSnapshot::from_dashboard)
    }

    pub fn registry(&self) -> &DataSourceRegistry {
        &self.registry
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn notifications(&self) -> &NotificationCenter {
        &self.notifications
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::fetch::FileFetcher;
    use crate::loader::view::TextPanel;
    use crate::notify::NotificationEvent;
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::HashMap;
    use std::time::Duration;

    /// How a failing location fails
    #[derive(Clone, Copy, Debug)]
    enum Failure {
        Status,
        Transport,
        Decode,
    }

    impl Failure {
        fn error(self, location: &str) -> FetchError {
            let location = location.to_string();
            match self {
                Failure::Status => FetchError::Status {
                    location,
                    status: 500,
                },
                Failure::Transport => FetchError::Transport {
                    location,
                    message: "connection refused".to_string(),
                },
                Failure::Decode => FetchError::Decode {
                    location,
                    source: serde_json::from_str::<Value>("{\"kpis\":").unwrap_err(),
                },
            }
        }
    }

    /// Serves canned documents; locations listed in `failing` return an error
    struct StubFetcher {
        documents: HashMap<String, Value>,
        failing: Vec<(String, Failure)>,
        delay: Duration,
    }

    impl StubFetcher {
        fn with_all(dashboard: Value) -> Self {
            let registry = DataSourceRegistry::standard();
            let documents = registry
                .iter()
                .map(|(dataset, location)| {
                    let doc = if dataset == Dataset::Dashboard {
                        dashboard.clone()
                    } else {
                        json!({ "metadata": { "tipo": dataset.as_str() } })
                    };
                    (location.to_string(), doc)
                })
                .collect();
            Self {
                documents,
                failing: Vec::new(),
                delay: Duration::ZERO,
            }
        }

        fn failing(self, dataset: Dataset) -> Self {
            self.failing_with(dataset, Failure::Status)
        }

        fn failing_with(mut self, dataset: Dataset, failure: Failure) -> Self {
            let location = DataSourceRegistry::standard().location(dataset).unwrap().to_string();
            self.failing.push((location, failure));
            self
        }

        fn delayed(mut self, delay: Duration) -> Self {
            self.delay = delay;
            self
        }
    }

    #[async_trait]
    impl DatasetFetcher for StubFetcher {
        async fn fetch(&self, location: &str) -> FetchResult<Value> {
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            if let Some((_, failure)) = self.failing.iter().find(|(l, _)| l == location) {
                return Err(failure.error(location));
            }
            self.documents
                .get(location)
                .cloned()
                .ok_or_else(|| FetchError::Status {
                    location: location.to_string(),
                    status: 404,
                })
        }
    }

    fn real_dashboard() -> Value {
        json!({
            "kpis": {
                "terminaciones_completadas": 12,
                "terminaciones_pendientes": 26,
                "terminaciones_retrasadas": 10,
                "eficiencia_general": "24.0%"
            }
        })
    }

    fn loader(fetcher: StubFetcher) -> DashboardLoader<StubFetcher, TextPanel> {
        DashboardLoader::new(
            DataSourceRegistry::standard(),
            fetcher,
            TextPanel::new(),
            NotificationCenter::default(),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_load_all_success() {
        let loader = loader(StubFetcher::with_all(real_dashboard()));

        assert!(loader.load_all().await);

        let state = loader.view_state().await;
        assert_eq!(state.len(), 4);
        assert_eq!(state.datasets(), Dataset::ALL.to_vec());
        assert_eq!(state.dashboard(), Some(&real_dashboard()));
        assert_eq!(
            state.get(Dataset::Nonconforming).unwrap()["metadata"]["tipo"],
            "nonconforming"
        );

        let view = loader.view();
        assert_eq!(view.text(DisplayField::CompletedItems).as_deref(), Some("12"));
        assert_eq!(view.text(DisplayField::PendingItems).as_deref(), Some("26"));
        assert_eq!(view.text(DisplayField::CriticalAlerts).as_deref(), Some("3"));
        assert_eq!(view.text(DisplayField::EfficiencyRate).as_deref(), Some("24.0%"));
        assert!(view.text(DisplayField::LastUpdate).is_some());

        let active = loader.notifications().active().await;
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].severity, Severity::Success);
        assert_eq!(active[0].message, UPDATED_MESSAGE);
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_failure_falls_back_to_sample() {
        for failing in Dataset::ALL {
            let loader = loader(StubFetcher::with_all(real_dashboard()).failing(failing));

            assert!(!loader.load_all().await, "failing {failing} should fall back");

            let state = loader.view_state().await;
            // Nothing from the failed batch is kept
            assert_eq!(state.datasets(), vec![Dataset::Dashboard]);

            let view = loader.view();
            assert_eq!(view.text(DisplayField::CompletedItems).as_deref(), Some("94"));
            assert_eq!(view.text(DisplayField::PendingItems).as_deref(), Some("42"));
            assert_eq!(view.text(DisplayField::CriticalAlerts).as_deref(), Some("6"));
            assert_eq!(view.text(DisplayField::EfficiencyRate).as_deref(), Some("78%"));

            let severities: Vec<_> = loader
                .notifications()
                .active()
                .await
                .into_iter()
                .map(|n| n.severity)
                .collect();
            assert_eq!(severities, vec![Severity::Warning, Severity::Success]);
        }
    }

    async fn assert_sample_panel<F: DatasetFetcher>(loader: &DashboardLoader<F, TextPanel>) {
        let view = loader.view();
        assert_eq!(view.text(DisplayField::CompletedItems).as_deref(), Some("94"));
        assert_eq!(view.text(DisplayField::CriticalAlerts).as_deref(), Some("6"));

        let severities: Vec<_> = loader
            .notifications()
            .active()
            .await
            .into_iter()
            .map(|n| n.severity)
            .collect();
        assert_eq!(severities, vec![Severity::Warning, Severity::Success]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_every_error_kind_falls_back() {
        for failure in [Failure::Status, Failure::Transport, Failure::Decode] {
            let loader = loader(
                StubFetcher::with_all(real_dashboard()).failing_with(Dataset::Termination, failure),
            );

            assert!(!loader.load_all().await, "{failure:?} should fall back");
            assert_eq!(loader.view_state().await.datasets(), vec![Dataset::Dashboard]);
            assert_sample_panel(&loader).await;
        }
    }

    #[tokio::test]
    async fn test_malformed_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        for dataset in Dataset::ALL {
            let body = match dataset {
                Dataset::Termination => "{\"metadata\": ".to_string(),
                Dataset::Dashboard => real_dashboard().to_string(),
                _ => "{}".to_string(),
            };
            std::fs::write(dir.path().join(dataset.file_name()), body).unwrap();
        }

        let loader = DashboardLoader::new(
            DataSourceRegistry::with_data_dir(dir.path()),
            FileFetcher,
            TextPanel::new(),
            NotificationCenter::default(),
        );

        assert!(!loader.load_all().await);
        assert_sample_panel(&loader).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_batch_keeps_earlier_entries() {
        let loader = loader(StubFetcher::with_all(real_dashboard()));
        assert!(loader.load_all().await);

        let failing = DashboardLoader::new(
            DataSourceRegistry::standard(),
            StubFetcher::with_all(real_dashboard()).failing(Dataset::Termination),
            TextPanel::new(),
            NotificationCenter::default(),
        );
        *failing.state.write().await = loader.view_state().await;

        assert!(!failing.load_all().await);
        let state = failing.view_state().await;
        assert_eq!(state.len(), 4);
        assert_eq!(state.dashboard(), Some(&sample_dashboard()));
        assert_eq!(
            state.get(Dataset::Termination).unwrap()["metadata"]["tipo"],
            "termination"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_update_dashboard_without_data_is_noop() {
        let loader = loader(StubFetcher::with_all(real_dashboard()));
        loader.update_dashboard().await;

        assert!(loader.view().snapshot().is_empty());
        assert_eq!(loader.notifications().active_count().await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_last_update_field_tolerated() {
        let loader = DashboardLoader::new(
            DataSourceRegistry::standard(),
            StubFetcher::with_all(real_dashboard()),
            TextPanel::without(&[DisplayField::LastUpdate]),
            NotificationCenter::default(),
        );

        assert!(loader.load_all().await);
        assert_eq!(loader.view().text(DisplayField::LastUpdate), None);
        assert_eq!(loader.view().text(DisplayField::CompletedItems).as_deref(), Some("12"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_malformed_kpis_render_placeholders() {
        let loader = loader(StubFetcher::with_all(json!({ "kpis": {} })));

        assert!(loader.load_all().await);
        let view = loader.view();
        assert_eq!(view.text(DisplayField::CompletedItems).as_deref(), Some("—"));
        assert_eq!(view.text(DisplayField::CriticalAlerts).as_deref(), Some("—"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_load_changes_nothing() {
        let loader = loader(
            StubFetcher::with_all(real_dashboard()).delayed(Duration::from_secs(10)),
        );
        let mut events = loader.notifications().subscribe();
        let token = CancellationToken::new();

        let cancel = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(1)).await;
            cancel.cancel();
        });

        assert_eq!(loader.load_with_cancel(&token).await, LoadOutcome::Cancelled);
        assert!(loader.view_state().await.is_empty());
        assert!(loader.view().snapshot().is_empty());
        assert!(events.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_overlapping_refreshes_last_batch_wins() {
        let slow = StubFetcher::with_all(json!({
            "kpis": { "terminaciones_completadas": 1 }
        }))
        .delayed(Duration::from_millis(500));
        let slow = Arc::new(loader(slow));

        let fast = StubFetcher::with_all(json!({
            "kpis": { "terminaciones_completadas": 2 }
        }))
        .delayed(Duration::from_millis(100));
        let fast = DashboardLoader::new(
            DataSourceRegistry::standard(),
            fast,
            TextPanel::new(),
            NotificationCenter::default(),
        );
        // Share one state between both controllers, as two refresh clicks would
        let fast = DashboardLoader {
            state: Arc::clone(&slow.state),
            ..fast
        };

        let first = tokio::spawn({
            let slow = Arc::clone(&slow);
            async move { slow.load_all().await }
        });
        assert!(fast.load_all().await);
        assert!(first.await.unwrap());

        let state = slow.view_state().await;
        assert_eq!(state.len(), 4);
        assert_eq!(state.dashboard().unwrap()["kpis"]["terminaciones_completadas"], 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_notifications_retract_after_load() {
        let loader = loader(StubFetcher::with_all(real_dashboard()).failing(Dataset::Dashboard));
        let mut events = loader.notifications().subscribe();

        assert!(!loader.load_all().await);
        assert_eq!(loader.notifications().active_count().await, 2);

        tokio::time::sleep(Duration::from_millis(3001)).await;
        assert_eq!(loader.notifications().active_count().await, 0);

        let mut expired = 0;
        while let Ok(event) = events.try_recv() {
            if matches!(event, NotificationEvent::Expired(_)) {
                expired += 1;
            }
        }
        assert_eq!(expired, 2);
    }
}
