//! Dashboard Loader
//!
//! Retrieves the dashboard datasets and turns them into display text.
//!
//! - **registry**: fixed dataset → location mapping
//! - **fetch**: retrieval seam (HTTP, filesystem)
//! - **state**: view state and KPI projection
//! - **view**: display-field contract
//! - **controller**: the load cycle and degraded-mode fallback
//! - **error**: retrieval errors
//!
//! # Load cycle
//!
//! ```text
//!   registry ─► fetch × N (concurrent) ─► all ok? ─► merge ─► update view
//!                                            │
//!                                            └─ any error ─► warn ─► sample data ─► update view
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use sic3pro_dashboard::loader::{DashboardLoader, DataSourceRegistry, HttpFetcher, TextPanel};
//! use sic3pro_dashboard::notify::NotificationCenter;
//!
//! #[tokio::main]
//! async fn main() {
//!     let loader = DashboardLoader::new(
//!         DataSourceRegistry::with_base_url("http://localhost:8084"),
//!         HttpFetcher::new(),
//!         TextPanel::new(),
//!         NotificationCenter::default(),
//!     );
//!
//!     let loaded = loader.load_all().await;
//!     println!("real data: {}\n{}", loaded, loader.view());
//! }
//! ```

pub mod controller;
pub mod error;
pub mod fetch;
pub mod registry;
pub mod state;
pub mod view;

pub use controller::{DashboardLoader, LoadOutcome, FALLBACK_MESSAGE, UPDATED_MESSAGE};
pub use error::{FetchError, FetchResult};
pub use fetch::{DatasetFetcher, FileFetcher, HttpFetcher};
pub use registry::{DataSourceRegistry, Dataset, DEFAULT_DATASET_DIR};
pub use state::{critical_alerts, sample_dashboard, KpiSnapshot, KpiValue, ViewState};
pub use view::{DashboardView, DisplayField, TextPanel};
