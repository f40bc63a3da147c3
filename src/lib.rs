//! # SIC3PRO Dashboard
//!
//! Project-control dashboard for the SIC3PRO construction tracker: loads the
//! project datasets, projects the headline KPIs, and falls back to sample
//! data when any dataset cannot be retrieved.
//!
//! ## Modules
//!
//! - [`loader`]: Concurrent dataset retrieval, view state and KPI projection
//! - [`notify`]: Auto-expiring notifications
//! - [`chart`]: Terminations-by-area chart and the activity heartbeat
//! - [`datasets`]: Dataset generator and SIC3PRO HTML converter
//! - [`server`]: Static file server for the page and its datasets
//! - [`config`]: TOML configuration with environment overrides
//! - [`logging`]: Tracing subscriber setup
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sic3pro_dashboard::datasets::generate;
//! use sic3pro_dashboard::loader::{DashboardLoader, DataSourceRegistry, FileFetcher, TextPanel};
//! use sic3pro_dashboard::notify::NotificationCenter;
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Write a fresh set of datasets
//!     let now = chrono::Local::now().naive_local();
//!     generate(now).write_all(Path::new("data/datasets")).await?;
//!
//!     // Load them and render the KPI panel
//!     let loader = DashboardLoader::new(
//!         DataSourceRegistry::with_data_dir("data/datasets"),
//!         FileFetcher,
//!         TextPanel::new(),
//!         NotificationCenter::default(),
//!     );
//!     loader.load_all().await;
//!     println!("{}", loader.view());
//!
//!     Ok(())
//! }
//! ```

pub mod chart;
pub mod config;
pub mod datasets;
pub mod loader;
pub mod logging;
pub mod notify;
pub mod server;

// Re-export top-level types for convenience
pub use loader::{
    DashboardLoader, DashboardView, DataSourceRegistry, Dataset, DatasetFetcher, DisplayField,
    FetchError, FileFetcher, HttpFetcher, KpiSnapshot, LoadOutcome, TextPanel, ViewState,
};

pub use notify::{Notification, NotificationCenter, NotificationConfig, NotificationEvent, Severity};

pub use chart::{start_heartbeat, BarChart};

pub use datasets::{ConvertError, ConvertedReport, GeneratedDatasets, GeneratorError};

pub use server::{build_router, serve, ServerError, ServerState};

pub use config::{Config, ConfigError, LoggingConfig};
