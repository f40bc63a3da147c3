//! Shared server state

use std::path::PathBuf;
use std::time::Instant;

use crate::config::ServerConfig;
use crate::loader::{DataSourceRegistry, Dataset};

#[derive(Debug, Clone)]
pub struct ServerState {
    /// Served at `/`
    pub static_dir: PathBuf,
    /// Served at `/data`
    pub data_root: PathBuf,
    pub start_time: Instant,
    registry: DataSourceRegistry,
}

impl ServerState {
    pub fn new(static_dir: impl Into<PathBuf>, data_root: impl Into<PathBuf>) -> Self {
        let data_root = data_root.into();
        Self {
            static_dir: static_dir.into(),
            registry: DataSourceRegistry::with_data_dir(data_root.join("datasets")),
            data_root,
            start_time: Instant::now(),
        }
    }

    pub fn from_config(config: &ServerConfig) -> Self {
        Self::new(&config.static_dir, &config.data_root)
    }

    /// On-disk path of every registered dataset
    pub fn dataset_paths(&self) -> impl Iterator<Item = (Dataset, &str)> {
        self.registry.iter()
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
