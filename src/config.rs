//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::loader::{DataSourceRegistry, DEFAULT_DATASET_DIR};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub notifications: NotificationsConfig,

    #[serde(default)]
    pub chart: ChartConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where datasets are read from
#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    /// When set, datasets are fetched over HTTP from `{base_url}/data/datasets/`
    #[serde(default)]
    pub base_url: Option<String>,

    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

fn default_data_dir() -> String {
    DEFAULT_DATASET_DIR.to_string()
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            data_dir: default_data_dir(),
        }
    }
}

impl DataConfig {
    /// Registry for the configured source. A base URL wins over the directory.
    pub fn registry(&self) -> DataSourceRegistry {
        match &self.base_url {
            Some(url) => DataSourceRegistry::with_base_url(url),
            None => DataSourceRegistry::with_data_dir(&self.data_dir),
        }
    }
}

/// Toast notification settings
#[derive(Debug, Clone, Deserialize)]
pub struct NotificationsConfig {
    #[serde(default = "default_display_ms")]
    pub display_ms: u64,
}

fn default_display_ms() -> u64 {
    crate::notify::DEFAULT_DISPLAY_MS
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            display_ms: default_display_ms(),
        }
    }
}

impl NotificationsConfig {
    pub fn display(&self) -> Duration {
        Duration::from_millis(self.display_ms)
    }
}

/// Chart and heartbeat settings
#[derive(Debug, Clone, Deserialize)]
pub struct ChartConfig {
    #[serde(default = "default_heartbeat_secs")]
    pub heartbeat_secs: u64,
}

fn default_heartbeat_secs() -> u64 {
    crate::chart::DEFAULT_HEARTBEAT_SECS
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            heartbeat_secs: default_heartbeat_secs(),
        }
    }
}

impl ChartConfig {
    pub fn heartbeat(&self) -> Duration {
        Duration::from_secs(self.heartbeat_secs)
    }
}

/// Static server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory served at `/`
    #[serde(default = "default_static_dir")]
    pub static_dir: String,

    /// Directory served at `/data`
    #[serde(default = "default_data_root")]
    pub data_root: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8084
}

fn default_static_dir() -> String {
    "dashboard-ui/dist".to_string()
}

fn default_data_root() -> String {
    "data".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: default_static_dir(),
            data_root: default_data_root(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("sic3pro-dashboard").join("config.toml")),
            Some(PathBuf::from("/etc/sic3pro-dashboard/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path_opt in config_paths.iter().flatten() {
            if path_opt.exists() {
                match Self::load_with_env(path_opt) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path_opt);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path_opt, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("SIC3PRO_BASE_URL") {
            self.data.base_url = Some(url);
        }
        if let Some(dir) = lookup("SIC3PRO_DATA_DIR") {
            self.data.data_dir = dir;
        }

        if let Some(host) = lookup("SIC3PRO_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("SIC3PRO_PORT") {
            match port.parse() {
                Ok(p) => self.server.port = p,
                Err(_) => tracing::warn!(value = %port, "Ignoring invalid SIC3PRO_PORT"),
            }
        }

        if let Some(level) = lookup("SIC3PRO_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("SIC3PRO_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# SIC3PRO Dashboard Configuration
#
# Environment variables override these settings:
# - SIC3PRO_BASE_URL
# - SIC3PRO_DATA_DIR
# - SIC3PRO_HOST
# - SIC3PRO_PORT
# - SIC3PRO_LOG_LEVEL
# - SIC3PRO_LOG_FORMAT

[data]
# Fetch datasets over HTTP from {base_url}/data/datasets/ instead of disk
# base_url = "http://localhost:8084"

# Directory holding dashboard.json, termination.json, ...
data_dir = "data/datasets"

[notifications]
# How long a toast stays visible (ms)
display_ms = 3000

[chart]
# Period of the "dashboard active" log line (seconds)
heartbeat_secs = 60

[server]
host = "127.0.0.1"
port = 8084

# Directory served at /
static_dir = "dashboard-ui/dist"

# Directory served at /data
data_root = "data"

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
