//! Tracing setup
//!
//! `RUST_LOG` takes precedence over the configured level.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;

/// Output format of the fmt layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    /// Unknown names fall back to pretty output
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "json" => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

/// Filter directive for the configured level
pub fn filter_directive(config: &LoggingConfig) -> String {
    format!("sic3pro_dashboard={},tower_http=info", config.level)
}

/// Install the global subscriber. Call once, from the binary.
pub fn init_tracing(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(config)));

    let registry = tracing_subscriber::registry().with(filter);

    match LogFormat::from_name(&config.format) {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_names() {
        assert_eq!(LogFormat::from_name("json"), LogFormat::Json);
        assert_eq!(LogFormat::from_name("JSON"), LogFormat::Json);
        assert_eq!(LogFormat::from_name("pretty"), LogFormat::Pretty);
        assert_eq!(LogFormat::from_name("compact"), LogFormat::Pretty);
    }

    #[test]
    fn test_filter_directive_parses() {
        let config = LoggingConfig {
            level: "debug".to_string(),
            ..Default::default()
        };
        let directive = filter_directive(&config);
        assert_eq!(directive, "sic3pro_dashboard=debug,tower_http=info");
        assert!(EnvFilter::try_new(&directive).is_ok());
    }
}
