//! Dataset retrieval errors

use thiserror::Error;

/// Errors that can occur while retrieving a single dataset.
///
/// The loader collapses all of these into one "load failed" outcome; the
/// variants exist so the cause can be logged.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Network or transport failure
    #[error("Transport error fetching {location}: {message}")]
    Transport { location: String, message: String },

    /// Non-success HTTP status
    #[error("Unexpected status {status} fetching {location}")]
    Status { location: String, status: u16 },

    /// Body was not valid JSON
    #[error("Invalid JSON in {location}: {source}")]
    Decode {
        location: String,
        #[source]
        source: serde_json::Error,
    },

    /// Local file could not be read
    #[error("IO error reading {location}: {source}")]
    Io {
        location: String,
        #[source]
        source: std::io::Error,
    },
}

impl FetchError {
    /// Location that failed
    pub fn location(&self) -> &str {
        match self {
            FetchError::Transport { location, .. }
            | FetchError::Status { location, .. }
            | FetchError::Decode { location, .. }
            | FetchError::Io { location, .. } => location,
        }
    }
}

/// Result type alias for dataset retrieval
pub type FetchResult<T> = Result<T, FetchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FetchError::Status {
            location: "data/datasets/dashboard.json".to_string(),
            status: 404,
        };
        assert_eq!(
            err.to_string(),
            "Unexpected status 404 fetching data/datasets/dashboard.json"
        );
        assert_eq!(err.location(), "data/datasets/dashboard.json");
    }

    #[test]
    fn test_decode_error_keeps_source() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = FetchError::Decode {
            location: "x.json".to_string(),
            source,
        };
        assert!(std::error::Error::source(&err).is_some());
    }
}
