//! Dataset retrieval
//!
//! The loader only sees the [`DatasetFetcher`] trait. Two implementations
//! ship with the crate: HTTP GET via `reqwest`, and plain file reads for
//! datasets sitting on local disk.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use super::error::{FetchError, FetchResult};

/// Retrieves and decodes one JSON document
#[async_trait]
pub trait DatasetFetcher: Send + Sync {
    /// Fetch the document at `location` and decode it as JSON
    async fn fetch(&self, location: &str) -> FetchResult<Value>;
}

#[async_trait]
impl<F: DatasetFetcher + ?Sized> DatasetFetcher for Box<F> {
    async fn fetch(&self, location: &str) -> FetchResult<Value> {
        (**self).fetch(location).await
    }
}

#[async_trait]
impl<F: DatasetFetcher + ?Sized> DatasetFetcher for std::sync::Arc<F> {
    async fn fetch(&self, location: &str) -> FetchResult<Value> {
        (**self).fetch(location).await
    }
}

/// HTTP GET fetcher.
///
/// Expects a 2xx response with a JSON body. No timeout and no retry.
#[derive(Debug, Clone, Default)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    /// Use an existing client (shared connection pool)
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DatasetFetcher for HttpFetcher {
    async fn fetch(&self, location: &str) -> FetchResult<Value> {
        let transport = |e: reqwest::Error| FetchError::Transport {
            location: location.to_string(),
            message: e.to_string(),
        };

        let response = self.client.get(location).send().await.map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                location: location.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(transport)?;

        serde_json::from_slice(&body).map_err(|source| FetchError::Decode {
            location: location.to_string(),
            source,
        })
    }
}

/// Reads datasets from the local filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct FileFetcher;

#[async_trait]
impl DatasetFetcher for FileFetcher {
    async fn fetch(&self, location: &str) -> FetchResult<Value> {
        let body = tokio::fs::read(location)
            .await
            .map_err(|source| FetchError::Io {
                location: location.to_string(),
                source,
            })?;

        serde_json::from_slice(&body).map_err(|source| FetchError::Decode {
            location: location.to_string(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_file_fetcher_reads_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dashboard.json");
        std::fs::write(&path, r#"{"kpis": {"terminaciones_completadas": 3}}"#).unwrap();

        let value = FileFetcher.fetch(path.to_str().unwrap()).await.unwrap();
        assert_eq!(value["kpis"]["terminaciones_completadas"], 3);
    }

    #[tokio::test]
    async fn test_file_fetcher_missing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing.json");

        let err = FileFetcher.fetch(path.to_str().unwrap()).await.unwrap_err();
        assert!(matches!(err, FetchError::Io { .. }));
    }

    #[tokio::test]
    async fn test_file_fetcher_invalid_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "not json").unwrap();

        let err = FileFetcher.fetch(path.to_str().unwrap()).await.unwrap_err();
        assert!(matches!(err, FetchError::Decode { .. }));
    }

    #[tokio::test]
    async fn test_http_fetcher_relative_location_fails() {
        let err = HttpFetcher::new()
            .fetch("data/datasets/dashboard.json")
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Transport { .. }));
    }

    #[tokio::test]
    async fn test_boxed_fetcher_delegates() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("x.json");
        std::fs::write(&path, "[1, 2]").unwrap();

        let boxed: Box<dyn DatasetFetcher> = Box::new(FileFetcher);
        let value = boxed.fetch(path.to_str().unwrap()).await.unwrap();
        assert_eq!(value, serde_json::json!([1, 2]));
    }
}
