//! Dataset registry
//!
//! Fixed mapping from logical dataset name to retrieval location.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Default relative directory holding the dataset files
pub const DEFAULT_DATASET_DIR: &str = "data/datasets";

/// Logical dataset names known to the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dataset {
    Dashboard,
    Termination,
    Nonconformities,
    Nonconforming,
}

impl Dataset {
    /// All datasets in registration order
    pub const ALL: [Dataset; 4] = [
        Dataset::Dashboard,
        Dataset::Termination,
        Dataset::Nonconformities,
        Dataset::Nonconforming,
    ];

    /// Logical name, also the file stem
    pub fn as_str(&self) -> &'static str {
        match self {
            Dataset::Dashboard => "dashboard",
            Dataset::Termination => "termination",
            Dataset::Nonconformities => "nonconformities",
            Dataset::Nonconforming => "nonconforming",
        }
    }

    /// File name under the dataset directory
    pub fn file_name(&self) -> String {
        format!("{}.json", self.as_str())
    }

    /// Parse a logical name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.as_str() == name)
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable mapping from dataset to location.
///
/// Locations are relative paths by default (`data/datasets/<name>.json`),
/// matching what the browser front-end fetches. They can be re-rooted once
/// under a base URL or a directory; there is no way to change them afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataSourceRegistry {
    entries: Vec<(Dataset, String)>,
}

impl DataSourceRegistry {
    /// The standard registry with relative locations
    pub fn standard() -> Self {
        Self::rooted_at(DEFAULT_DATASET_DIR)
    }

    /// Registry with every dataset under the given base URL.
    ///
    /// The base is expected to point at the site root; the standard
    /// `data/datasets/` prefix is appended.
    pub fn with_base_url(base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/');
        Self {
            entries: Dataset::ALL
                .into_iter()
                .map(|d| (d, format!("{}/{}/{}", base, DEFAULT_DATASET_DIR, d.file_name())))
                .collect(),
        }
    }

    /// Registry with every dataset directly inside `dir`
    pub fn with_data_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            entries: Dataset::ALL
                .into_iter()
                .map(|d| (d, dir.join(d.file_name()).to_string_lossy().to_string()))
                .collect(),
        }
    }

    fn rooted_at(prefix: &str) -> Self {
        Self {
            entries: Dataset::ALL
                .into_iter()
                .map(|d| (d, format!("{}/{}", prefix, d.file_name())))
                .collect(),
        }
    }

    /// Location of a dataset
    pub fn location(&self, dataset: Dataset) -> Option<&str> {
        self.entries
            .iter()
            .find(|(d, _)| *d == dataset)
            .map(|(_, loc)| loc.as_str())
    }

    /// Iterate in registration order
    pub fn iter(&self) -> impl Iterator<Item = (Dataset, &str)> {
        self.entries.iter().map(|(d, loc)| (*d, loc.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for DataSourceRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_locations() {
        let registry = DataSourceRegistry::standard();
        assert_eq!(registry.len(), 4);
        assert_eq!(
            registry.location(Dataset::Dashboard),
            Some("data/datasets/dashboard.json")
        );
        assert_eq!(
            registry.location(Dataset::Nonconforming),
            Some("data/datasets/nonconforming.json")
        );
    }

    #[test]
    fn test_registration_order() {
        let registry = DataSourceRegistry::standard();
        let names: Vec<_> = registry.iter().map(|(d, _)| d.as_str()).collect();
        assert_eq!(
            names,
            vec!["dashboard", "termination", "nonconformities", "nonconforming"]
        );
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let registry = DataSourceRegistry::with_base_url("http://localhost:8084/");
        assert_eq!(
            registry.location(Dataset::Termination),
            Some("http://localhost:8084/data/datasets/termination.json")
        );
    }

    #[test]
    fn test_data_dir() {
        let registry = DataSourceRegistry::with_data_dir("/srv/datasets");
        assert_eq!(
            registry.location(Dataset::Nonconformities),
            Some("/srv/datasets/nonconformities.json")
        );
    }

    #[test]
    fn test_dataset_from_name() {
        assert_eq!(Dataset::from_name("termination"), Some(Dataset::Termination));
        assert_eq!(Dataset::from_name("summary"), None);
    }
}
