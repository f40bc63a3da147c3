//! Dataset tooling
//!
//! Everything that produces the JSON files the dashboard reads:
//!
//! - **model**: typed shapes of the four datasets and `summary.json`
//! - **generator**: deterministic realistic data for a given instant
//! - **convert**: SIC3PRO HTML report → table JSON

pub mod convert;
pub mod generator;
pub mod model;

use std::path::PathBuf;
use thiserror::Error;

pub use convert::{
    convert_file, convert_html, convert_url, parse_tables, ConvertError, ConvertResult,
    ConvertedReport, ConvertedTable, DEFAULT_OUTPUT,
};
pub use generator::{generate, GeneratedDatasets};
pub use model::*;

#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type GeneratorResult<T> = Result<T, GeneratorError>;
