//! Dataset retrieval

pub mod client;

pub use client::{fetch_all, load_all, DATASETS};
