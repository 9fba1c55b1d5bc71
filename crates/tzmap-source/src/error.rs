//! Error types for reading diagram inputs.

use std::io;

use thiserror::Error;

/// Errors raised while reading a page export.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("diagram file has invalid size: {size} bytes (expected {min}..={max})")]
    InvalidSize { size: u64, min: u64, max: u64 },

    #[error("diagram file is not a valid page export: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

/// Errors raised while loading mapping files.
#[derive(Debug, Error)]
pub enum MappingError {
    #[error("no mapping file was provided")]
    Empty,

    #[error("mapping file #{index} has invalid size: {size} bytes (expected {min}..={max})")]
    InvalidSize {
        index: usize,
        size: usize,
        min: usize,
        max: usize,
    },

    #[error("mapping file #{index} cannot be read as plain text")]
    NotText { index: usize },

    #[error("mapping file #{index} is not valid: {source}")]
    Schema {
        index: usize,
        #[source]
        source: serde_yaml::Error,
    },
}
