//! Error types for tzmap operations.
//!
//! [`TzmapError`] wraps every failure the pipeline can report. All of them
//! are fatal: a run either produces a complete threat model or nothing.

use std::io;

use thiserror::Error;

use tzmap_core::geometry::GeometryError;
use tzmap_source::{MappingError, SourceError};

/// The main error type for tzmap operations.
#[derive(Debug, Error)]
pub enum TzmapError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    #[error("Mapping error: {0}")]
    Mapping(#[from] MappingError),

    #[error("Geometry error: {0}")]
    Geometry(#[from] GeometryError),

    /// The mapping files cannot place every component, typically because no
    /// trust zone is flagged as default.
    #[error("Mapping configuration error: {0}")]
    MappingConfiguration(String),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}
