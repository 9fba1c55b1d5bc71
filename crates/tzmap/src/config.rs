//! Configuration types for the tzmap pipeline.
//!
//! All types implement [`serde::Deserialize`] so they can be loaded from a
//! TOML file; every field is optional and falls back to its default.
//!
//! # Example
//!
//! ```
//! # use tzmap::config::AppConfig;
//! let config = AppConfig::default();
//! assert_eq!(config.pipeline().boundary_marker(), "Curved panel");
//! assert!(config.pipeline().prune_incomplete_representations());
//! assert!(!config.pipeline().public_cloud_fallback());
//! ```

use serde::Deserialize;

/// Shape class substring that marks a boundary panel.
pub const DEFAULT_BOUNDARY_MARKER: &str = "Curved panel";

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Pipeline configuration section.
    #[serde(default)]
    pipeline: PipelineConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] with the given pipeline section.
    pub fn new(pipeline: PipelineConfig) -> Self {
        Self { pipeline }
    }

    /// Returns the pipeline configuration.
    pub fn pipeline(&self) -> &PipelineConfig {
        &self.pipeline
    }
}

/// Settings that change how diagrams are classified and assembled.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Substring of a shape's class name that marks it as a boundary.
    boundary_marker: String,

    /// Strip every representation when any mapped element lacks one.
    prune_incomplete_representations: bool,

    /// Use the built-in "Public Cloud" trust zone when no mapping declares
    /// a default.
    public_cloud_fallback: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            boundary_marker: DEFAULT_BOUNDARY_MARKER.to_string(),
            prune_incomplete_representations: true,
            public_cloud_fallback: false,
        }
    }
}

impl PipelineConfig {
    pub fn boundary_marker(&self) -> &str {
        &self.boundary_marker
    }

    pub fn prune_incomplete_representations(&self) -> bool {
        self.prune_incomplete_representations
    }

    pub fn public_cloud_fallback(&self) -> bool {
        self.public_cloud_fallback
    }

    pub fn with_boundary_marker(mut self, marker: impl Into<String>) -> Self {
        self.boundary_marker = marker.into();
        self
    }

    pub fn with_prune_incomplete_representations(mut self, enabled: bool) -> Self {
        self.prune_incomplete_representations = enabled;
        self
    }

    pub fn with_public_cloud_fallback(mut self, enabled: bool) -> Self {
        self.public_cloud_fallback = enabled;
        self
    }
}
