//! Mapping files.
//!
//! A mapping file tells tzmap which diagram labels are trust zones and
//! which are components, and what OTM type each one becomes:
//!
//! ```yaml
//! trustzones:
//!   - label: Public Cloud
//!     type: b61d6911-338d-46a8-9f39-8dcd24abfe91
//!     default: true
//!   - label: AWS VPC
//!     type: vpc-id
//! components:
//!   - label: EC2
//!     type: ec2-instance
//!   - label: Amazon S3
//!     id: "{C0A81E5E-5E7F-4C2F-9C1B-3F4E2B2B0D3C}"
//!     type: s3
//! dataflows: []
//! ```
//!
//! Several files can be loaded together; their lists are concatenated in
//! order. Each file is validated on its own before merging.

use indexmap::IndexMap;
use log::{debug, info};
use serde::{Deserialize, Deserializer};

use crate::{
    error::MappingError,
    shape::{normalize_label, normalize_unique_id},
};

/// Smallest mapping file accepted, in bytes.
pub const MIN_MAPPING_SIZE: usize = 5;

/// Largest mapping file accepted, in bytes.
pub const MAX_MAPPING_SIZE: usize = 5 * 1024 * 1024;

/// Accepts `true`/`false` as booleans or as strings.
fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Text(String),
    }

    Ok(match Flag::deserialize(deserializer)? {
        Flag::Bool(flag) => flag,
        Flag::Text(text) => text.trim().eq_ignore_ascii_case("true"),
    })
}

/// A trust-zone entry of a mapping file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TrustZoneMapping {
    pub label: String,
    #[serde(rename = "type")]
    pub zone_type: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub default: bool,
}

impl TrustZoneMapping {
    /// The OTM type of zones mapped by this entry: its `id` when present,
    /// its `type` otherwise.
    pub fn otm_type(&self) -> &str {
        self.id.as_deref().unwrap_or(&self.zone_type)
    }
}

/// A component entry of a mapping file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ComponentMapping {
    pub label: String,
    #[serde(rename = "type")]
    pub component_type: String,
    /// Master unique id this entry matches, with or without braces
    #[serde(default)]
    pub id: Option<String>,
}

impl ComponentMapping {
    /// Key under which this entry is looked up: the unique id if present,
    /// else the label.
    pub fn key(&self) -> String {
        normalize_label(&normalize_unique_id(self.id.as_deref().unwrap_or(&self.label)))
    }
}

/// One parsed mapping file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MappingDocument {
    pub trustzones: Vec<TrustZoneMapping>,
    pub components: Vec<ComponentMapping>,
    #[serde(default)]
    pub dataflows: Vec<serde_yaml::Value>,
}

impl MappingDocument {
    /// Validates and parses a single mapping file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file size is out of range, the content is
    /// not UTF-8, or it does not match the mapping schema.
    pub fn parse(index: usize, data: &[u8]) -> Result<Self, MappingError> {
        let size = data.len();
        if !(MIN_MAPPING_SIZE..=MAX_MAPPING_SIZE).contains(&size) {
            return Err(MappingError::InvalidSize {
                index,
                size,
                min: MIN_MAPPING_SIZE,
                max: MAX_MAPPING_SIZE,
            });
        }

        let text = std::str::from_utf8(data).map_err(|_| MappingError::NotText { index })?;
        serde_yaml::from_str(text).map_err(|source| MappingError::Schema { index, source })
    }
}

/// Resolved mappings for a run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MappingSet {
    trustzone_mappings: IndexMap<String, TrustZoneMapping>,
    component_mappings: IndexMap<String, ComponentMapping>,
    default_trust_zone: Option<TrustZoneMapping>,
    labels: Vec<String>,
}

impl MappingSet {
    /// Validates, parses and merges a sequence of mapping files.
    ///
    /// # Errors
    ///
    /// Returns [`MappingError::Empty`] when no file is given, or the first
    /// validation error of any file.
    pub fn load<I, B>(files: I) -> Result<Self, MappingError>
    where
        I: IntoIterator<Item = B>,
        B: AsRef<[u8]>,
    {
        let documents = files
            .into_iter()
            .enumerate()
            .map(|(index, data)| MappingDocument::parse(index, data.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;

        if documents.is_empty() {
            return Err(MappingError::Empty);
        }

        info!(files_count = documents.len(); "Mapping files loaded");
        Ok(Self::from_documents(documents))
    }

    /// Convenience wrapper around [`MappingSet::load`] for a single YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, MappingError> {
        Self::load([yaml])
    }

    /// Merges already parsed documents, in order.
    pub fn from_documents(documents: impl IntoIterator<Item = MappingDocument>) -> Self {
        let mut set = Self::default();

        for document in documents {
            for trustzone in document.trustzones {
                set.labels.push(trustzone.label.clone());
                if trustzone.default {
                    set.default_trust_zone = Some(trustzone.clone());
                }
                set.trustzone_mappings
                    .insert(trustzone.label.clone(), trustzone);
            }

            for component in document.components {
                set.labels.push(component.label.clone());
                if let Some(id) = &component.id {
                    set.labels.push(normalize_unique_id(id));
                }
                set.component_mappings.insert(component.key(), component);
            }
        }

        debug!(
            trustzones_count = set.trustzone_mappings.len(),
            components_count = set.component_mappings.len(),
            has_default = set.default_trust_zone.is_some();
            "Mappings resolved"
        );

        set
    }

    /// Trust-zone mappings keyed by label
    pub fn trustzone_mappings(&self) -> &IndexMap<String, TrustZoneMapping> {
        &self.trustzone_mappings
    }

    /// Component mappings keyed by [`ComponentMapping::key`]
    pub fn component_mappings(&self) -> &IndexMap<String, ComponentMapping> {
        &self.component_mappings
    }

    /// The last trust-zone entry flagged as default, if any
    pub fn default_trust_zone(&self) -> Option<&TrustZoneMapping> {
        self.default_trust_zone.as_ref()
    }

    /// Every configured label and component unique id, in file order
    pub fn labels(&self) -> &[String] {
        &self.labels
    }
}
