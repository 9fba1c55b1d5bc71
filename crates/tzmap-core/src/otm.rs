//! Open Threat Model (OTM) graph types.
//!
//! These are the output entities of the normalization pipeline: trust zones
//! and components are the nodes, dataflows are the edges. All types derive
//! [`serde::Serialize`] and produce the OTM JSON layout directly.
//!
//! # Overview
//!
//! - [`Otm`] - The whole document with its project header
//! - [`TrustZone`] - A security boundary that may contain components and other zones
//! - [`Component`] - A system element, always parented to a zone or another component
//! - [`Dataflow`] - A directed (or bidirectional) connection between two components
//! - [`Representation`] / [`ElementRepresentation`] - Visual metadata

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

/// OTM document version emitted by this crate.
pub const OTM_VERSION: &str = "0.1.0";

/// Trust rating attached to every trust zone.
pub const DEFAULT_TRUST_RATING: u32 = 10;

/// Free-form attributes of an entity.
pub type Attributes = BTreeMap<String, Value>;

/// Kind of entity a parent reference points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParentKind {
    TrustZone,
    Component,
}

/// Reference from a child entity to its parent.
///
/// Serializes as `{"trustZone": "<id>"}` or `{"component": "<id>"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Parent {
    TrustZone(String),
    Component(String),
}

impl Parent {
    pub fn new(kind: ParentKind, id: impl Into<String>) -> Self {
        match kind {
            ParentKind::TrustZone => Self::TrustZone(id.into()),
            ParentKind::Component => Self::Component(id.into()),
        }
    }

    /// Returns the referenced entity id
    pub fn id(&self) -> &str {
        match self {
            Self::TrustZone(id) | Self::Component(id) => id,
        }
    }

    /// Returns the kind of entity referenced
    pub fn kind(&self) -> ParentKind {
        match self {
            Self::TrustZone(_) => ParentKind::TrustZone,
            Self::Component(_) => ParentKind::Component,
        }
    }

    /// Points this reference at a different id, keeping its kind
    pub fn set_id(&mut self, new_id: impl Into<String>) {
        match self {
            Self::TrustZone(id) | Self::Component(id) => *id = new_id.into(),
        }
    }
}

/// Kind of a top-level representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RepresentationKind {
    Diagram,
}

/// Width and height in representation units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RepresentationSize {
    pub width: f64,
    pub height: f64,
}

/// Top-left position in representation units, y growing downwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RepresentationPosition {
    pub x: f64,
    pub y: f64,
}

/// A top-level representation of the model.
///
/// `size`, when present, is the overall diagram size.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Representation {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: RepresentationKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<RepresentationSize>,
}

/// A diagram-anchored representation of a single trust zone or component.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElementRepresentation {
    pub id: String,
    pub name: String,
    /// Id of the top-level [`Representation`] this element is drawn in.
    pub representation: String,
    pub position: RepresentationPosition,
    pub size: RepresentationSize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Risk {
    pub trust_rating: u32,
}

impl Default for Risk {
    fn default() -> Self {
        Self {
            trust_rating: DEFAULT_TRUST_RATING,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrustZone {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub zone_type: String,
    pub risk: Risk,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<Parent>,
    #[serde(skip_serializing_if = "Attributes::is_empty")]
    pub attributes: Attributes,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub representations: Vec<ElementRepresentation>,
}

impl TrustZone {
    pub fn new(id: impl Into<String>, name: impl Into<String>, zone_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            zone_type: zone_type.into(),
            risk: Risk::default(),
            parent: None,
            attributes: Attributes::new(),
            representations: Vec::new(),
        }
    }

    pub fn with_parent(mut self, parent: Option<Parent>) -> Self {
        self.parent = parent;
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: Value) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }

    pub fn with_representations(mut self, representations: Vec<ElementRepresentation>) -> Self {
        self.representations = representations;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Threat {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Mitigation {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Component {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub component_type: String,
    pub parent: Parent,
    #[serde(skip_serializing_if = "Attributes::is_empty")]
    pub attributes: Attributes,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub representations: Vec<ElementRepresentation>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub threats: Vec<Threat>,
}

impl Component {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        component_type: impl Into<String>,
        parent: Parent,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            component_type: component_type.into(),
            parent,
            attributes: Attributes::new(),
            tags: Vec::new(),
            representations: Vec::new(),
            threats: Vec::new(),
        }
    }

    pub fn with_representations(mut self, representations: Vec<ElementRepresentation>) -> Self {
        self.representations = representations;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dataflow {
    pub id: String,
    pub name: String,
    #[serde(rename = "source")]
    pub source_id: String,
    #[serde(rename = "destination")]
    pub destination_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bidirectional: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Project {
    pub name: String,
    pub id: String,
}

/// A complete threat-model graph.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Otm {
    pub otm_version: String,
    pub project: Project,
    pub representations: Vec<Representation>,
    pub trust_zones: Vec<TrustZone>,
    pub components: Vec<Component>,
    pub dataflows: Vec<Dataflow>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub threats: Vec<Threat>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub mitigations: Vec<Mitigation>,
}

impl Otm {
    /// Creates an empty document for the given project
    pub fn new(project_name: impl Into<String>, project_id: impl Into<String>) -> Self {
        Self {
            otm_version: OTM_VERSION.to_string(),
            project: Project {
                name: project_name.into(),
                id: project_id.into(),
            },
            representations: Vec::new(),
            trust_zones: Vec::new(),
            components: Vec::new(),
            dataflows: Vec::new(),
            threats: Vec::new(),
            mitigations: Vec::new(),
        }
    }

    pub fn trust_zone(&self, id: &str) -> Option<&TrustZone> {
        self.trust_zones.iter().find(|tz| tz.id == id)
    }

    pub fn component(&self, id: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.id == id)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_parent_serializes_as_tagged_object() {
        let parent = Parent::new(ParentKind::TrustZone, "vpc");
        assert_eq!(serde_json::to_value(&parent).unwrap(), json!({"trustZone": "vpc"}));

        let parent = Parent::new(ParentKind::Component, "ec2");
        assert_eq!(serde_json::to_value(&parent).unwrap(), json!({"component": "ec2"}));
    }

    #[test]
    fn test_parent_set_id_keeps_kind() {
        let mut parent = Parent::TrustZone("old".to_string());
        parent.set_id("new");
        assert_eq!(parent, Parent::TrustZone("new".to_string()));
        assert_eq!(parent.kind(), ParentKind::TrustZone);
    }

    #[test]
    fn test_otm_json_layout() {
        let mut otm = Otm::new("Project", "project-id");
        otm.trust_zones.push(TrustZone::new("tz", "Internet", "internet"));
        otm.components.push(Component::new(
            "1",
            "EC2",
            "ec2",
            Parent::TrustZone("tz".to_string()),
        ));
        otm.dataflows.push(Dataflow {
            id: "df".to_string(),
            name: "flow".to_string(),
            source_id: "1".to_string(),
            destination_id: "1".to_string(),
            bidirectional: None,
        });

        let value = serde_json::to_value(&otm).unwrap();

        assert_eq!(value["otmVersion"], json!(OTM_VERSION));
        assert_eq!(value["project"], json!({"name": "Project", "id": "project-id"}));
        assert_eq!(value["trustZones"][0]["risk"], json!({"trustRating": 10}));
        assert_eq!(value["trustZones"][0]["type"], json!("internet"));
        assert!(value["trustZones"][0].get("parent").is_none());
        assert_eq!(value["components"][0]["parent"], json!({"trustZone": "tz"}));
        assert!(value["components"][0].get("representations").is_none());
        assert_eq!(value["dataflows"][0]["source"], json!("1"));
        assert!(value["dataflows"][0].get("bidirectional").is_none());
        assert!(value.get("threats").is_none());
        assert!(value.get("mitigations").is_none());
    }

    #[test]
    fn test_representation_kind_serialization() {
        let representation = Representation {
            id: "r".to_string(),
            name: "r".to_string(),
            kind: RepresentationKind::Diagram,
            size: None,
        };
        let value = serde_json::to_value(&representation).unwrap();
        assert_eq!(value, json!({"id": "r", "name": "r", "type": "diagram"}));
    }
}
