//! Mapping of a pruned diagram onto OTM entities.
//!
//! The mappers run in a fixed order: trust zones first (they flag their
//! shapes), then components, then dataflows. A shape's OTM parent is its
//! nearest ancestor that is itself emitted, so every `parent` reference in
//! the output names an entity of the same document.

mod component;
mod connector;
mod representation;
mod trust_zone;

pub use component::{ComponentMapper, EMPTY_COMPONENT_TYPE};
pub use connector::ConnectorMapper;
pub use representation::{REPRESENTATION_SCALE, RepresentationCalculator};
pub use trust_zone::{PUBLIC_CLOUD_LABEL, PUBLIC_CLOUD_TYPE, TrustZoneMapper, default_trust_zone};

use indexmap::IndexMap;

use tzmap_core::otm::{Parent, ParentKind};
use tzmap_source::{
    mapping::{ComponentMapping, MappingSet},
    shape::normalize_label,
};

use crate::diagram::{Diagram, DiagramShape, ShapeIndex};

/// Finds the component mapping that applies to a shape.
#[derive(Debug, Clone, Copy)]
pub struct ComponentLookup<'a> {
    mappings: &'a IndexMap<String, ComponentMapping>,
}

impl<'a> ComponentLookup<'a> {
    pub fn new(mappings: &'a MappingSet) -> Self {
        Self {
            mappings: mappings.component_mappings(),
        }
    }

    /// Mapping matched by unique id, name or type label, in that order.
    ///
    /// A match with an empty type yields to a later match that has one; if
    /// none does, the first match is returned.
    pub fn find(&self, shape: &DiagramShape) -> Option<&'a ComponentMapping> {
        let mut matches = [shape.unique_id(), shape.name(), shape.type_label()]
            .into_iter()
            .filter(|key| !key.is_empty())
            .filter_map(|key| self.mappings.get(normalize_label(key).as_str()));

        let first = matches.next()?;
        if !first.component_type.is_empty() {
            return Some(first);
        }
        matches
            .find(|mapping| !mapping.component_type.is_empty())
            .or(Some(first))
    }

    /// True if `shape` becomes a component: it is not a trust zone and a
    /// component mapping applies to it.
    pub fn is_component(&self, shape: &DiagramShape) -> bool {
        !shape.is_trust_zone() && self.find(shape).is_some()
    }
}

/// Nearest ancestor of `index` that is emitted as a trust zone or component.
pub(crate) fn emitted_parent(
    diagram: &Diagram,
    index: ShapeIndex,
    lookup: ComponentLookup<'_>,
) -> Option<(ShapeIndex, Parent)> {
    diagram.ancestors(index).find_map(|ancestor| {
        let shape = diagram.shape(ancestor);
        let kind = if shape.is_trust_zone() {
            ParentKind::TrustZone
        } else if lookup.is_component(shape) {
            ParentKind::Component
        } else {
            return None;
        };
        Some((ancestor, Parent::new(kind, shape.id())))
    })
}
