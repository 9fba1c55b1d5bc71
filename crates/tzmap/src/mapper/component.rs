use log::{debug, trace};

use tzmap_core::otm::{Component, Parent};

use super::{ComponentLookup, RepresentationCalculator, emitted_parent};
use crate::{TzmapError, diagram::Diagram};

/// Type given to components whose mapping entry has an empty type.
pub const EMPTY_COMPONENT_TYPE: &str = "empty-component";

/// Maps non-zone shapes matched by a component mapping.
///
/// Must run after [`super::TrustZoneMapper`] so that zone shapes are
/// already flagged.
pub struct ComponentMapper<'a> {
    lookup: ComponentLookup<'a>,
    default_zone_id: Option<&'a str>,
    calculator: &'a RepresentationCalculator,
}

impl<'a> ComponentMapper<'a> {
    pub fn new(
        lookup: ComponentLookup<'a>,
        default_zone_id: Option<&'a str>,
        calculator: &'a RepresentationCalculator,
    ) -> Self {
        Self {
            lookup,
            default_zone_id,
            calculator,
        }
    }

    /// Returns the components of `diagram`.
    ///
    /// # Errors
    ///
    /// Returns [`TzmapError::MappingConfiguration`] if a component has no
    /// emitted ancestor and there is no default trust zone to adopt it.
    pub fn map(&self, diagram: &Diagram) -> Result<Vec<Component>, TzmapError> {
        let mut components = Vec::new();

        for (index, shape) in diagram.indexed_shapes() {
            if shape.is_trust_zone() {
                continue;
            }
            let Some(mapping) = self.lookup.find(shape) else {
                continue;
            };

            let (parent_index, parent) = emitted_parent(diagram, index, self.lookup).unzip();
            let parent = match (parent, self.default_zone_id) {
                (Some(parent), _) => parent,
                (None, Some(default_id)) => Parent::TrustZone(default_id.to_string()),
                (None, None) => {
                    return Err(TzmapError::MappingConfiguration(format!(
                        "component '{}' ({}) is outside every trust zone and no default trust \
                         zone is defined; flag one trust zone with `default: true`",
                        shape.name(),
                        shape.id()
                    )));
                }
            };

            let component_type = if mapping.component_type.is_empty() {
                EMPTY_COMPONENT_TYPE
            } else {
                mapping.component_type.as_str()
            };
            let representations = self
                .calculator
                .element_representation(diagram, index, parent_index)
                .into_iter()
                .collect();

            trace!(
                shape_id = shape.id(),
                component_type,
                parent = parent.id();
                "Component mapped"
            );
            components.push(
                Component::new(shape.id(), shape.name(), component_type, parent)
                    .with_representations(representations),
            );
        }

        debug!(components_count = components.len(); "Components mapped");
        Ok(components)
    }
}
