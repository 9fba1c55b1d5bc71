use log::{debug, trace};
use serde_json::Value;

use tzmap_core::otm::TrustZone;
use tzmap_source::mapping::MappingSet;

use super::{ComponentLookup, RepresentationCalculator, emitted_parent};
use crate::{deterministic::deterministic_uuid, diagram::Diagram};

/// Label of the built-in fallback trust zone.
pub const PUBLIC_CLOUD_LABEL: &str = "Public Cloud";

/// OTM type of the built-in fallback trust zone.
pub const PUBLIC_CLOUD_TYPE: &str = "b61d6911-338d-46a8-9f39-8dcd24abfe91";

/// The trust zone that adopts components without an enclosing boundary.
///
/// Taken from the last mapping entry flagged `default`; with no such entry,
/// falls back to the built-in "Public Cloud" zone when `public_cloud_fallback`
/// is set. The id is derived from the label, so it is stable across runs.
pub fn default_trust_zone(mappings: &MappingSet, public_cloud_fallback: bool) -> Option<TrustZone> {
    let (label, zone_type) = match mappings.default_trust_zone() {
        Some(mapping) => (mapping.label.as_str(), mapping.otm_type()),
        None if public_cloud_fallback => (PUBLIC_CLOUD_LABEL, PUBLIC_CLOUD_TYPE),
        None => return None,
    };

    Some(
        TrustZone::new(deterministic_uuid(label), label, zone_type)
            .with_attribute("default", Value::Bool(true)),
    )
}

/// Maps boundary shapes whose name is a trust-zone label.
pub struct TrustZoneMapper<'a> {
    mappings: &'a MappingSet,
    calculator: &'a RepresentationCalculator,
}

impl<'a> TrustZoneMapper<'a> {
    pub fn new(mappings: &'a MappingSet, calculator: &'a RepresentationCalculator) -> Self {
        Self {
            mappings,
            calculator,
        }
    }

    /// Flags every trust-zone shape in `diagram` and returns the zones.
    pub fn map(&self, diagram: &mut Diagram) -> Vec<TrustZone> {
        let zone_mappings = self.mappings.trustzone_mappings();
        for shape in &mut diagram.shapes {
            shape.is_trust_zone = zone_mappings.contains_key(shape.name.as_str());
        }

        let lookup = ComponentLookup::new(self.mappings);
        let diagram = &*diagram;
        let zones: Vec<TrustZone> = diagram
            .indexed_shapes()
            .filter(|(_, shape)| shape.is_trust_zone())
            .filter_map(|(index, shape)| {
                let mapping = zone_mappings.get(shape.name())?;
                let name = if shape.name().is_empty() {
                    mapping.zone_type.as_str()
                } else {
                    shape.name()
                };
                let (parent_index, parent) = emitted_parent(diagram, index, lookup).unzip();
                let representations = self
                    .calculator
                    .element_representation(diagram, index, parent_index)
                    .into_iter()
                    .collect();

                trace!(shape_id = shape.id(), zone_type = mapping.otm_type(); "Trust zone mapped");
                Some(
                    TrustZone::new(shape.id(), name, mapping.otm_type())
                        .with_parent(parent)
                        .with_representations(representations),
                )
            })
            .collect();

        debug!(trust_zones_count = zones.len(); "Trust zones mapped");
        zones
    }
}

#[cfg(test)]
mod tests {
    use tzmap_core::{
        geometry::{Bounds, Point},
        otm::Parent,
    };

    use super::*;
    use crate::diagram::{DiagramBounds, DiagramShape, ShapeIndex, ShapeOrigin};

    const MAPPINGS: &str = r#"
trustzones:
  - label: Internet
    type: internet-type
    default: true
  - label: AWS VPC
    type: vpc
    id: vpc-id
  - label: Subnet
    type: subnet
components:
  - label: EC2
    type: ec2-instance
"#;

    fn boundary(id: &str, name: &str, x0: f64, x1: f64) -> DiagramShape {
        let bounds = Bounds::new(Point::new(x0, x0), Point::new(x1, x1));
        DiagramShape::new(id, name, "", ShapeOrigin::Boundary, bounds, Some(bounds.to_polygon()))
    }

    #[test]
    fn test_default_trust_zone_from_mapping() {
        let mappings = MappingSet::from_yaml(MAPPINGS).unwrap();
        let zone = default_trust_zone(&mappings, false).unwrap();

        assert_eq!(zone.id, deterministic_uuid("Internet"));
        assert_eq!(zone.name, "Internet");
        assert_eq!(zone.zone_type, "internet-type");
        assert_eq!(zone.attributes.get("default"), Some(&Value::Bool(true)));
    }

    #[test]
    fn test_public_cloud_fallback() {
        let mappings = MappingSet::from_yaml("trustzones: []\ncomponents: []\n").unwrap();
        assert_eq!(default_trust_zone(&mappings, false), None);

        let zone = default_trust_zone(&mappings, true).unwrap();
        assert_eq!(zone.name, PUBLIC_CLOUD_LABEL);
        assert_eq!(zone.zone_type, PUBLIC_CLOUD_TYPE);
    }

    #[test]
    fn test_zones_are_flagged_and_nested() {
        let mappings = MappingSet::from_yaml(MAPPINGS).unwrap();
        let mut shapes = vec![
            boundary("1", "AWS VPC", 0.0, 10.0),
            boundary("2", "Unknown", 1.0, 9.0),
            boundary("3", "Subnet", 2.0, 8.0),
        ];
        shapes[1].parent = Some(ShapeIndex::new(0));
        shapes[2].parent = Some(ShapeIndex::new(1));
        let mut diagram = Diagram::new(
            shapes,
            Vec::new(),
            DiagramBounds::new(Point::new(0.0, 0.0), Point::new(10.0, 10.0)),
        );
        let calculator = RepresentationCalculator::new("p", diagram.bounds());

        let zones = TrustZoneMapper::new(&mappings, &calculator).map(&mut diagram);

        assert_eq!(zones.len(), 2);
        assert_eq!(zones[0].zone_type, "vpc-id");
        assert_eq!(zones[0].parent, None);
        assert_eq!(zones[1].zone_type, "subnet");
        assert_eq!(zones[1].parent, Some(Parent::TrustZone("1".to_string())));
        assert_eq!(zones[1].representations.len(), 1);

        let flagged: Vec<bool> = diagram.shapes().iter().map(DiagramShape::is_trust_zone).collect();
        assert_eq!(flagged, vec![true, false, true]);
    }
}
