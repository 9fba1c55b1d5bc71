//! Shape representers.
//!
//! A representer turns a source shape into the polygon it claims on the
//! page. Plain shapes claim their bounding rectangle; boundary panels claim
//! the zone they cut out of the page (see [`zone`]).

mod zone;

pub use zone::{AXIS_ALIGNED_TOLERANCE, slope_angle};

use tzmap_core::geometry::{GeometryError, Polygon, normalize_angle};
use tzmap_source::shape::Shape;

use crate::{diagram::DiagramBounds, measure::bounding_box};

/// Polygon builder selected when a shape is classified.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Representer {
    /// Axis-aligned rectangle from the shape's bounding box
    Simple,
    /// Angle-dependent zone clipped to the diagram bounds
    Zone(DiagramBounds),
}

impl Representer {
    /// Builds the polygon `shape` occupies.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError`] if the shape's size, center or rotation
    /// cannot be resolved.
    pub fn build_representation<S: Shape + ?Sized>(
        &self,
        shape: &S,
    ) -> Result<Polygon, GeometryError> {
        match self {
            Self::Simple => Ok(bounding_box(shape)?.to_polygon()),
            Self::Zone(bounds) => {
                let rotation = shape.rotation_angle();
                if !rotation.is_finite() {
                    return Err(GeometryError::InvalidAngle {
                        shape_id: shape.id().to_string(),
                    });
                }
                let center = shape.center().ok_or_else(|| GeometryError::MissingCenter {
                    shape_id: shape.id().to_string(),
                })?;

                zone::represent_zone(normalize_angle(rotation), center, *bounds).ok_or_else(|| {
                    GeometryError::InvalidAngle {
                        shape_id: shape.id().to_string(),
                    }
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;
    use tzmap_core::geometry::Point;
    use tzmap_source::page::ShapeRecord;

    use super::*;

    fn record(json: &str) -> ShapeRecord {
        serde_json::from_str(json).expect("valid shape record")
    }

    #[test]
    fn test_simple_representer_is_bounding_rectangle() {
        let shape = record(r#"{"id": "1", "center": {"x": 2.0, "y": 2.0}, "cells": {"Width": 2.0, "Height": 1.0}}"#);
        let polygon = Representer::Simple.build_representation(&shape).unwrap();

        assert_eq!(polygon.points().len(), 4);
        assert_approx_eq!(f64, polygon.area(), 2.0);
        assert!(polygon.contains_point(Point::new(2.9, 2.4)));
    }

    #[test]
    fn test_zone_representer_normalizes_negative_angles() {
        let bounds = DiagramBounds::new(Point::new(0.0, 0.0), Point::new(10.0, 10.0));
        // -π/2 is 3π/2: the cut keeps the x-floor/y-ceiling corner
        let shape = record(
            r#"{"id": "1", "center": {"x": 5.0, "y": 5.0}, "cells": {"Angle": -1.5707963267948966}}"#,
        );
        let polygon = Representer::Zone(bounds).build_representation(&shape).unwrap();

        assert!(polygon.contains_point(Point::new(1.0, 9.0)));
        assert!(!polygon.contains_point(Point::new(9.0, 1.0)));
    }

    #[test]
    fn test_zone_representer_requires_center() {
        let bounds = DiagramBounds::new(Point::new(0.0, 0.0), Point::new(10.0, 10.0));
        let shape = record(r#"{"id": "1"}"#);
        assert!(matches!(
            Representer::Zone(bounds).build_representation(&shape),
            Err(GeometryError::MissingCenter { .. })
        ));
    }
}
