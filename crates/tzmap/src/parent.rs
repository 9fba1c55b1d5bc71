//! Geometric parent resolution.
//!
//! Every shape's parent is the tightest boundary zone that contains its
//! footprint. Only boundary shapes can be parents. Boundaries can nest in
//! other boundaries, but only in strictly larger ones (ties broken by
//! arena order), so parent chains never loop.
//!
//! Resolution runs once per diagram and compares every pair of shapes.

use std::cmp::Ordering;

use log::{debug, trace};

use crate::diagram::{Diagram, DiagramShape, ShapeIndex, ShapeOrigin};

/// Assigns the parent of every shape in `diagram`.
pub fn resolve_parents(diagram: &mut Diagram) {
    let parents: Vec<Option<ShapeIndex>> = diagram
        .indexed_shapes()
        .map(|(index, _)| tightest_container(diagram, index))
        .collect();

    let mut parented = 0;
    for (shape, parent) in diagram.shapes.iter_mut().zip(parents) {
        if let Some(parent) = parent {
            trace!(shape_id = shape.id.as_str(), parent = parent.get(); "Parent resolved");
            parented += 1;
        }
        shape.parent = parent;
    }

    debug!(
        shapes_count = diagram.shapes.len(),
        parented_count = parented;
        "Parents resolved"
    );
}

/// Smallest-area boundary that contains the shape at `index`
fn tightest_container(diagram: &Diagram, index: ShapeIndex) -> Option<ShapeIndex> {
    let child = diagram.shape(index);
    diagram
        .indexed_shapes()
        .filter(|(candidate_index, candidate)| {
            can_contain(*candidate_index, candidate, index, child)
        })
        .min_by(|(_, a), (_, b)| a.area().total_cmp(&b.area()))
        .map(|(candidate_index, _)| candidate_index)
}

fn can_contain(
    container_index: ShapeIndex,
    container: &DiagramShape,
    child_index: ShapeIndex,
    child: &DiagramShape,
) -> bool {
    if container_index == child_index || container.origin != ShapeOrigin::Boundary {
        return false;
    }

    let Some(polygon) = container.polygon() else {
        return false;
    };
    if !polygon.contains_bounds(child.footprint) {
        return false;
    }

    match child.origin {
        ShapeOrigin::Simple => true,
        ShapeOrigin::Boundary => ranks_above(container_index, container, child_index, child),
    }
}

/// Strict order over boundaries: larger zones first, then earlier shapes
fn ranks_above(
    container_index: ShapeIndex,
    container: &DiagramShape,
    child_index: ShapeIndex,
    child: &DiagramShape,
) -> bool {
    match container.area().total_cmp(&child.area()) {
        Ordering::Greater => true,
        Ordering::Less => false,
        Ordering::Equal => container_index < child_index,
    }
}


#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;
    use tzmap_core::geometry::{Bounds, Point, Size};

    use super::*;
    use crate::diagram::DiagramBounds;

    fn nested_zones() -> impl Strategy<Value = (Bounds, Bounds, Point)> {
        // C contains B contains the point A sits on
        (
            10.0f64..40.0,
            10.0f64..40.0,
            2.0f64..8.0,
            2.0f64..8.0,
            0.2f64..0.8,
            0.2f64..0.8,
        )
            .prop_map(|(bx, by, bw, bh, fx, fy)| {
                let b = Bounds::new(Point::new(bx, by), Point::new(bx + bw, by + bh));
                let c = b.expand(5.0);
                let a = Point::new(bx + 1.0 + fx * (bw - 2.0).max(0.0), by + 1.0 + fy * (bh - 2.0).max(0.0));
                (b, c, a)
            })
    }

    proptest! {
        #[test]
        fn tightest_enclosing_zone_is_parent((b, c, a) in nested_zones(), c_first in any::<bool>()) {
            let unit = Size::new(1.0, 1.0);
            let b_shape = DiagramShape::new(
                "B", "B", "", ShapeOrigin::Boundary,
                Bounds::new_from_center(b.center(), unit),
                Some(b.to_polygon()),
            );
            let c_shape = DiagramShape::new(
                "C", "C", "", ShapeOrigin::Boundary,
                Bounds::new_from_center(c.center(), unit),
                Some(c.to_polygon()),
            );
            let a_shape = DiagramShape::new(
                "A", "A", "", ShapeOrigin::Simple,
                Bounds::new_from_center(a, Size::new(0.5, 0.5)),
                None,
            );

            let shapes = if c_first {
                vec![c_shape, a_shape, b_shape]
            } else {
                vec![b_shape, a_shape, c_shape]
            };
            let mut diagram = Diagram::new(
                shapes,
                Vec::new(),
                DiagramBounds::new(Point::new(0.0, 0.0), Point::new(60.0, 60.0)),
            );
            resolve_parents(&mut diagram);

            let a_index = diagram.find("A").unwrap();
            let b_index = diagram.find("B").unwrap();
            prop_assert_eq!(diagram.parent_of(a_index).map(DiagramShape::id), Some("B"));
            prop_assert_eq!(diagram.parent_of(b_index).map(DiagramShape::id), Some("C"));
            prop_assert_eq!(diagram.parent_of(diagram.find("C").unwrap()), None);
        }
    }
}
