//! Diagram loading: turns raw page shapes into a classified [`Diagram`].
//!
//! Every shape falls in one of three classes:
//!
//! - **connector**: it has connection endpoints; becomes a [`DiagramEdge`]
//! - **boundary**: its class name contains the boundary marker; its polygon
//!   is the zone it cuts out of the page
//! - **simple**: it has display text; its polygon is its bounding rectangle
//!
//! Shapes in none of these classes (decorations, empty frames) are skipped.
//! Parent links are resolved once all shapes are built.

use log::{debug, info, trace};

use tzmap_core::geometry::GeometryError;
use tzmap_source::shape::{
    DOUBLE_ARROW_MARKER, Shape, is_arrowhead, normalize_label, normalize_unique_id,
};

use crate::{
    config::PipelineConfig,
    diagram::{Diagram, DiagramEdge, DiagramShape, ShapeOrigin},
    measure::{bounding_box, default_diagram_bounds, diagram_bounds},
    parent::resolve_parents,
    representation::Representer,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ShapeClass {
    Connector,
    Boundary,
    Simple,
}

/// Builds diagrams from page shapes.
#[derive(Debug, Clone, Copy)]
pub struct DiagramLoader<'a> {
    config: &'a PipelineConfig,
}

impl<'a> DiagramLoader<'a> {
    pub fn new(config: &'a PipelineConfig) -> Self {
        Self { config }
    }

    /// Classifies `shapes`, builds their polygons and edges, and resolves
    /// every shape's parent.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError`] if a boundary or simple shape cannot be
    /// measured.
    pub fn load<S: Shape>(&self, shapes: &[S]) -> Result<Diagram, GeometryError> {
        let classified: Vec<(&S, ShapeClass)> = shapes
            .iter()
            .filter_map(|shape| self.classify(shape).map(|class| (shape, class)))
            .collect();

        let bounds = diagram_bounds(
            classified
                .iter()
                .filter(|(_, class)| *class != ShapeClass::Connector)
                .map(|(shape, _)| *shape),
            default_diagram_bounds(),
        )?;
        let zone = Representer::Zone(bounds);

        let mut diagram_shapes = Vec::new();
        for (shape, class) in &classified {
            let (origin, representer) = match class {
                ShapeClass::Connector => continue,
                ShapeClass::Boundary => (ShapeOrigin::Boundary, zone),
                ShapeClass::Simple => (ShapeOrigin::Simple, Representer::Simple),
            };
            diagram_shapes.push(build_shape(*shape, origin, representer)?);
        }

        let edges: Vec<DiagramEdge> = classified
            .iter()
            .filter(|(_, class)| *class == ShapeClass::Connector)
            .filter_map(|(shape, _)| build_edge(*shape, &diagram_shapes))
            .collect();

        info!(
            shapes_count = diagram_shapes.len(),
            edges_count = edges.len();
            "Diagram loaded"
        );

        let mut diagram = Diagram::new(diagram_shapes, edges, bounds);
        resolve_parents(&mut diagram);
        Ok(diagram)
    }

    fn classify<S: Shape>(&self, shape: &S) -> Option<ShapeClass> {
        if !shape.connection_endpoints().is_empty() {
            return Some(ShapeClass::Connector);
        }
        if shape
            .shape_class_name()
            .is_some_and(|name| name.contains(self.config.boundary_marker()))
        {
            return Some(ShapeClass::Boundary);
        }
        if !shape.text().is_empty() {
            return Some(ShapeClass::Simple);
        }
        trace!(shape_id = shape.id(); "Shape skipped");
        None
    }
}

fn build_shape<S: Shape>(
    shape: &S,
    origin: ShapeOrigin,
    representer: Representer,
) -> Result<DiagramShape, GeometryError> {
    let footprint = bounding_box(shape)?;
    let polygon = representer.build_representation(shape)?;

    Ok(DiagramShape::new(
        shape.id(),
        normalize_label(&shape.text()),
        normalize_label(&shape.master_text()),
        origin,
        footprint,
        Some(polygon),
    )
    .with_unique_id(normalize_unique_id(&shape.master_unique_id())))
}

/// Builds the edge drawn by `connector`, or `None` if it does not join two
/// distinct diagram shapes.
fn build_edge<S: Shape>(connector: &S, shapes: &[DiagramShape]) -> Option<DiagramEdge> {
    let [first, second] = connector.connection_endpoints() else {
        debug!(shape_id = connector.id(); "Connector skipped: needs exactly two endpoints");
        return None;
    };
    if first.shape_id() == second.shape_id() {
        debug!(shape_id = connector.id(); "Connector skipped: both ends on one shape");
        return None;
    }
    let known = |id: &str| shapes.iter().any(|shape| shape.id() == id);
    if !known(first.shape_id()) || !known(second.shape_id()) {
        debug!(shape_id = connector.id(); "Connector skipped: endpoint is not a diagram shape");
        return None;
    }

    let begin = connector.begin_arrow();
    let end = connector.end_arrow();
    let begin_head = is_arrowhead(begin.as_deref());
    let end_head = is_arrowhead(end.as_deref());

    let bidirectional = connector
        .master_page_name()
        .is_some_and(|name| name.contains(DOUBLE_ARROW_MARKER))
        || (begin_head && end_head && begin == end);

    // The origin end is the source unless the arrowhead is drawn there
    let forward = (!begin_head && first.is_origin()) || (begin_head && second.is_origin());
    let (from, to) = if forward {
        (first, second)
    } else {
        (second, first)
    };

    let name = normalize_label(&connector.text());
    trace!(
        edge_id = connector.id(),
        from = from.shape_id(),
        to = to.shape_id(),
        bidirectional;
        "Edge created"
    );

    Some(
        DiagramEdge::new(connector.id(), from.shape_id(), to.shape_id())
            .with_bidirectional(bidirectional)
            .with_name((!name.is_empty()).then_some(name)),
    )
}

#[cfg(test)]
mod tests {
    use tzmap_source::page::ShapeRecord;

    use super::*;

    fn record(json: &str) -> ShapeRecord {
        serde_json::from_str(json).expect("valid shape record")
    }

    fn component(id: &str, text: &str, x: f64, y: f64) -> ShapeRecord {
        record(&format!(
            r#"{{"id": "{id}", "text": "{text}", "center": {{"x": {x}, "y": {y}}}, "cells": {{"Width": 1.0, "Height": 1.0}}}}"#
        ))
    }

    fn connector(id: &str, connects: &str, extra: &str) -> ShapeRecord {
        record(&format!(r#"{{"id": "{id}", "connects": {connects}{extra}}}"#))
    }

    fn load(shapes: &[ShapeRecord]) -> Diagram {
        let config = PipelineConfig::default();
        DiagramLoader::new(&config).load(shapes).unwrap()
    }

    #[test]
    fn test_classification() {
        let shapes = [
            component("1", "EC2", 2.0, 2.0),
            record(
                r#"{"id": "2", "shape_name": "Curved panel.12", "center": {"x": 5.0, "y": 5.0}, "cells": {"Width": 4.0, "Height": 4.0}}"#,
            ),
            record(r#"{"id": "3", "center": {"x": 1.0, "y": 1.0}, "cells": {"Width": 1.0, "Height": 1.0}}"#),
        ];
        let diagram = load(&shapes);

        assert_eq!(diagram.shapes().len(), 2);
        assert_eq!(diagram.shape(diagram.find("1").unwrap()).origin(), ShapeOrigin::Simple);
        assert_eq!(diagram.shape(diagram.find("2").unwrap()).origin(), ShapeOrigin::Boundary);
        assert_eq!(diagram.find("3"), None);
    }

    #[test]
    fn test_labels_are_normalized() {
        let shapes = [record(
            r#"{"id": "1", "text": " Amazon\nEC2 ", "center": {"x": 0.0, "y": 0.0},
                "cells": {"Width": 1.0, "Height": 1.0},
                "master": {"unique_id": "{ABC}", "text": "EC2   Instance"}}"#,
        )];
        let diagram = load(&shapes);
        let shape = &diagram.shapes()[0];

        assert_eq!(shape.name(), "Amazon EC2");
        assert_eq!(shape.type_label(), "EC2 Instance");
        assert_eq!(shape.unique_id(), "ABC");
    }

    #[test]
    fn test_bounds_exclude_connectors() {
        let shapes = [
            component("1", "A", 1.0, 1.0),
            component("2", "B", 3.0, 1.0),
            connector(
                "3",
                r#"[{"shape_id": "1", "from_rel": "BeginX"}, {"shape_id": "2", "from_rel": "EndX"}]"#,
                r#", "center": {"x": 100.0, "y": 100.0}"#,
            ),
        ];
        let diagram = load(&shapes);
        assert_eq!(diagram.bounds().x_ceiling(), 5.5);
        assert_eq!(diagram.edges().len(), 1);
    }

    #[test]
    fn test_edge_follows_origin() {
        let shapes = [
            component("1", "A", 1.0, 1.0),
            component("2", "B", 3.0, 1.0),
            connector(
                "3",
                r#"[{"shape_id": "2", "from_rel": "EndX"}, {"shape_id": "1", "from_rel": "BeginX"}]"#,
                r#", "cells": {"EndArrow": 13}"#,
            ),
        ];
        let diagram = load(&shapes);
        let edge = &diagram.edges()[0];

        assert_eq!(edge.from_id(), "1");
        assert_eq!(edge.to_id(), "2");
        assert!(!edge.is_bidirectional());
        assert_eq!(edge.name(), None);
    }

    #[test]
    fn test_arrowhead_at_origin_reverses_edge() {
        let shapes = [
            component("1", "A", 1.0, 1.0),
            component("2", "B", 3.0, 1.0),
            connector(
                "3",
                r#"[{"shape_id": "1", "from_rel": "BeginX"}, {"shape_id": "2", "from_rel": "EndX"}]"#,
                r#", "cells": {"BeginArrow": 4, "EndArrow": "0"}"#,
            ),
        ];
        let diagram = load(&shapes);
        let edge = &diagram.edges()[0];

        assert_eq!(edge.from_id(), "2");
        assert_eq!(edge.to_id(), "1");
    }

    #[test]
    fn test_bidirectional_edges() {
        let shapes = [
            component("1", "A", 1.0, 1.0),
            component("2", "B", 3.0, 1.0),
            connector(
                "3",
                r#"[{"shape_id": "1", "from_rel": "BeginX"}, {"shape_id": "2", "from_rel": "EndX"}]"#,
                r#", "master": {"name": "Double Arrow Connector"}"#,
            ),
            connector(
                "4",
                r#"[{"shape_id": "1", "from_rel": "BeginX"}, {"shape_id": "2", "from_rel": "EndX"}]"#,
                r#", "cells": {"BeginArrow": 5, "EndArrow": 5}, "text": "sync""#,
            ),
            connector(
                "5",
                r#"[{"shape_id": "1", "from_rel": "BeginX"}, {"shape_id": "2", "from_rel": "EndX"}]"#,
                r#", "cells": {"BeginArrow": 5, "EndArrow": 4}"#,
            ),
        ];
        let diagram = load(&shapes);
        let bidirectional: Vec<_> = diagram
            .edges()
            .iter()
            .map(DiagramEdge::is_bidirectional)
            .collect();

        assert_eq!(bidirectional, vec![true, true, false]);
        assert_eq!(diagram.edges()[1].name(), Some("sync"));
    }

    #[test]
    fn test_invalid_connectors_are_dropped() {
        let shapes = [
            component("1", "A", 1.0, 1.0),
            component("2", "B", 3.0, 1.0),
            connector("3", r#"[{"shape_id": "1", "from_rel": "BeginX"}]"#, ""),
            connector(
                "4",
                r#"[{"shape_id": "1", "from_rel": "BeginX"}, {"shape_id": "1", "from_rel": "EndX"}]"#,
                "",
            ),
            connector(
                "5",
                r#"[{"shape_id": "1", "from_rel": "BeginX"}, {"shape_id": "99", "from_rel": "EndX"}]"#,
                "",
            ),
        ];
        let diagram = load(&shapes);
        assert!(diagram.edges().is_empty());
    }

    #[test]
    fn test_unmeasurable_shape_is_error() {
        let shapes = [record(r#"{"id": "1", "text": "A", "center": {"x": 0.0, "y": 0.0}}"#)];
        let config = PipelineConfig::default();
        assert!(matches!(
            DiagramLoader::new(&config).load(&shapes),
            Err(GeometryError::MissingDimension { .. })
        ));
    }

    #[test]
    fn test_custom_boundary_marker() {
        let config = PipelineConfig::default().with_boundary_marker("Zone");
        let shapes = [record(
            r#"{"id": "1", "shape_name": "Zone", "center": {"x": 5.0, "y": 5.0}, "cells": {"Width": 2.0, "Height": 2.0}}"#,
        )];
        let diagram = DiagramLoader::new(&config).load(&shapes).unwrap();
        assert_eq!(diagram.shapes()[0].origin(), ShapeOrigin::Boundary);
    }
}
