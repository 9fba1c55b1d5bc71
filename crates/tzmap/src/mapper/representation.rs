//! Diagram representations of the document and its elements.
//!
//! Page coordinates are inches with y growing upwards; representations use
//! hundredths of an inch with y growing downwards from the top-left corner
//! of the diagram bounds.

use tzmap_core::{
    geometry::Bounds,
    otm::{
        ElementRepresentation, Representation, RepresentationKind, RepresentationPosition,
        RepresentationSize,
    },
};

use crate::diagram::{Diagram, DiagramBounds, ShapeIndex};

/// Representation units per page unit.
pub const REPRESENTATION_SCALE: f64 = 100.0;

fn scale(value: f64) -> f64 {
    (value * REPRESENTATION_SCALE).round()
}

fn size_of(bounds: Bounds) -> RepresentationSize {
    RepresentationSize {
        width: scale(bounds.width()),
        height: scale(bounds.height()),
    }
}

/// Computes representations anchored in one diagram.
#[derive(Debug, Clone)]
pub struct RepresentationCalculator {
    representation_id: String,
    bounds: DiagramBounds,
}

impl RepresentationCalculator {
    pub fn new(project_id: &str, bounds: DiagramBounds) -> Self {
        Self {
            representation_id: format!("{project_id}-diagram"),
            bounds,
        }
    }

    /// Id of the top-level diagram representation
    pub fn representation_id(&self) -> &str {
        &self.representation_id
    }

    /// The top-level diagram representation for `project_id`.
    pub fn diagram_representation(&self, project_id: &str) -> Representation {
        Representation {
            id: self.representation_id.clone(),
            name: format!("{project_id} Diagram Representation"),
            kind: RepresentationKind::Diagram,
            size: Some(size_of(self.bounds.as_bounds())),
        }
    }

    /// Top-left corner of `bounds`, relative to the diagram's top-left corner
    fn absolute_position(&self, bounds: Bounds) -> RepresentationPosition {
        RepresentationPosition {
            x: scale(bounds.min_x() - self.bounds.x_floor()),
            y: scale(self.bounds.y_ceiling() - bounds.max_y()),
        }
    }

    /// Representation of the shape at `index`, positioned relative to
    /// `parent` when given. Returns `None` for shapes without a polygon.
    pub fn element_representation(
        &self,
        diagram: &Diagram,
        index: ShapeIndex,
        parent: Option<ShapeIndex>,
    ) -> Option<ElementRepresentation> {
        let shape = diagram.shape(index);
        let bounds = shape.polygon()?.bounds();
        let mut position = self.absolute_position(bounds);

        if let Some(parent_bounds) = parent
            .and_then(|p| diagram.shape(p).polygon())
            .map(|polygon| polygon.bounds())
        {
            let origin = self.absolute_position(parent_bounds);
            position.x -= origin.x;
            position.y -= origin.y;
        }

        Some(ElementRepresentation {
            id: format!("{}-representation", shape.id()),
            name: format!("{} Representation", shape.name()),
            representation: self.representation_id.clone(),
            position,
            size: size_of(bounds),
        })
    }
}
