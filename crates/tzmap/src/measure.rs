//! Shape measurement: bounding boxes and diagram extents.

use tzmap_core::geometry::{Bounds, GeometryError, Point, Size};
use tzmap_source::shape::Shape;

use crate::diagram::DiagramBounds;

/// Padding added on each side of the diagram extent, in page units.
pub const DIAGRAM_BOUNDS_PADDING: f64 = 2.0;

/// Extent used when a page has no measurable shapes.
pub fn default_diagram_bounds() -> DiagramBounds {
    DiagramBounds::new(Point::new(0.0, 0.0), Point::new(10.0, 10.0))
}

/// Bounding box of a shape from its center and its (possibly inherited) size.
///
/// # Errors
///
/// Returns [`GeometryError`] if the center, width or height cannot be resolved.
pub fn bounding_box<S: Shape + ?Sized>(shape: &S) -> Result<Bounds, GeometryError> {
    let center = shape.center().ok_or_else(|| GeometryError::MissingCenter {
        shape_id: shape.id().to_string(),
    })?;
    let width = shape
        .width()
        .ok_or_else(|| missing_dimension(shape, "width"))?;
    let height = shape
        .height()
        .ok_or_else(|| missing_dimension(shape, "height"))?;

    Ok(Bounds::new_from_center(center, Size::new(width, height)))
}

fn missing_dimension<S: Shape + ?Sized>(shape: &S, dimension: &'static str) -> GeometryError {
    GeometryError::MissingDimension {
        shape_id: shape.id().to_string(),
        dimension,
    }
}

/// Extent of all `shapes`, padded by [`DIAGRAM_BOUNDS_PADDING`] on each side.
///
/// Returns `default` when `shapes` is empty.
///
/// # Errors
///
/// Returns [`GeometryError`] if any shape cannot be measured.
pub fn diagram_bounds<'a, S, I>(
    shapes: I,
    default: DiagramBounds,
) -> Result<DiagramBounds, GeometryError>
where
    S: Shape + ?Sized + 'a,
    I: IntoIterator<Item = &'a S>,
{
    let mut extent: Option<Bounds> = None;
    for shape in shapes {
        let bounds = bounding_box(shape)?;
        extent = Some(extent.map_or(bounds, |acc| acc.merge(&bounds)));
    }

    Ok(extent
        .map(|bounds| DiagramBounds::from(bounds.expand(DIAGRAM_BOUNDS_PADDING)))
        .unwrap_or(default))
}
