//! Geometric primitives for diagram normalization.
//!
//! This module provides the geometric types used by tzmap to reason about
//! where shapes sit on a diagram page and which shapes visually contain
//! which other shapes.
//!
//! # Overview
//!
//! - [`Point`] - A 2D coordinate in page space
//! - [`Size`] - Width and height dimensions
//! - [`Bounds`] - An axis-aligned box defined by minimum and maximum coordinates
//! - [`Polygon`] - A closed convex footprint used for containment tests
//! - [`normalize_angle`] - Maps any angle into `[0, 2π)`
//!
//! # Coordinate System
//!
//! Page coordinates follow the source diagram convention:
//!
//! ```text
//!    +Y
//!     ▲
//!     │
//!     │
//!     │
//!   (0,0) ────────► +X
//! ```
//!
//! - **Origin**: Bottom-left corner of the page
//! - **X-axis**: Increases rightward
//! - **Y-axis**: Increases upward
//!
//! Rotation angles are in radians, counterclockwise.

use std::f64::consts::TAU;

use thiserror::Error;

/// Tolerance used by containment tests so that shapes sharing an edge with
/// their container still count as contained.
pub const CONTAINMENT_EPSILON: f64 = 1e-9;

/// Errors raised when a shape's geometry cannot be resolved.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("shape `{shape_id}` has no {dimension} of its own or inherited from its master")]
    MissingDimension {
        shape_id: String,
        dimension: &'static str,
    },

    #[error("shape `{shape_id}` has no center position")]
    MissingCenter { shape_id: String },

    #[error("shape `{shape_id}` has a non-finite rotation angle")]
    InvalidAngle { shape_id: String },
}

/// Maps any finite angle in radians to the range `[0, 2π)`.
///
/// # Examples
///
/// ```
/// # use std::f64::consts::PI;
/// # use tzmap_core::geometry::normalize_angle;
/// assert_eq!(normalize_angle(0.0), 0.0);
/// assert!((normalize_angle(-PI / 2.0) - 3.0 * PI / 2.0).abs() < 1e-12);
/// assert!((normalize_angle(5.0 * PI) - PI).abs() < 1e-12);
/// ```
pub fn normalize_angle(angle: f64) -> f64 {
    let normalized = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if normalized >= TAU { 0.0 } else { normalized }
}

/// A 2D point representing a position in page coordinate space.
///
/// # Examples
///
/// ```
/// # use tzmap_core::geometry::Point;
/// let p1 = Point::new(10.0, 20.0);
/// let p2 = Point::new(5.0, 5.0);
///
/// let diff = p1.sub_point(p2);
/// assert_eq!(diff.x(), 5.0);
/// assert_eq!(diff.y(), 15.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    x: f64,
    y: f64,
}

impl Point {
    /// Creates a new point with the specified coordinates
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns the x-coordinate of the point
    pub fn x(self) -> f64 {
        self.x
    }

    /// Returns the y-coordinate of the point
    pub fn y(self) -> f64 {
        self.y
    }

    /// Adds another point to this point, returning a new point
    pub fn add_point(self, other: Point) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }

    /// Subtracts another point from this point, returning a new point
    pub fn sub_point(self, other: Point) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }

    /// Multiplies both coordinates by the given factor
    pub fn scale(self, factor: f64) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
        }
    }

    /// Dot product of the two points seen as vectors
    pub fn dot(self, other: Point) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// Z component of the cross product of the two points seen as vectors
    pub fn cross(self, other: Point) -> f64 {
        self.x * other.y - self.y * other.x
    }

    /// Unit vector pointing at `angle` radians from the positive x-axis
    pub fn from_angle(angle: f64) -> Self {
        Self {
            x: angle.cos(),
            y: angle.sin(),
        }
    }

    /// Converts a point and size into a bounds rectangle
    ///
    /// The point is treated as the center of the bounds, and the size
    /// is distributed equally in all directions around that center.
    pub fn to_bounds(self, size: Size) -> Bounds {
        Bounds::new_from_center(self, size)
    }
}

/// Represents the dimensions of an element with width and height
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    width: f64,
    height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Returns the width dimension of this size
    pub fn width(self) -> f64 {
        self.width
    }

    /// Returns the height dimension of this size
    pub fn height(self) -> f64 {
        self.height
    }

    /// Multiplies both dimension by the given factor
    pub fn scale(self, factor: f64) -> Self {
        Self {
            width: self.width * factor,
            height: self.height * factor,
        }
    }
}

/// Represents an axis-aligned box with minimum and maximum coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    min_x: f64,
    min_y: f64,
    max_x: f64,
    max_y: f64,
}

impl Bounds {
    /// Creates bounds from explicit floor and ceiling coordinates
    pub fn new(min: Point, max: Point) -> Self {
        Self {
            min_x: min.x,
            min_y: min.y,
            max_x: max.x,
            max_y: max.y,
        }
    }

    /// Creates a new bounds from a center point and a size
    pub fn new_from_center(center: Point, size: Size) -> Self {
        let half_width = size.width / 2.0;
        let half_height = size.height / 2.0;
        Self {
            min_x: center.x - half_width,
            min_y: center.y - half_height,
            max_x: center.x + half_width,
            max_y: center.y + half_height,
        }
    }

    /// Returns the minimum x-coordinate of the bounds
    pub fn min_x(self) -> f64 {
        self.min_x
    }

    /// Returns the minimum y-coordinate of the bounds
    pub fn min_y(self) -> f64 {
        self.min_y
    }

    /// Returns the maximum x-coordinate of the bounds
    pub fn max_x(self) -> f64 {
        self.max_x
    }

    /// Returns the maximum y-coordinate of the bounds
    pub fn max_y(self) -> f64 {
        self.max_y
    }

    /// Returns the floor corner `(min_x, min_y)`
    pub fn min_point(self) -> Point {
        Point::new(self.min_x, self.min_y)
    }

    /// Returns the ceiling corner `(max_x, max_y)`
    pub fn max_point(self) -> Point {
        Point::new(self.max_x, self.max_y)
    }

    /// Returns the center point of the bounds
    pub fn center(self) -> Point {
        Point::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// Returns the width of the bounds
    pub fn width(self) -> f64 {
        self.max_x - self.min_x
    }

    /// Returns the height of the bounds
    pub fn height(self) -> f64 {
        self.max_y - self.min_y
    }

    /// Converts bounds to a Size object
    pub fn to_size(self) -> Size {
        Size::new(self.width(), self.height())
    }

    /// Merges two bounds to create a larger bounds that contains both.
    ///
    /// # Examples
    ///
    /// ```
    /// # use tzmap_core::geometry::{Bounds, Point, Size};
    /// let a = Bounds::new_from_center(Point::new(1.0, 1.0), Size::new(2.0, 2.0));
    /// let b = Bounds::new_from_center(Point::new(5.0, 3.0), Size::new(2.0, 2.0));
    ///
    /// let merged = a.merge(&b);
    /// assert_eq!(merged.min_x(), 0.0);
    /// assert_eq!(merged.max_x(), 6.0);
    /// assert_eq!(merged.max_y(), 4.0);
    /// ```
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// Grows the bounds by `padding` on each of the four sides
    pub fn expand(&self, padding: f64) -> Self {
        Self {
            min_x: self.min_x - padding,
            min_y: self.min_y - padding,
            max_x: self.max_x + padding,
            max_y: self.max_y + padding,
        }
    }

    /// Returns the four corners counterclockwise, starting at the floor corner
    pub fn corners(self) -> [Point; 4] {
        [
            Point::new(self.min_x, self.min_y),
            Point::new(self.max_x, self.min_y),
            Point::new(self.max_x, self.max_y),
            Point::new(self.min_x, self.max_y),
        ]
    }

    /// Returns the axis-aligned rectangle covering these bounds
    pub fn to_polygon(self) -> Polygon {
        Polygon::new(self.corners().to_vec())
    }
}

/// A closed polygon given by its vertices in order.
///
/// Polygons built by tzmap are always convex: rectangles, or rectangles
/// cut by a single straight line. Containment tests rely on that.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Polygon {
    points: Vec<Point>,
}

impl Polygon {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    /// Returns the polygon vertices
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Returns true when the polygon has fewer than three vertices
    pub fn is_degenerate(&self) -> bool {
        self.points.len() < 3
    }

    /// Unsigned area computed with the shoelace formula.
    ///
    /// # Examples
    ///
    /// ```
    /// # use tzmap_core::geometry::{Bounds, Point, Size};
    /// let square = Bounds::new_from_center(Point::new(0.0, 0.0), Size::new(2.0, 3.0));
    /// assert_eq!(square.to_polygon().area(), 6.0);
    /// ```
    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    fn signed_area(&self) -> f64 {
        let n = self.points.len();
        if n < 3 {
            return 0.0;
        }
        let twice: f64 = (0..n)
            .map(|i| self.points[i].cross(self.points[(i + 1) % n]))
            .sum();
        twice / 2.0
    }

    /// Smallest axis-aligned bounds containing every vertex
    pub fn bounds(&self) -> Bounds {
        let mut iter = self.points.iter();
        let Some(first) = iter.next() else {
            return Bounds::default();
        };
        iter.fold(Bounds::new(*first, *first), |acc, p| {
            acc.merge(&Bounds::new(*p, *p))
        })
    }

    /// Tests whether `point` lies inside or on the border of this convex polygon
    pub fn contains_point(&self, point: Point) -> bool {
        if self.is_degenerate() {
            return false;
        }
        let orientation = self.signed_area().signum();
        let n = self.points.len();
        (0..n).all(|i| {
            let a = self.points[i];
            let b = self.points[(i + 1) % n];
            let side = b.sub_point(a).cross(point.sub_point(a)) * orientation;
            side >= -CONTAINMENT_EPSILON
        })
    }

    /// Tests whether every corner of `bounds` lies within this polygon
    pub fn contains_bounds(&self, bounds: Bounds) -> bool {
        bounds.corners().into_iter().all(|c| self.contains_point(c))
    }

    /// Clips this polygon against the half-plane `{p | (p - origin)·normal >= 0}`.
    ///
    /// One pass of Sutherland–Hodgman; vertex order is preserved.
    pub fn clip_half_plane(&self, origin: Point, normal: Point) -> Polygon {
        let distance = |p: Point| p.sub_point(origin).dot(normal);
        let n = self.points.len();
        let mut clipped = Vec::with_capacity(n + 1);

        for i in 0..n {
            let current = self.points[i];
            let next = self.points[(i + 1) % n];
            let d_current = distance(current);
            let d_next = distance(next);

            if d_current >= 0.0 {
                clipped.push(current);
            }
            if (d_current >= 0.0) != (d_next >= 0.0) {
                let t = d_current / (d_current - d_next);
                clipped.push(current.add_point(next.sub_point(current).scale(t)));
            }
        }

        Polygon::new(clipped)
    }
}


#[cfg(test)]
mod proptest_tests {
    use float_cmp::approx_eq;
    use proptest::prelude::*;

    use super::*;

    fn bounds_strategy() -> impl Strategy<Value = Bounds> {
        (
            -1000.0f64..1000.0,
            -1000.0f64..1000.0,
            1.0f64..500.0,
            1.0f64..500.0,
        )
            .prop_map(|(x, y, w, h)| Bounds::new_from_center(Point::new(x, y), Size::new(w, h)))
    }

    fn check_normalized_angle_in_range(angle: f64) -> Result<(), TestCaseError> {
        let normalized = normalize_angle(angle);
        prop_assert!((0.0..TAU).contains(&normalized));
        let turns = (angle - normalized) / TAU;
        prop_assert!(approx_eq!(f64, turns, turns.round(), epsilon = 1e-6));
        Ok(())
    }

    /// Any half-plane clip of a polygon is contained in the polygon.
    fn check_clip_shrinks(bounds: Bounds, angle: f64) -> Result<(), TestCaseError> {
        let polygon = bounds.to_polygon();
        let clipped = polygon.clip_half_plane(bounds.center(), Point::from_angle(angle));

        prop_assert!(clipped.area() <= polygon.area() + 1e-6);
        for point in clipped.points() {
            prop_assert!(polygon.contains_point(*point));
        }
        Ok(())
    }

    proptest! {
        #[test]
        fn normalized_angle_in_range(angle in -100.0f64..100.0) {
            check_normalized_angle_in_range(angle)?;
        }

        #[test]
        fn clip_shrinks(bounds in bounds_strategy(), angle in 0.0f64..TAU) {
            check_clip_shrinks(bounds, angle)?;
        }

        #[test]
        fn bounds_merge_contains_both(b1 in bounds_strategy(), b2 in bounds_strategy()) {
            let merged = b1.merge(&b2).to_polygon();
            prop_assert!(merged.contains_bounds(b1));
            prop_assert!(merged.contains_bounds(b2));
        }
    }
}
