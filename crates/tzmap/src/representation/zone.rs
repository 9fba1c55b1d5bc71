//! Zones cut out of the page by boundary panels.
//!
//! A boundary panel is drawn as a panel with one corner cut at 45°. The cut
//! line passes through the shape's center; the zone it encloses is the part
//! of the page on the inner side of that line, clipped to the diagram
//! bounds.
//!
//! The rotation angle decides both the slope of the cut and which side is
//! inside. Angles where the cut is axis-aligned select one of four regular
//! zones (a plain rectangle); every other angle falls in one of four
//! irregular zones (diagonal cut, anchored at one page corner).
//!
//! ```text
//!   angle            cut        inner side
//!   π/4              ─          below     (regular south)
//!   3π/4             │          right     (regular east)
//!   5π/4             ─          above     (regular north)
//!   7π/4             │          left      (regular west)
//!   (7π/4, π/4)      ╲          floor corner        (irregular south-west)
//!   (π/4, 3π/4)      ╱          x-ceiling/y-floor   (irregular south-east)
//!   (3π/4, 5π/4)     ╲          ceiling corner      (irregular north-east)
//!   (5π/4, 7π/4)     ╱          x-floor/y-ceiling   (irregular north-west)
//! ```

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI, TAU};

use log::trace;

use tzmap_core::geometry::{Point, Polygon};

use crate::diagram::DiagramBounds;

/// Angular tolerance within which a cut counts as axis-aligned.
pub const AXIS_ALIGNED_TOLERANCE: f64 = 1e-6;

/// Angle of the cut line for a panel rotated by `angle`, in `[0, π]`.
///
/// # Examples
///
/// ```
/// # use std::f64::consts::{FRAC_PI_4, PI};
/// # use tzmap::representation::slope_angle;
/// assert!((slope_angle(0.0) - 3.0 * FRAC_PI_4).abs() < 1e-12);
/// assert!((slope_angle(FRAC_PI_4)).abs() < 1e-12);
/// assert!((slope_angle(PI) - 3.0 * FRAC_PI_4).abs() < 1e-12);
/// ```
pub fn slope_angle(angle: f64) -> f64 {
    let mut slope = angle - FRAC_PI_4;
    if slope < 0.0 {
        slope += TAU;
    }
    if slope > PI {
        slope -= PI;
    }
    slope
}

/// A construction rule: which angles it applies to and how it builds the zone.
pub(crate) struct ZoneRule {
    pub(crate) name: &'static str,
    pub(crate) matches: fn(f64) -> bool,
    pub(crate) build: fn(f64, Point, DiagramBounds) -> Polygon,
}

/// Ordered rule table. Regular zones come first; for every angle in
/// `[0, 2π)` exactly one rule matches.
pub(crate) const ZONE_RULES: [ZoneRule; 8] = [
    ZoneRule {
        name: "regular-south",
        matches: |angle| is_axis_aligned(angle, FRAC_PI_4),
        build: regular_south,
    },
    ZoneRule {
        name: "regular-east",
        matches: |angle| is_axis_aligned(angle, 3.0 * FRAC_PI_4),
        build: regular_east,
    },
    ZoneRule {
        name: "regular-north",
        matches: |angle| is_axis_aligned(angle, 5.0 * FRAC_PI_4),
        build: regular_north,
    },
    ZoneRule {
        name: "regular-west",
        matches: |angle| is_axis_aligned(angle, 7.0 * FRAC_PI_4),
        build: regular_west,
    },
    ZoneRule {
        name: "irregular-south-west",
        matches: |angle| in_diagonal_band(angle, 7.0 * FRAC_PI_4),
        build: |angle, center, bounds| {
            cut_toward_corner(angle, center, bounds, bounds.as_bounds().min_point())
        },
    },
    ZoneRule {
        name: "irregular-south-east",
        matches: |angle| in_diagonal_band(angle, FRAC_PI_4),
        build: |angle, center, bounds| {
            let corner = Point::new(bounds.x_ceiling(), bounds.y_floor());
            cut_toward_corner(angle, center, bounds, corner)
        },
    },
    ZoneRule {
        name: "irregular-north-east",
        matches: |angle| in_diagonal_band(angle, 3.0 * FRAC_PI_4),
        build: |angle, center, bounds| {
            cut_toward_corner(angle, center, bounds, bounds.as_bounds().max_point())
        },
    },
    ZoneRule {
        name: "irregular-north-west",
        matches: |angle| in_diagonal_band(angle, 5.0 * FRAC_PI_4),
        build: |angle, center, bounds| {
            let corner = Point::new(bounds.x_floor(), bounds.y_ceiling());
            cut_toward_corner(angle, center, bounds, corner)
        },
    },
];

/// True if `angle` is within tolerance of `target` on the circle
fn is_axis_aligned(angle: f64, target: f64) -> bool {
    let distance = (angle - target).rem_euclid(TAU);
    distance <= AXIS_ALIGNED_TOLERANCE || TAU - distance <= AXIS_ALIGNED_TOLERANCE
}

/// True if `angle` lies strictly inside the quarter turn starting at `start`,
/// away from both axis-aligned ends
fn in_diagonal_band(angle: f64, start: f64) -> bool {
    let offset = (angle - start).rem_euclid(TAU);
    offset > AXIS_ALIGNED_TOLERANCE && offset < FRAC_PI_2 - AXIS_ALIGNED_TOLERANCE
}

fn rectangle(x0: f64, y0: f64, x1: f64, y1: f64) -> Polygon {
    Polygon::new(vec![
        Point::new(x0, y0),
        Point::new(x1, y0),
        Point::new(x1, y1),
        Point::new(x0, y1),
    ])
}

fn regular_south(_angle: f64, center: Point, bounds: DiagramBounds) -> Polygon {
    rectangle(bounds.x_floor(), bounds.y_floor(), bounds.x_ceiling(), center.y())
}

fn regular_east(_angle: f64, center: Point, bounds: DiagramBounds) -> Polygon {
    rectangle(center.x(), bounds.y_floor(), bounds.x_ceiling(), bounds.y_ceiling())
}

fn regular_north(_angle: f64, center: Point, bounds: DiagramBounds) -> Polygon {
    rectangle(bounds.x_floor(), center.y(), bounds.x_ceiling(), bounds.y_ceiling())
}

fn regular_west(_angle: f64, center: Point, bounds: DiagramBounds) -> Polygon {
    rectangle(bounds.x_floor(), bounds.y_floor(), center.x(), bounds.y_ceiling())
}

/// Clips the page along the diagonal cut through `center`, keeping the side
/// that holds `corner`.
fn cut_toward_corner(angle: f64, center: Point, bounds: DiagramBounds, corner: Point) -> Polygon {
    let direction = Point::from_angle(slope_angle(angle));
    let mut normal = Point::new(-direction.y(), direction.x());
    if corner.sub_point(center).dot(normal) < 0.0 {
        normal = normal.scale(-1.0);
    }
    bounds.as_bounds().to_polygon().clip_half_plane(center, normal)
}

/// Builds the zone polygon for a boundary panel rotated by `angle` (already
/// normalized to `[0, 2π)`) and centered at `center`.
///
/// Returns `None` only if no rule matches, which the rule table rules out
/// for normalized angles.
pub(crate) fn represent_zone(angle: f64, center: Point, bounds: DiagramBounds) -> Option<Polygon> {
    let rule = ZONE_RULES.iter().find(|rule| (rule.matches)(angle))?;
    trace!(rule = rule.name, angle; "Zone rule selected");
    Some((rule.build)(angle, center, bounds))
}


#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;

    proptest! {
        #[test]
        fn exactly_one_rule_matches(angle in 0.0f64..TAU) {
            let matching = ZONE_RULES.iter().filter(|rule| (rule.matches)(angle)).count();
            prop_assert_eq!(matching, 1);
        }

        #[test]
        fn zone_stays_within_page(
            angle in 0.0f64..TAU,
            x in 0.5f64..9.5,
            y in 0.5f64..9.5,
        ) {
            let page = DiagramBounds::new(Point::new(0.0, 0.0), Point::new(10.0, 10.0));
            let zone = represent_zone(angle, Point::new(x, y), page).unwrap();
            let page_polygon = page.as_bounds().to_polygon();

            prop_assert!(!zone.is_degenerate());
            for point in zone.points() {
                prop_assert!(page_polygon.contains_point(*point));
            }
            prop_assert!(zone.area() <= 100.0 + 1e-9);
        }
    }
}
