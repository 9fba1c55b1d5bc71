//! The shape accessor contract.
//!
//! The normalization pipeline never touches raw diagram files. It consumes
//! shapes through the [`Shape`] trait, which any diagram reader can
//! implement. [`crate::page`] provides the implementation used by the CLI.

use tzmap_core::geometry::Point;

/// Connection role marking the endpoint a connector was drawn from.
pub const ORIGIN_ROLE: &str = "BeginX";

/// Marker in a connector's master page name for double-headed arrows.
pub const DOUBLE_ARROW_MARKER: &str = "Double Arrow";

/// One end of a connector: the shape it is glued to and the connector cell
/// that does the gluing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    shape_id: String,
    role: String,
}

impl Endpoint {
    pub fn new(shape_id: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            shape_id: shape_id.into(),
            role: role.into(),
        }
    }

    /// Id of the shape this endpoint is attached to
    pub fn shape_id(&self) -> &str {
        &self.shape_id
    }

    /// Connector cell name for this endpoint (e.g. `BeginX`, `EndX`)
    pub fn role(&self) -> &str {
        &self.role
    }

    /// Returns true if the connector was drawn starting from this endpoint
    pub fn is_origin(&self) -> bool {
        self.role == ORIGIN_ROLE
    }
}

/// Read-only view of a single shape on a diagram page.
///
/// Dimension accessors already apply master inheritance: a shape without a
/// local width reports its master's width.
pub trait Shape {
    /// Stable identifier from the source diagram
    fn id(&self) -> &str;

    /// Display text: own, then children's, then inherited from the master.
    /// The first non-empty candidate wins; the result is trimmed.
    fn text(&self) -> String;

    /// Text inherited from the master shape, used as the type label
    fn master_text(&self) -> String;

    /// Master unique id with surrounding `{}` stripped, or empty
    fn master_unique_id(&self) -> String;

    /// Name of the master page, used for connector arrow styles
    fn master_page_name(&self) -> Option<&str>;

    /// Shape class name, used to detect boundary shapes
    fn shape_class_name(&self) -> Option<&str>;

    fn center(&self) -> Option<Point>;

    fn width(&self) -> Option<f64>;

    fn height(&self) -> Option<f64>;

    /// Rotation in radians; shapes without a rotation report zero
    fn rotation_angle(&self) -> f64;

    /// Endpoints of this shape when it is a connector
    fn connection_endpoints(&self) -> &[Endpoint];

    /// Raw `BeginArrow` cell value
    fn begin_arrow(&self) -> Option<String>;

    /// Raw `EndArrow` cell value
    fn end_arrow(&self) -> Option<String>;
}

/// Returns true if an arrow cell value denotes a visible arrowhead.
///
/// Arrowheads are encoded as non-zero unsigned integers.
pub fn is_arrowhead(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.is_empty() && v != "0" && v.chars().all(|c| c.is_ascii_digit()))
}

/// Strips `{` and `}` from a master unique id.
///
/// # Examples
///
/// ```
/// # use tzmap_source::shape::normalize_unique_id;
/// assert_eq!(normalize_unique_id("{A1B2-C3}"), "A1B2-C3");
/// ```
pub fn normalize_unique_id(unique_id: &str) -> String {
    unique_id
        .trim()
        .chars()
        .filter(|c| *c != '{' && *c != '}')
        .collect()
}

/// Collapses every run of whitespace (newlines included) into a single
/// space and trims both ends.
///
/// # Examples
///
/// ```
/// # use tzmap_source::shape::normalize_label;
/// assert_eq!(normalize_label("  Amazon\nEC2   Instance "), "Amazon EC2 Instance");
/// ```
pub fn normalize_label(label: &str) -> String {
    label.split_whitespace().collect::<Vec<_>>().join(" ")
}
