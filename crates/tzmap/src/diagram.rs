//! Normalized diagram model.
//!
//! A [`Diagram`] is the mutable working set of the pipeline: a flat arena of
//! [`DiagramShape`]s, the [`DiagramEdge`]s between them, and the overall
//! [`DiagramBounds`]. Parent links are [`ShapeIndex`] values into the arena,
//! so re-pointing a parent is an index rewrite.

use std::fmt;

use tzmap_core::geometry::{Bounds, Point, Polygon};

/// Index of a shape inside a [`Diagram`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShapeIndex(usize);

impl ShapeIndex {
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    /// Position of the shape in [`Diagram::shapes`]
    pub fn get(self) -> usize {
        self.0
    }
}

impl fmt::Display for ShapeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Which representer built a shape's polygon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeOrigin {
    /// A plain shape, represented by its bounding rectangle
    Simple,
    /// A boundary panel, represented by the zone it cuts out of the page
    Boundary,
}

/// A classified diagram shape.
#[derive(Debug, Clone, PartialEq)]
pub struct DiagramShape {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) type_label: String,
    pub(crate) unique_id: String,
    pub(crate) origin: ShapeOrigin,
    pub(crate) parent: Option<ShapeIndex>,
    pub(crate) is_trust_zone: bool,
    pub(crate) footprint: Bounds,
    pub(crate) polygon: Option<Polygon>,
}

impl DiagramShape {
    /// Creates a shape with no parent.
    ///
    /// `footprint` is the shape's own bounding box; `polygon` is the area it
    /// claims on the page (the same rectangle for simple shapes, the cut
    /// zone for boundaries).
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        type_label: impl Into<String>,
        origin: ShapeOrigin,
        footprint: Bounds,
        polygon: Option<Polygon>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            type_label: type_label.into(),
            unique_id: String::new(),
            origin,
            parent: None,
            is_trust_zone: false,
            footprint,
            polygon,
        }
    }

    pub fn with_unique_id(mut self, unique_id: impl Into<String>) -> Self {
        self.unique_id = unique_id.into();
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_label(&self) -> &str {
        &self.type_label
    }

    pub fn unique_id(&self) -> &str {
        &self.unique_id
    }

    pub fn origin(&self) -> ShapeOrigin {
        self.origin
    }

    pub fn parent(&self) -> Option<ShapeIndex> {
        self.parent
    }

    pub fn is_trust_zone(&self) -> bool {
        self.is_trust_zone
    }

    pub fn footprint(&self) -> Bounds {
        self.footprint
    }

    pub fn polygon(&self) -> Option<&Polygon> {
        self.polygon.as_ref()
    }

    /// Area of the polygon, zero when absent
    pub fn area(&self) -> f64 {
        self.polygon.as_ref().map_or(0.0, Polygon::area)
    }
}

/// A connector between two shapes, identified by shape id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramEdge {
    pub(crate) id: String,
    pub(crate) from_id: String,
    pub(crate) to_id: String,
    pub(crate) bidirectional: bool,
    pub(crate) name: Option<String>,
}

impl DiagramEdge {
    pub fn new(id: impl Into<String>, from_id: impl Into<String>, to_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            from_id: from_id.into(),
            to_id: to_id.into(),
            bidirectional: false,
            name: None,
        }
    }

    pub fn with_bidirectional(mut self, bidirectional: bool) -> Self {
        self.bidirectional = bidirectional;
        self
    }

    pub fn with_name(mut self, name: Option<String>) -> Self {
        self.name = name;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn from_id(&self) -> &str {
        &self.from_id
    }

    pub fn to_id(&self) -> &str {
        &self.to_id
    }

    pub fn is_bidirectional(&self) -> bool {
        self.bidirectional
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns true if either end is attached to `shape_id`
    pub fn touches(&self, shape_id: &str) -> bool {
        self.from_id == shape_id || self.to_id == shape_id
    }
}

/// Overall extent of the diagram, used to clip boundary zones.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiagramBounds(Bounds);

impl DiagramBounds {
    pub fn new(floor: Point, ceiling: Point) -> Self {
        Self(Bounds::new(floor, ceiling))
    }

    pub fn x_floor(self) -> f64 {
        self.0.min_x()
    }

    pub fn y_floor(self) -> f64 {
        self.0.min_y()
    }

    pub fn x_ceiling(self) -> f64 {
        self.0.max_x()
    }

    pub fn y_ceiling(self) -> f64 {
        self.0.max_y()
    }

    pub fn as_bounds(self) -> Bounds {
        self.0
    }
}

impl From<Bounds> for DiagramBounds {
    fn from(bounds: Bounds) -> Self {
        Self(bounds)
    }
}

/// A classified diagram page.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagram {
    pub(crate) shapes: Vec<DiagramShape>,
    pub(crate) edges: Vec<DiagramEdge>,
    pub(crate) bounds: DiagramBounds,
}

impl Diagram {
    pub fn new(shapes: Vec<DiagramShape>, edges: Vec<DiagramEdge>, bounds: DiagramBounds) -> Self {
        Self {
            shapes,
            edges,
            bounds,
        }
    }

    pub fn shapes(&self) -> &[DiagramShape] {
        &self.shapes
    }

    pub fn edges(&self) -> &[DiagramEdge] {
        &self.edges
    }

    pub fn bounds(&self) -> DiagramBounds {
        self.bounds
    }

    /// Returns the shape at `index`.
    ///
    /// # Panics
    /// Panics if the index does not belong to this diagram.
    pub fn shape(&self, index: ShapeIndex) -> &DiagramShape {
        &self.shapes[index.0]
    }

    /// Iterates over every shape together with its index
    pub fn indexed_shapes(&self) -> impl Iterator<Item = (ShapeIndex, &DiagramShape)> {
        self.shapes
            .iter()
            .enumerate()
            .map(|(i, shape)| (ShapeIndex(i), shape))
    }

    /// Looks a shape up by its source id
    pub fn find(&self, id: &str) -> Option<ShapeIndex> {
        self.shapes.iter().position(|s| s.id == id).map(ShapeIndex)
    }

    /// Returns the parent shape of the shape at `index`, if any
    pub fn parent_of(&self, index: ShapeIndex) -> Option<&DiagramShape> {
        self.shape(index).parent.map(|p| self.shape(p))
    }

    /// Walks the parent chain starting above `index`
    pub fn ancestors(&self, index: ShapeIndex) -> impl Iterator<Item = ShapeIndex> + '_ {
        let mut current = self.shape(index).parent;
        let mut remaining = self.shapes.len();
        std::iter::from_fn(move || {
            let next = current?;
            // Parent links never cycle; the countdown only bounds a corrupted arena
            if remaining == 0 {
                return None;
            }
            remaining -= 1;
            current = self.shapes[next.0].parent;
            Some(next)
        })
    }
}
