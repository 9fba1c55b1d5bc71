//! JSON page exports.
//!
//! A page export is a flat JSON dump of one diagram page: its top-level
//! shapes with their cells, text, master inheritance and connector glue.
//! [`ShapeRecord`] implements [`Shape`] on top of it.
//!
//! # Example
//!
//! ```
//! # use tzmap_source::{page::Page, shape::Shape};
//! let page = Page::from_json(r#"{
//!     "shapes": [
//!         {"id": "1", "text": "EC2", "center": {"x": 2.0, "y": 3.0},
//!          "cells": {"Width": 1.0, "Height": "0.5"}}
//!     ]
//! }"#).unwrap();
//!
//! let shape = &page.shapes()[0];
//! assert_eq!(shape.text(), "EC2");
//! assert_eq!(shape.height(), Some(0.5));
//! ```

use std::{collections::BTreeMap, fs, path::Path};

use log::{debug, info};
use serde::Deserialize;

use tzmap_core::geometry::Point;

use crate::{
    error::SourceError,
    shape::{Endpoint, Shape, normalize_unique_id},
};

/// Smallest page export accepted, in bytes.
pub const MIN_PAGE_SIZE: u64 = 10;

/// Largest page export accepted, in bytes.
pub const MAX_PAGE_SIZE: u64 = 10 * 1024 * 1024;

/// A cell value as found in the export: either numeric or a raw formula string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Number(f64),
    Text(String),
}

impl CellValue {
    /// Numeric interpretation of the cell, if any
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(text) => text.trim().parse().ok(),
        }
    }

    /// Textual form of the cell; whole numbers lose their fractional part
    pub fn as_text(&self) -> String {
        match self {
            Self::Number(n) if n.fract() == 0.0 && n.is_finite() => format!("{}", *n as i64),
            Self::Number(n) => n.to_string(),
            Self::Text(text) => text.clone(),
        }
    }
}

pub type Cells = BTreeMap<String, CellValue>;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct PointRecord {
    pub x: f64,
    pub y: f64,
}

/// A sub-shape of a group; only its text matters here.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ChildRecord {
    #[serde(default)]
    pub text: Option<String>,
}

/// The master a shape was instantiated from.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MasterRecord {
    /// Master page name, e.g. `Dynamic connector` or `Double Arrow`
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub unique_id: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub cells: Cells,
    #[serde(default)]
    pub children: Vec<ChildRecord>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ConnectRecord {
    pub shape_id: String,
    pub from_rel: String,
}

/// A top-level shape of a page export.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ShapeRecord {
    pub id: String,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub shape_name: Option<String>,
    #[serde(default)]
    pub center: Option<PointRecord>,
    #[serde(default)]
    pub cells: Cells,
    #[serde(default)]
    pub master: Option<MasterRecord>,
    #[serde(default)]
    pub children: Vec<ChildRecord>,
    #[serde(default, deserialize_with = "deserialize_connects")]
    pub connects: Vec<Endpoint>,
}

fn deserialize_connects<'de, D>(deserializer: D) -> Result<Vec<Endpoint>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let records = Vec::<ConnectRecord>::deserialize(deserializer)?;
    Ok(records
        .into_iter()
        .map(|record| Endpoint::new(record.shape_id, record.from_rel))
        .collect())
}

fn children_text(children: &[ChildRecord]) -> String {
    children
        .iter()
        .filter_map(|child| child.text.as_deref())
        .collect()
}

fn non_empty(text: Option<&str>) -> Option<&str> {
    text.filter(|t| !t.trim().is_empty())
}

impl ShapeRecord {
    fn cell(&self, name: &str) -> Option<&CellValue> {
        self.cells.get(name)
    }

    /// Looks a cell up locally first, then on the master
    fn inherited_cell(&self, name: &str) -> Option<&CellValue> {
        self.cell(name)
            .or_else(|| self.master.as_ref().and_then(|m| m.cells.get(name)))
    }
}

impl Shape for ShapeRecord {
    fn id(&self) -> &str {
        &self.id
    }

    fn text(&self) -> String {
        if let Some(text) = non_empty(self.text.as_deref()) {
            return text.trim().to_string();
        }
        let children = children_text(&self.children);
        if !children.trim().is_empty() {
            return children.trim().to_string();
        }
        self.master_text()
    }

    fn master_text(&self) -> String {
        let Some(master) = &self.master else {
            return String::new();
        };
        if let Some(text) = non_empty(master.text.as_deref()) {
            return text.trim().to_string();
        }
        children_text(&master.children).trim().to_string()
    }

    fn master_unique_id(&self) -> String {
        self.master
            .as_ref()
            .and_then(|m| m.unique_id.as_deref())
            .map(normalize_unique_id)
            .unwrap_or_default()
    }

    fn master_page_name(&self) -> Option<&str> {
        self.master.as_ref().and_then(|m| m.name.as_deref())
    }

    fn shape_class_name(&self) -> Option<&str> {
        self.shape_name.as_deref()
    }

    fn center(&self) -> Option<Point> {
        self.center.map(|c| Point::new(c.x, c.y))
    }

    fn width(&self) -> Option<f64> {
        self.inherited_cell("Width").and_then(CellValue::as_f64)
    }

    fn height(&self) -> Option<f64> {
        self.inherited_cell("Height").and_then(CellValue::as_f64)
    }

    fn rotation_angle(&self) -> f64 {
        self.cell("Angle")
            .and_then(CellValue::as_f64)
            .unwrap_or_default()
    }

    fn connection_endpoints(&self) -> &[Endpoint] {
        &self.connects
    }

    fn begin_arrow(&self) -> Option<String> {
        self.inherited_cell("BeginArrow").map(CellValue::as_text)
    }

    fn end_arrow(&self) -> Option<String> {
        self.inherited_cell("EndArrow").map(CellValue::as_text)
    }
}

/// One diagram page.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Page {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    shapes: Vec<ShapeRecord>,
}

impl Page {
    pub fn new(shapes: Vec<ShapeRecord>) -> Self {
        Self { name: None, shapes }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn shapes(&self) -> &[ShapeRecord] {
        &self.shapes
    }

    /// Parses a page export from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::InvalidJson`] if the document is malformed.
    pub fn from_json(json: &str) -> Result<Self, SourceError> {
        let page: Page = serde_json::from_str(json)?;
        debug!(shapes_count = page.shapes.len(); "Page export parsed");
        Ok(page)
    }

    /// Reads and parses a page export file after checking its size.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, its size is outside
    /// [`MIN_PAGE_SIZE`]..=[`MAX_PAGE_SIZE`], or it is not valid JSON.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let path = path.as_ref();
        info!(path = path.display().to_string(); "Loading page export");

        let size = fs::metadata(path)?.len();
        if !(MIN_PAGE_SIZE..=MAX_PAGE_SIZE).contains(&size) {
            return Err(SourceError::InvalidSize {
                size,
                min: MIN_PAGE_SIZE,
                max: MAX_PAGE_SIZE,
            });
        }

        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn parse_shape(json: &str) -> ShapeRecord {
        serde_json::from_str(json).expect("valid shape record")
    }

    #[test]
    fn test_text_prefers_own_then_children_then_master() {
        let own = parse_shape(r#"{"id": "1", "text": " EC2 ", "master": {"text": "Instance"}}"#);
        assert_eq!(own.text(), "EC2");

        let children = parse_shape(
            r#"{"id": "1", "text": "", "children": [{"text": "Lamb"}, {"text": "da"}],
                "master": {"text": "Instance"}}"#,
        );
        assert_eq!(children.text(), "Lambda");

        let master = parse_shape(r#"{"id": "1", "master": {"children": [{"text": "S3"}]}}"#);
        assert_eq!(master.text(), "S3");
        assert_eq!(master.master_text(), "S3");

        let none = parse_shape(r#"{"id": "1"}"#);
        assert_eq!(none.text(), "");
    }

    #[test]
    fn test_dimensions_fall_back_to_master() {
        let shape = parse_shape(
            r#"{"id": "1", "cells": {"Width": 2.5},
                "master": {"cells": {"Width": "9", "Height": "1.25"}}}"#,
        );
        assert_eq!(shape.width(), Some(2.5));
        assert_eq!(shape.height(), Some(1.25));

        let bare = parse_shape(r#"{"id": "2"}"#);
        assert_eq!(bare.width(), None);
        assert_eq!(bare.height(), None);
    }

    #[test]
    fn test_unique_id_is_stripped() {
        let shape = parse_shape(r#"{"id": "1", "master": {"unique_id": "{ABC-123}"}}"#);
        assert_eq!(shape.master_unique_id(), "ABC-123");
        assert_eq!(parse_shape(r#"{"id": "1"}"#).master_unique_id(), "");
    }

    #[test]
    fn test_connects_and_arrows() {
        let shape = parse_shape(
            r#"{"id": "9", "cells": {"BeginArrow": 0, "EndArrow": "13"},
                "connects": [{"shape_id": "1", "from_rel": "BeginX"},
                             {"shape_id": "2", "from_rel": "EndX"}]}"#,
        );
        let endpoints = shape.connection_endpoints();
        assert_eq!(endpoints.len(), 2);
        assert!(endpoints[0].is_origin());
        assert_eq!(endpoints[1].shape_id(), "2");
        assert_eq!(shape.begin_arrow().as_deref(), Some("0"));
        assert_eq!(shape.end_arrow().as_deref(), Some("13"));
    }

    #[test]
    fn test_rotation_defaults_to_zero() {
        assert_eq!(parse_shape(r#"{"id": "1"}"#).rotation_angle(), 0.0);
        let rotated = parse_shape(r#"{"id": "1", "cells": {"Angle": "-1.5707963267949"}}"#);
        assert!((rotated.rotation_angle() + std::f64::consts::FRAC_PI_2).abs() < 1e-9);
    }

    #[test]
    fn test_from_file_rejects_tiny_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{}}").unwrap();

        let err = Page::from_file(file.path()).unwrap_err();
        assert!(matches!(err, SourceError::InvalidSize { size: 2, .. }));
    }

    #[test]
    fn test_from_file_rejects_invalid_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "this is not a page export").unwrap();

        let err = Page::from_file(file.path()).unwrap_err();
        assert!(matches!(err, SourceError::InvalidJson(_)));
    }

    #[test]
    fn test_from_file_reads_page() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"name": "Page-1", "shapes": [{{"id": "1"}}]}}"#).unwrap();

        let page = Page::from_file(file.path()).unwrap();
        assert_eq!(page.name(), Some("Page-1"));
        assert_eq!(page.shapes().len(), 1);
    }
}
