//! Diagram inputs for tzmap.
//!
//! This crate holds everything the normalization pipeline reads from the
//! outside world:
//!
//! - **Shapes**: the [`shape::Shape`] accessor trait and label helpers
//! - **Pages**: JSON page exports implementing that trait ([`page`] module)
//! - **Mappings**: YAML mapping files resolved into a [`mapping::MappingSet`]

pub mod error;
pub mod mapping;
pub mod page;
pub mod shape;

pub use error::{MappingError, SourceError};
