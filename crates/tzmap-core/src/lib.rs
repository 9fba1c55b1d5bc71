//! tzmap Core Types and Definitions
//!
//! This crate provides the foundational types shared by the tzmap crates:
//!
//! - **Geometry**: Points, bounds, polygons and angle helpers ([`geometry`] module)
//! - **OTM**: The Open Threat Model output graph ([`otm`] module)

pub mod geometry;
pub mod otm;
