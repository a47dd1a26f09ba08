//! # geoimport-core
//!
//! Canonical geometry model and shared machinery for the `geoimport`
//! family of crates.
//!
//! The decoders in `geoimport-formats` collapse GeoJSON, GPX and KML/KMZ
//! documents into the single representation defined here:
//!
//! | Type | Meaning |
//! |------|---------|
//! | [`Point`] | annotated location with optional title/subtitle/index |
//! | [`Polyline`] | ordered run of ≥2 coordinates with labels and color |
//! | [`Polygon`] | exterior ring (≥3 coordinates) plus hole rings |
//! | [`MultiPolyline`] / [`MultiPolygon`] | same-colored overlay groups |
//! | [`GeoData`] | the final aggregate handed to a renderer or store |
//!
//! This crate also owns format detection ([`GeoFormat`]), the closed
//! error taxonomy ([`GeoImportError`]), the property mapping with its
//! title/subtitle/color heuristics ([`Properties`]), and the normalizer
//! ([`normalize::assemble`]) that groups decoded geometries and computes
//! the aggregate bounding rectangle.

pub mod bounds;
pub mod error;
pub mod format;
pub mod geometry;
pub mod normalize;
pub mod properties;

pub use bounds::BoundingRect;
pub use error::{GeoImportError, GpxErrors, GpxViolation, KmlErrorKind, Result};
pub use format::GeoFormat;
pub use geometry::{Coordinate, GeoData, MultiPolygon, MultiPolyline, Point, Polygon, Polyline};
pub use normalize::{assemble, Decoded};
pub use properties::{normalize_hex_color, PropValue, Properties};
