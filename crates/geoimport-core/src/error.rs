//! Error taxonomy for geospatial imports
//!
//! Every decoder failure path terminates in exactly one [`GeoImportError`]
//! variant. The set is closed: callers can render a precise user-facing
//! message from the variant alone, without format-specific knowledge.

use std::fmt;
use std::io;

use thiserror::Error;

/// Errors that can occur while importing a geospatial file
#[derive(Debug, Error)]
pub enum GeoImportError {
    /// File extension is not in the recognized set
    #[error("unsupported file type: .{extension}")]
    UnsupportedFileType {
        /// The extension that failed detection, lowercased
        extension: String,
    },

    /// Source bytes could not be obtained (moved, deleted, permission)
    #[error("file is not accessible: {0}")]
    FileInaccessible(#[from] io::Error),

    /// Bytes were obtained but are unreadable as any valid encoding
    /// for the detected format
    #[error("file is corrupted or not a text file")]
    FileCorrupted,

    /// The file decoded successfully but produced zero geometries
    #[error("file contains no geographic data")]
    FileEmpty,

    /// JSON or GeoJSON shape violation; the whole file is rejected
    #[error("invalid GeoJSON: {0}")]
    InvalidGeoJson(String),

    /// One or more GPX schema violations, aggregated over the document
    #[error("invalid GPX: {0}")]
    InvalidGpx(GpxErrors),

    /// Structural KML or KMZ violation
    #[error("invalid KML: {0}")]
    InvalidKml(KmlErrorKind),
}

/// The set of GPX validation errors found in a single document.
///
/// GPX validation does not stop at the first violation: out-of-range
/// coordinates and version problems are collected across the whole
/// document and reported together.
#[derive(Debug)]
pub struct GpxErrors {
    /// Every violation found, in document order
    pub violations: Vec<GpxViolation>,
}

impl GpxErrors {
    /// Wrap a single violation
    #[inline]
    #[must_use = "constructs the error set to return"]
    pub fn single(violation: GpxViolation) -> Self {
        Self {
            violations: vec![violation],
        }
    }
}

impl fmt::Display for GpxErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, violation) in self.violations.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{violation}")?;
        }
        Ok(())
    }
}

/// A single GPX schema violation
#[derive(Debug, Error, PartialEq)]
pub enum GpxViolation {
    /// The `version` attribute is missing or not 1.0/1.1
    #[error("unsupported GPX version {0:?}")]
    UnsupportedVersion(String),

    /// Latitude outside [-90, 90]; never clamped
    #[error("latitude {0} is outside [-90, 90]")]
    LatitudeOutOfRange(f64),

    /// Longitude outside [-180, 180]; never clamped
    #[error("longitude {0} is outside [-180, 180]")]
    LongitudeOutOfRange(f64),

    /// XML well-formedness violation at a specific line
    #[error("XML error at line {line}: {message}")]
    Xml {
        /// 1-based line number of the violation
        line: u32,
        /// Underlying parser message
        message: String,
    },
}

/// Structural KML/KMZ failure kinds
#[derive(Debug, Error, PartialEq)]
pub enum KmlErrorKind {
    /// A required element is absent
    #[error("missing required element <{0}>")]
    MissingElement(String),

    /// A coordinate string failed to parse into lon,lat[,alt] tuples
    #[error("malformed coordinates: {0}")]
    InvalidCoordinates(String),

    /// An element of an unexpected type was found
    #[error("unexpected element <{found}>, expected <{expected}>")]
    TagMismatch {
        /// Tag name that was required here
        expected: String,
        /// Tag name that was actually present
        found: String,
    },

    /// The KMZ container could not be read as a zip archive
    #[error("KMZ archive error: {0}")]
    Zip(String),

    /// The KMZ archive contains no KML document
    #[error("no KML document found in KMZ archive")]
    MissingKmlEntry,

    /// XML well-formedness violation at a specific line
    #[error("XML error at line {line}: {message}")]
    Xml {
        /// 1-based line number of the violation
        line: u32,
        /// Underlying parser message
        message: String,
    },
}

/// Result type for geospatial import operations
pub type Result<T> = std::result::Result<T, GeoImportError>;
