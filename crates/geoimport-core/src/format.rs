//! Input format detection
//!
//! Maps a filename extension (or an explicit hint) to one of the supported
//! geospatial formats. Detection happens before any parsing; unknown
//! extensions are rejected with [`GeoImportError::UnsupportedFileType`].

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{GeoImportError, Result};

/// Supported geospatial input formats
///
/// KMZ is kept distinct from KML so the decoder knows to unwrap the zip
/// container first; both feed the same KML decode path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum GeoFormat {
    /// GeoJSON per RFC 7946 (`.geojson`, `.json`)
    GeoJson,
    /// GPS Exchange Format 1.0/1.1 (`.gpx`)
    Gpx,
    /// OGC Keyhole Markup Language (`.kml`)
    Kml,
    /// Zip-compressed KML (`.kmz`)
    Kmz,
}

impl GeoFormat {
    /// Detect format from a file extension (without the dot)
    ///
    /// Comparison is case-insensitive. The recognized set is exactly
    /// `geojson`/`json`, `gpx`, `kml` and `kmz`.
    ///
    /// # Errors
    ///
    /// Returns [`GeoImportError::UnsupportedFileType`] for any other
    /// extension.
    #[inline]
    pub fn from_extension(ext: &str) -> Result<Self> {
        match ext.to_lowercase().as_str() {
            "geojson" | "json" => Ok(Self::GeoJson),
            "gpx" => Ok(Self::Gpx),
            "kml" => Ok(Self::Kml),
            "kmz" => Ok(Self::Kmz),
            other => Err(GeoImportError::UnsupportedFileType {
                extension: other.to_string(),
            }),
        }
    }

    /// Detect format from a filename or path
    ///
    /// # Errors
    ///
    /// Returns [`GeoImportError::UnsupportedFileType`] if the path has no
    /// extension or the extension is not recognized.
    #[inline]
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let ext = path
            .as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();
        Self::from_extension(ext)
    }
}
