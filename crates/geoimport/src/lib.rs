//! Geospatial file import
//!
//! One entry point for turning GeoJSON, GPX, KML or KMZ bytes into the
//! canonical [`GeoData`] model: points, color-grouped polylines and
//! polygons, and the bounding rectangle spanning all of them.
//!
//! ```no_run
//! use geoimport::import_file;
//!
//! let data = import_file("trips/summer.gpx")?;
//! println!("{} waypoints", data.points.len());
//! # Ok::<(), geoimport::GeoImportError>(())
//! ```
//!
//! Format selection is by file extension ([`import_file`],
//! [`import_named`]) or explicit [`GeoFormat`] ([`import`]). Every
//! failure is one variant of [`GeoImportError`]; decoders never panic on
//! malformed input.

use std::path::Path;

pub use geoimport_core::bounds::BoundingRect;
pub use geoimport_core::error::{
    GeoImportError, GpxErrors, GpxViolation, KmlErrorKind, Result,
};
pub use geoimport_core::format::GeoFormat;
pub use geoimport_core::geometry::{
    Coordinate, GeoData, MultiPolygon, MultiPolyline, Point, Polygon, Polyline,
};
pub use geoimport_core::properties::{PropValue, Properties};

use geoimport_core::normalize::assemble;
use geoimport_formats::{decode_geojson, decode_gpx, decode_kml, decode_kmz};

/// Decode raw bytes as the given format and assemble the result
///
/// # Errors
///
/// Format-specific decode errors, or [`GeoImportError::FileEmpty`] when
/// the input parses but contains no coordinate-bearing feature.
pub fn import(bytes: &[u8], format: GeoFormat) -> Result<GeoData> {
    let decoded = match format {
        GeoFormat::GeoJson => decode_geojson(bytes)?,
        GeoFormat::Gpx => decode_gpx(bytes)?,
        GeoFormat::Kml => decode_kml(bytes)?,
        GeoFormat::Kmz => decode_kmz(bytes)?,
    };
    let data = assemble(decoded);
    if data.is_empty() {
        return Err(GeoImportError::FileEmpty);
    }
    Ok(data)
}

/// Decode raw bytes, detecting the format from a filename
///
/// # Errors
///
/// [`GeoImportError::UnsupportedFileType`] for an unrecognized
/// extension, otherwise as [`import`].
pub fn import_named(bytes: &[u8], filename: &str) -> Result<GeoData> {
    let format = GeoFormat::from_path(filename)?;
    import(bytes, format)
}

/// Read and decode a file, detecting the format from its extension
///
/// The extension is checked before the file is opened, so an
/// unsupported type never touches the filesystem.
///
/// # Errors
///
/// [`GeoImportError::FileInaccessible`] when the file cannot be read,
/// otherwise as [`import_named`].
pub fn import_file<P: AsRef<Path>>(path: P) -> Result<GeoData> {
    let path = path.as_ref();
    let format = GeoFormat::from_path(path)?;
    let bytes = std::fs::read(path)?;
    log::debug!("importing {} ({} bytes)", path.display(), bytes.len());
    import(&bytes, format)
}
