//! Format decoders for the geoimport pipeline
//!
//! Each decoder turns raw file bytes into a flat stream of
//! [`Decoded`](geoimport_core::normalize::Decoded) items that the core
//! crate assembles into [`GeoData`](geoimport_core::geometry::GeoData).
//!
//! | Module    | Input formats | Failure mode |
//! |-----------|---------------|--------------|
//! | `geojson` | GeoJSON       | fail-fast: any invalid member rejects the file |
//! | `gpx`     | GPX 1.0/1.1   | aggregating: all violations collected, then rejected together |
//! | `kml`     | KML, KMZ      | skip-per-placemark: malformed placemarks are dropped with a warning |

pub mod geojson;
pub mod gpx;
pub mod kml;

pub use crate::geojson::decode_geojson;
pub use crate::gpx::decode_gpx;
pub use crate::kml::{decode_kml, decode_kmz};
