//! GeoJSON decoding (RFC 7946)
//!
//! Decodes a single `Feature` or a `FeatureCollection` into the canonical
//! geometry stream. Feature-level properties propagate to every geometry
//! reachable from the feature, including the leaves of nested
//! `GeometryCollection`s, because GeoJSON attaches properties at the
//! feature level only.
//!
//! GeoJSON decoding is fail-fast: malformed JSON, an unrecognized `type`,
//! or a shape violation rejects the whole file. The grammar makes partial
//! success ill-defined, so there is no per-geometry skip here.

// `::` anchors the extern crate; this module shares its name.
use ::geojson::{Error as GeoJsonParseError, Feature, GeoJson, Value};

use geoimport_core::error::{GeoImportError, Result};
use geoimport_core::geometry::{Coordinate, Point, Polygon, Polyline};
use geoimport_core::normalize::Decoded;
use geoimport_core::properties::Properties;

/// Maximum `GeometryCollection` nesting depth before the file is rejected
const MAX_GEOMETRY_DEPTH: usize = 64;

/// Decode a GeoJSON document into the canonical geometry stream
///
/// # Errors
///
/// - [`GeoImportError::FileCorrupted`] for empty or non-UTF-8 input
/// - [`GeoImportError::InvalidGeoJson`] for malformed JSON, a document
///   root that is not a `Feature` or `FeatureCollection`, a malformed
///   position, or geometry nesting beyond the depth cap
pub fn decode_geojson(bytes: &[u8]) -> Result<Vec<Decoded>> {
    let content = std::str::from_utf8(bytes).map_err(|_| GeoImportError::FileCorrupted)?;
    if content.trim().is_empty() {
        return Err(GeoImportError::FileCorrupted);
    }

    let document: GeoJson = content
        .parse()
        .map_err(|e: GeoJsonParseError| GeoImportError::InvalidGeoJson(e.to_string()))?;

    let mut decoded = Vec::new();
    match document {
        GeoJson::Feature(feature) => decode_feature(feature, &mut decoded)?,
        GeoJson::FeatureCollection(collection) => {
            for feature in collection.features {
                decode_feature(feature, &mut decoded)?;
            }
        }
        GeoJson::Geometry(_) => {
            return Err(GeoImportError::InvalidGeoJson(
                "document root must be a Feature or FeatureCollection".to_string(),
            ));
        }
    }
    Ok(decoded)
}

fn decode_feature(feature: Feature, out: &mut Vec<Decoded>) -> Result<()> {
    // An absent or null properties object is an empty mapping, not an error.
    let properties = feature
        .properties
        .map(Properties::from_json_object)
        .unwrap_or_default();

    if let Some(geometry) = feature.geometry {
        decode_geometry(&geometry.value, &properties, 0, out)?;
    }
    Ok(())
}

/// Convert one geometry, recursing through `GeometryCollection`s with the
/// same feature properties
fn decode_geometry(
    value: &Value,
    properties: &Properties,
    depth: usize,
    out: &mut Vec<Decoded>,
) -> Result<()> {
    match value {
        Value::Point(position) => {
            out.push(Decoded::Point(annotated_point(position, properties)?));
        }
        Value::MultiPoint(positions) => {
            for position in positions {
                out.push(Decoded::Point(annotated_point(position, properties)?));
            }
        }
        Value::LineString(line) => {
            push_line(line, properties, out)?;
        }
        Value::MultiLineString(lines) => {
            for line in lines {
                push_line(line, properties, out)?;
            }
        }
        Value::Polygon(rings) => {
            push_polygon(rings, properties, out)?;
        }
        Value::MultiPolygon(polygons) => {
            for rings in polygons {
                push_polygon(rings, properties, out)?;
            }
        }
        Value::GeometryCollection(members) => {
            if depth + 1 > MAX_GEOMETRY_DEPTH {
                return Err(GeoImportError::InvalidGeoJson(format!(
                    "GeometryCollection nesting exceeds depth {MAX_GEOMETRY_DEPTH}"
                )));
            }
            for member in members {
                decode_geometry(&member.value, properties, depth + 1, out)?;
            }
        }
    }
    Ok(())
}

fn annotated_point(position: &[f64], properties: &Properties) -> Result<Point> {
    let mut point = Point::new(position_coordinate(position)?);
    point.title = properties.title().map(str::to_string);
    point.subtitle = properties.subtitle().map(str::to_string);
    Ok(point)
}

fn push_line(line: &[Vec<f64>], properties: &Properties, out: &mut Vec<Decoded>) -> Result<()> {
    let coordinates = positions_coordinates(line)?;
    // A line with fewer than 2 positions is dropped, not an error.
    if let Some(polyline) = Polyline::new(coordinates, properties.color(), labels(properties)) {
        out.push(Decoded::Line(polyline));
    }
    Ok(())
}

fn push_polygon(
    rings: &[Vec<Vec<f64>>],
    properties: &Properties,
    out: &mut Vec<Decoded>,
) -> Result<()> {
    // First ring is the exterior, the rest are holes.
    let Some((exterior, holes)) = rings.split_first() else {
        return Ok(());
    };
    let exterior = positions_coordinates(exterior)?;
    let interiors = holes
        .iter()
        .map(|ring| positions_coordinates(ring))
        .collect::<Result<Vec<_>>>()?;
    if let Some(polygon) = Polygon::new(exterior, interiors, properties.color()) {
        out.push(Decoded::Area(polygon));
    }
    Ok(())
}

fn labels(properties: &Properties) -> Vec<String> {
    [properties.title(), properties.subtitle()]
        .into_iter()
        .flatten()
        .map(str::to_string)
        .collect()
}

/// A GeoJSON position is `[longitude, latitude, ...]`; extra ordinates
/// are ignored
fn position_coordinate(position: &[f64]) -> Result<Coordinate> {
    match position {
        [longitude, latitude, ..] => Ok(Coordinate::new(*latitude, *longitude)),
        _ => Err(GeoImportError::InvalidGeoJson(
            "position has fewer than 2 ordinates".to_string(),
        )),
    }
}

fn positions_coordinates(positions: &[Vec<f64>]) -> Result<Vec<Coordinate>> {
    positions
        .iter()
        .map(|p| position_coordinate(p))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(content: &str) -> Result<Vec<Decoded>> {
        decode_geojson(content.as_bytes())
    }

    #[test]
    fn test_feature_collection_of_points() {
        let decoded = decode(
            r#"{
 "type": "FeatureCollection",
 "features": [
   {"type": "Feature",
    "geometry": {"type": "Point", "coordinates": [2.2945, 48.8584]},
    "properties": {"name": "Eiffel Tower", "description": "Paris"}},
   {"type": "Feature",
    "geometry": {"type": "Point", "coordinates": [-0.1419, 51.5014]},
    "properties": {"name": "Big Ben"}}
 ]}"#,
        )
        .unwrap();

        assert_eq!(decoded.len(), 2);
        match &decoded[0] {
            Decoded::Point(point) => {
                assert!((point.coordinate.latitude - 48.8584).abs() < 1e-9);
                assert!((point.coordinate.longitude - 2.2945).abs() < 1e-9);
                assert_eq!(point.title.as_deref(), Some("Eiffel Tower"));
                assert_eq!(point.subtitle.as_deref(), Some("Paris"));
            }
            other => panic!("expected point, got {other:?}"),
        }
    }

    #[test]
    fn test_single_feature_root() {
        let decoded = decode(
            r##"{"type": "Feature",
                "geometry": {"type": "LineString",
                             "coordinates": [[0.0, 0.0], [1.0, 1.0], [2.0, 0.0]]},
                "properties": {"name": "path", "color": "#ff0000"}}"##,
        )
        .unwrap();
        assert_eq!(decoded.len(), 1);
        match &decoded[0] {
            Decoded::Line(line) => {
                assert_eq!(line.coordinates.len(), 3);
                assert_eq!(line.color.as_deref(), Some("ff0000"));
                assert_eq!(line.labels, vec!["path"]);
            }
            other => panic!("expected line, got {other:?}"),
        }
    }

    #[test]
    fn test_null_properties_is_empty_mapping() {
        let decoded = decode(
            r#"{"type": "Feature",
                "geometry": {"type": "Point", "coordinates": [1.0, 2.0]},
                "properties": null}"#,
        )
        .unwrap();
        match &decoded[0] {
            Decoded::Point(point) => {
                assert_eq!(point.title, None);
                assert_eq!(point.subtitle, None);
            }
            other => panic!("expected point, got {other:?}"),
        }
    }

    #[test]
    fn test_geometry_collection_propagates_properties() {
        let decoded = decode(
            r#"{"type": "Feature",
                "geometry": {"type": "GeometryCollection", "geometries": [
                    {"type": "Point", "coordinates": [1.0, 2.0]},
                    {"type": "LineString", "coordinates": [[0.0, 0.0], [1.0, 1.0]]}
                ]},
                "properties": {"title": "shared"}}"#,
        )
        .unwrap();
        assert_eq!(decoded.len(), 2);
        match (&decoded[0], &decoded[1]) {
            (Decoded::Point(point), Decoded::Line(line)) => {
                assert_eq!(point.title.as_deref(), Some("shared"));
                assert_eq!(line.labels, vec!["shared"]);
            }
            other => panic!("unexpected decode {other:?}"),
        }
    }

    #[test]
    fn test_polygon_rings() {
        let decoded = decode(
            r#"{"type": "Feature",
                "geometry": {"type": "Polygon", "coordinates": [
                    [[0.0, 0.0], [4.0, 0.0], [4.0, 4.0], [0.0, 4.0], [0.0, 0.0]],
                    [[1.0, 1.0], [2.0, 1.0], [2.0, 2.0], [1.0, 2.0], [1.0, 1.0]]
                ]},
                "properties": {}}"#,
        )
        .unwrap();
        match &decoded[0] {
            Decoded::Area(polygon) => {
                assert_eq!(polygon.exterior.len(), 5);
                assert_eq!(polygon.interiors.len(), 1);
            }
            other => panic!("expected area, got {other:?}"),
        }
    }

    #[test]
    fn test_multi_polygon() {
        let decoded = decode(
            r#"{"type": "Feature",
                "geometry": {"type": "MultiPolygon", "coordinates": [
                    [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]],
                    [[[5.0, 5.0], [6.0, 5.0], [6.0, 6.0], [5.0, 5.0]]]
                ]},
                "properties": {}}"#,
        )
        .unwrap();
        assert_eq!(decoded.len(), 2);
    }

    #[test]
    fn test_degenerate_line_is_dropped() {
        let decoded = decode(
            r#"{"type": "Feature",
                "geometry": {"type": "LineString", "coordinates": [[1.0, 1.0]]},
                "properties": {}}"#,
        )
        .unwrap();
        assert!(decoded.is_empty());
    }

    #[test]
    fn test_empty_input_is_corrupted_not_invalid() {
        assert!(matches!(decode(""), Err(GeoImportError::FileCorrupted)));
        assert!(matches!(decode("   \n"), Err(GeoImportError::FileCorrupted)));
        assert!(matches!(
            decode_geojson(&[0xff, 0xfe, 0x00]),
            Err(GeoImportError::FileCorrupted)
        ));
    }

    #[test]
    fn test_malformed_json_is_invalid() {
        assert!(matches!(
            decode("{not json"),
            Err(GeoImportError::InvalidGeoJson(_))
        ));
    }

    #[test]
    fn test_bare_geometry_root_is_rejected() {
        let result = decode(r#"{"type": "Point", "coordinates": [1.0, 2.0]}"#);
        assert!(matches!(result, Err(GeoImportError::InvalidGeoJson(_))));
    }

    #[test]
    fn test_unrecognized_type_is_rejected() {
        let result = decode(r#"{"type": "FeatureSoup", "features": []}"#);
        assert!(matches!(result, Err(GeoImportError::InvalidGeoJson(_))));
    }

    #[test]
    fn test_deep_geometry_collection_fails_the_file() {
        let mut inner = r#"{"type": "Point", "coordinates": [1.0, 2.0]}"#.to_string();
        for _ in 0..70 {
            inner = format!(r#"{{"type": "GeometryCollection", "geometries": [{inner}]}}"#);
        }
        let document = format!(
            r#"{{"type": "Feature", "geometry": {inner}, "properties": {{}}}}"#
        );
        assert!(matches!(
            decode(&document),
            Err(GeoImportError::InvalidGeoJson(_))
        ));
    }
}
