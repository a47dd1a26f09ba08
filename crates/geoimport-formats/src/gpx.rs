//! GPX decoding (GPS Exchange Format 1.0/1.1)
//!
//! Hand-parsed over `roxmltree` with namespace-agnostic tag matching.
//! GPX permits sparse data, so points lacking coordinates are dropped
//! from their sequence silently; schema violations (bad version,
//! out-of-range coordinates) are collected across the whole document and
//! reported as one aggregated error. Coordinates are validated against
//! WGS84 ranges and never clamped.

use roxmltree::{Document, Node};

use geoimport_core::error::{GeoImportError, GpxErrors, GpxViolation, Result};
use geoimport_core::geometry::{Coordinate, Point, Polyline};
use geoimport_core::normalize::Decoded;

/// Decode a GPX document into the canonical geometry stream
///
/// Each `wpt` becomes a point (1-based display index), each `rte`
/// becomes one polyline, and each `trkseg` of each `trk` becomes one
/// polyline, independently.
///
/// # Errors
///
/// - [`GeoImportError::FileCorrupted`] for empty or non-UTF-8 input
/// - [`GeoImportError::InvalidGpx`] for XML well-formedness failures
///   (with line number), an unsupported schema version, or out-of-range
///   coordinates, aggregated over the document
/// - [`GeoImportError::FileEmpty`] for a document with zero waypoints,
///   routes and tracks
pub fn decode_gpx(bytes: &[u8]) -> Result<Vec<Decoded>> {
    let content = std::str::from_utf8(bytes).map_err(|_| GeoImportError::FileCorrupted)?;
    if content.trim().is_empty() {
        return Err(GeoImportError::FileCorrupted);
    }

    let document = Document::parse(content).map_err(|e| {
        GeoImportError::InvalidGpx(GpxErrors::single(GpxViolation::Xml {
            line: e.pos().row,
            message: e.to_string(),
        }))
    })?;

    let root = document.root_element();
    if root.tag_name().name() != "gpx" {
        let pos = document.text_pos_at(root.range().start);
        return Err(GeoImportError::InvalidGpx(GpxErrors::single(
            GpxViolation::Xml {
                line: pos.row,
                message: format!("root element is <{}>, expected <gpx>", root.tag_name().name()),
            },
        )));
    }

    let mut violations = Vec::new();
    check_version(root, &mut violations);

    let mut decoded = Vec::new();
    let mut feature_count = 0usize;

    let mut waypoint_index = 0u32;
    for child in root.children().filter(Node::is_element) {
        match child.tag_name().name() {
            "wpt" => {
                feature_count += 1;
                if let Some(coordinate) = point_coordinate(child, &mut violations) {
                    waypoint_index += 1;
                    decoded.push(Decoded::Point(waypoint(child, coordinate, waypoint_index)));
                }
            }
            "rte" => {
                feature_count += 1;
                let points = ordered_points(child, "rtept", &mut violations);
                if let Some(line) = Polyline::new(points, None, feature_labels(child)) {
                    decoded.push(Decoded::Line(line));
                }
            }
            "trk" => {
                feature_count += 1;
                let labels = feature_labels(child);
                for segment in elements_named(child, "trkseg") {
                    let points = ordered_points(segment, "trkpt", &mut violations);
                    if let Some(line) = Polyline::new(points, None, labels.clone()) {
                        decoded.push(Decoded::Line(line));
                    }
                }
            }
            _ => {}
        }
    }

    if !violations.is_empty() {
        return Err(GeoImportError::InvalidGpx(GpxErrors { violations }));
    }
    if feature_count == 0 {
        return Err(GeoImportError::FileEmpty);
    }
    Ok(decoded)
}

fn check_version(root: Node<'_, '_>, violations: &mut Vec<GpxViolation>) {
    match root.attribute("version") {
        Some("1.0" | "1.1") => {}
        Some(other) => violations.push(GpxViolation::UnsupportedVersion(other.to_string())),
        None => violations.push(GpxViolation::UnsupportedVersion("(missing)".to_string())),
    }
}

fn waypoint(node: Node<'_, '_>, coordinate: Coordinate, index: u32) -> Point {
    let mut point = Point::new(coordinate);
    point.title = child_text(node, "name");
    point.subtitle = child_text(node, "desc").or_else(|| child_text(node, "cmt"));
    point.index = Some(index);
    point
}

/// Coordinate-having points of a route or track segment, in document
/// order; points without coordinates are dropped, not treated as breaks
fn ordered_points(
    parent: Node<'_, '_>,
    point_tag: &str,
    violations: &mut Vec<GpxViolation>,
) -> Vec<Coordinate> {
    elements_named(parent, point_tag)
        .filter_map(|node| point_coordinate(node, violations))
        .collect()
}

/// Read `lat`/`lon` attributes from a GPX point element
///
/// A missing or unparseable attribute drops the point silently (GPX
/// permits sparse data); an out-of-range value is a schema violation and
/// is never clamped.
fn point_coordinate(node: Node<'_, '_>, violations: &mut Vec<GpxViolation>) -> Option<Coordinate> {
    let latitude: f64 = match node.attribute("lat").and_then(|v| v.parse().ok()) {
        Some(value) => value,
        None => {
            log::debug!("dropping <{}> without usable lat", node.tag_name().name());
            return None;
        }
    };
    let longitude: f64 = match node.attribute("lon").and_then(|v| v.parse().ok()) {
        Some(value) => value,
        None => {
            log::debug!("dropping <{}> without usable lon", node.tag_name().name());
            return None;
        }
    };

    let mut in_range = true;
    if !(-90.0..=90.0).contains(&latitude) {
        violations.push(GpxViolation::LatitudeOutOfRange(latitude));
        in_range = false;
    }
    if !(-180.0..=180.0).contains(&longitude) {
        violations.push(GpxViolation::LongitudeOutOfRange(longitude));
        in_range = false;
    }
    in_range.then(|| Coordinate::new(latitude, longitude))
}

/// Display labels for a route or track: name, comment and description,
/// each optional
fn feature_labels(node: Node<'_, '_>) -> Vec<String> {
    ["name", "cmt", "desc"]
        .into_iter()
        .filter_map(|tag| child_text(node, tag))
        .collect()
}

fn elements_named<'a, 'input>(
    parent: Node<'a, 'input>,
    tag: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
    parent
        .children()
        .filter(move |child| child.is_element() && child.tag_name().name() == tag)
}

fn child_text(node: Node<'_, '_>, tag: &str) -> Option<String> {
    elements_named(node, tag)
        .next()
        .and_then(|child| child.text())
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}
