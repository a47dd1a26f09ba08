//! KML and KMZ decoding (OGC Keyhole Markup Language)
//!
//! Parses the Folder/Placemark tree over `roxmltree`, resolving stroke
//! colors through a flat style table built from every `<Style>` and
//! `<StyleMap>` definition in the document. Per-placemark decode
//! failures drop the placemark and continue with its siblings; only
//! structural failures (unreadable zip, XML error, unexpected root) are
//! file-fatal.
//!
//! KMZ input is a zip container; the embedded KML document (`doc.kml`,
//! or the first `.kml` entry) is extracted in memory and decoded the
//! same way.

use std::collections::HashMap;
use std::io::{Cursor, Read};

use roxmltree::{Document, Node};
use zip::ZipArchive;

use geoimport_core::error::{GeoImportError, KmlErrorKind, Result};
use geoimport_core::geometry::{Coordinate, Point, Polygon, Polyline};
use geoimport_core::normalize::Decoded;
use geoimport_core::properties::{normalize_hex_color, Properties};

/// Maximum Folder/MultiGeometry nesting depth; features beyond the cap
/// are skipped, never recursed into
const MAX_NESTING_DEPTH: usize = 64;

/// Style-variant id suffixes stripped during `styleUrl` resolution
const STYLE_VARIANT_SUFFIXES: &[&str] = &["_normal", "_highlight", "-normal", "-highlight"];

/// Decode a KML document into the canonical geometry stream
///
/// # Errors
///
/// - [`GeoImportError::FileCorrupted`] for empty or non-UTF-8 input
/// - [`GeoImportError::InvalidKml`] for XML failures (with line number)
///   or a root element that is not `<kml>`, `<Document>`, `<Folder>` or
///   `<Placemark>`
pub fn decode_kml(bytes: &[u8]) -> Result<Vec<Decoded>> {
    let content = std::str::from_utf8(bytes).map_err(|_| GeoImportError::FileCorrupted)?;
    decode_kml_str(content)
}

/// Decode a KMZ container: unwrap the zip archive, then decode the
/// embedded KML document
///
/// # Errors
///
/// In addition to the KML errors, zip-read failures surface as
/// [`KmlErrorKind::Zip`] and an archive without any `.kml` entry as
/// [`KmlErrorKind::MissingKmlEntry`]; these are never conflated with XML
/// errors.
pub fn decode_kmz(bytes: &[u8]) -> Result<Vec<Decoded>> {
    let content = extract_kml_document(bytes)?;
    decode_kml_str(&content)
}

fn extract_kml_document(bytes: &[u8]) -> Result<String> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| GeoImportError::InvalidKml(KmlErrorKind::Zip(e.to_string())))?;

    // Prefer the conventional doc.kml; otherwise the first .kml entry.
    let names: Vec<String> = archive.file_names().map(str::to_string).collect();
    let entry = names
        .iter()
        .find(|name| name.eq_ignore_ascii_case("doc.kml"))
        .or_else(|| {
            names
                .iter()
                .find(|name| name.to_ascii_lowercase().ends_with(".kml"))
        })
        .ok_or(GeoImportError::InvalidKml(KmlErrorKind::MissingKmlEntry))?;

    let mut file = archive
        .by_name(entry)
        .map_err(|e| GeoImportError::InvalidKml(KmlErrorKind::Zip(e.to_string())))?;
    let mut content = String::new();
    file.read_to_string(&mut content).map_err(|e| {
        if e.kind() == std::io::ErrorKind::InvalidData {
            GeoImportError::FileCorrupted
        } else {
            GeoImportError::InvalidKml(KmlErrorKind::Zip(e.to_string()))
        }
    })?;
    Ok(content)
}

fn decode_kml_str(content: &str) -> Result<Vec<Decoded>> {
    if content.trim().is_empty() {
        return Err(GeoImportError::FileCorrupted);
    }

    let document = Document::parse(content).map_err(|e| {
        GeoImportError::InvalidKml(KmlErrorKind::Xml {
            line: e.pos().row,
            message: e.to_string(),
        })
    })?;

    let root = document.root_element();
    let feature_root = match root.tag_name().name() {
        "kml" => root,
        "Document" | "Folder" | "Placemark" => root,
        found => {
            return Err(GeoImportError::InvalidKml(KmlErrorKind::TagMismatch {
                expected: "kml".to_string(),
                found: found.to_string(),
            }));
        }
    };

    let styles = StyleTable::build(&document);
    let mut decoded = Vec::new();
    walk_feature(feature_root, 0, &styles, &mut decoded);
    Ok(decoded)
}

/// Flat table of style id → resolved stroke color
///
/// `<StyleMap>` ids resolve through the map's `normal` key, and lookups
/// additionally retry with known variant suffixes stripped, because the
/// same logical style commonly has variant ids.
struct StyleTable {
    colors: HashMap<String, Option<String>>,
    aliases: HashMap<String, String>,
}

impl StyleTable {
    fn build(document: &Document<'_>) -> Self {
        let mut colors = HashMap::new();
        let mut aliases = HashMap::new();

        for node in document.descendants().filter(Node::is_element) {
            match node.tag_name().name() {
                "Style" => {
                    if let Some(id) = node.attribute("id") {
                        colors.insert(id.to_string(), style_color(node));
                    }
                }
                "StyleMap" => {
                    if let Some(id) = node.attribute("id") {
                        if let Some(target) = style_map_normal_target(node) {
                            aliases.insert(id.to_string(), target);
                        }
                    }
                }
                _ => {}
            }
        }
        Self { colors, aliases }
    }

    /// Resolve a `styleUrl` value to a stroke color
    ///
    /// An unresolved url yields "no color", never a failure.
    fn resolve(&self, style_url: &str) -> Option<String> {
        let id = style_url.trim().trim_start_matches('#');
        self.lookup(id).or_else(|| {
            STYLE_VARIANT_SUFFIXES
                .iter()
                .find_map(|suffix| id.strip_suffix(suffix).and_then(|base| self.lookup(base)))
        })
    }

    fn lookup(&self, id: &str) -> Option<String> {
        if let Some(color) = self.colors.get(id) {
            return color.clone();
        }
        let target = self.aliases.get(id)?;
        self.colors.get(target.as_str())?.clone()
    }
}

/// Stroke color of a `<Style>`: `<LineStyle><color>` first, then
/// `<PolyStyle><color>`
fn style_color(style: Node<'_, '_>) -> Option<String> {
    ["LineStyle", "PolyStyle"].into_iter().find_map(|tag| {
        element_named(style, tag)
            .and_then(|sub| child_text(sub, "color"))
            .as_deref()
            .and_then(normalize_hex_color)
    })
}

/// The `styleUrl` target of a `<StyleMap>`'s `normal` pair
fn style_map_normal_target(style_map: Node<'_, '_>) -> Option<String> {
    style_map
        .children()
        .filter(|n| n.is_element() && n.tag_name().name() == "Pair")
        .find(|pair| child_text(*pair, "key").as_deref() == Some("normal"))
        .and_then(|pair| child_text(pair, "styleUrl"))
        .map(|url| url.trim().trim_start_matches('#').to_string())
}

/// Recursive descent over the Document/Folder/Placemark tree
fn walk_feature(node: Node<'_, '_>, depth: usize, styles: &StyleTable, out: &mut Vec<Decoded>) {
    if depth > MAX_NESTING_DEPTH {
        log::warn!("skipping KML features nested deeper than {MAX_NESTING_DEPTH}");
        return;
    }
    match node.tag_name().name() {
        "kml" | "Document" | "Folder" => {
            for child in node.children().filter(Node::is_element) {
                walk_feature(child, depth + 1, styles, out);
            }
        }
        "Placemark" => match decode_placemark(node, styles) {
            Ok(items) => out.extend(items),
            Err(kind) => log::warn!("skipping malformed placemark: {kind}"),
        },
        _ => {}
    }
}

/// Decode one placemark into zero or more geometries
///
/// Failures here are recoverable by design: the caller drops the
/// placemark and continues with its siblings.
fn decode_placemark(
    placemark: Node<'_, '_>,
    styles: &StyleTable,
) -> std::result::Result<Vec<Decoded>, KmlErrorKind> {
    let properties = Properties::from_string_pairs([
        ("name", child_text(placemark, "name")),
        ("description", child_text(placemark, "description")),
    ]);
    let color = child_text(placemark, "styleUrl").and_then(|url| styles.resolve(&url));

    let geometry = placemark
        .children()
        .filter(Node::is_element)
        .find(|child| {
            matches!(
                child.tag_name().name(),
                "Point" | "LineString" | "Polygon" | "MultiGeometry"
            )
        })
        .ok_or_else(|| KmlErrorKind::MissingElement("Point|LineString|Polygon".to_string()))?;

    let context = PlacemarkContext {
        name: properties.title().map(str::to_string),
        description: properties.subtitle().map(str::to_string),
        color,
    };
    let mut out = Vec::new();
    decode_geometry(geometry, &context, 0, &mut out)?;
    Ok(out)
}

/// Display attributes shared by every geometry of one placemark
struct PlacemarkContext {
    name: Option<String>,
    description: Option<String>,
    color: Option<String>,
}

impl PlacemarkContext {
    fn labels(&self) -> Vec<String> {
        [self.name.clone(), self.description.clone()]
            .into_iter()
            .flatten()
            .collect()
    }
}

fn decode_geometry(
    node: Node<'_, '_>,
    context: &PlacemarkContext,
    depth: usize,
    out: &mut Vec<Decoded>,
) -> std::result::Result<(), KmlErrorKind> {
    match node.tag_name().name() {
        "Point" => {
            let coordinates = required_coordinates(node)?;
            let Some(first) = coordinates.into_iter().next() else {
                return Err(KmlErrorKind::InvalidCoordinates(
                    "empty <coordinates> in <Point>".to_string(),
                ));
            };
            let mut point = Point::new(first);
            point.title = context.name.clone();
            point.subtitle = context.description.clone();
            out.push(Decoded::Point(point));
        }
        "LineString" => {
            let coordinates = required_coordinates(node)?;
            // Fewer than 2 coordinates is dropped, not an error.
            if let Some(line) =
                Polyline::new(coordinates, context.color.clone(), context.labels())
            {
                out.push(Decoded::Line(line));
            }
        }
        "Polygon" => {
            let outer = element_named(node, "outerBoundaryIs")
                .ok_or_else(|| KmlErrorKind::MissingElement("outerBoundaryIs".to_string()))?;
            let exterior = boundary_ring(outer)?;
            let interiors = node
                .children()
                .filter(|n| n.is_element() && n.tag_name().name() == "innerBoundaryIs")
                .map(boundary_ring)
                .collect::<std::result::Result<Vec<_>, _>>()?;
            if let Some(polygon) = Polygon::new(exterior, interiors, context.color.clone()) {
                out.push(Decoded::Area(polygon));
            }
        }
        "MultiGeometry" => {
            if depth + 1 > MAX_NESTING_DEPTH {
                // Fail the geometry, not the file: the placemark keeps
                // whatever was decoded above the cap.
                log::warn!("skipping MultiGeometry nested deeper than {MAX_NESTING_DEPTH}");
                return Ok(());
            }
            for child in node.children().filter(Node::is_element) {
                if matches!(
                    child.tag_name().name(),
                    "Point" | "LineString" | "Polygon" | "MultiGeometry"
                ) {
                    decode_geometry(child, context, depth + 1, out)?;
                }
            }
        }
        found => {
            return Err(KmlErrorKind::TagMismatch {
                expected: "Point|LineString|Polygon|MultiGeometry".to_string(),
                found: found.to_string(),
            });
        }
    }
    Ok(())
}

/// The `<LinearRing><coordinates>` of a polygon boundary element
fn boundary_ring(boundary: Node<'_, '_>) -> std::result::Result<Vec<Coordinate>, KmlErrorKind> {
    let ring = boundary
        .children()
        .find(Node::is_element)
        .ok_or_else(|| KmlErrorKind::MissingElement("LinearRing".to_string()))?;
    if ring.tag_name().name() != "LinearRing" {
        return Err(KmlErrorKind::TagMismatch {
            expected: "LinearRing".to_string(),
            found: ring.tag_name().name().to_string(),
        });
    }
    required_coordinates(ring)
}

fn required_coordinates(
    node: Node<'_, '_>,
) -> std::result::Result<Vec<Coordinate>, KmlErrorKind> {
    let text = child_text(node, "coordinates")
        .ok_or_else(|| KmlErrorKind::MissingElement("coordinates".to_string()))?;
    parse_coordinates(&text)
}

/// Parse a KML coordinate string: whitespace-separated `lon,lat[,alt]`
/// tuples
///
/// KML orders ordinates longitude-first. Altitude is validated when
/// present and then discarded; the canonical model is 2-D.
fn parse_coordinates(text: &str) -> std::result::Result<Vec<Coordinate>, KmlErrorKind> {
    text.split_whitespace()
        .map(|tuple| {
            let mut parts = tuple.split(',');
            let longitude = parse_ordinate(parts.next(), tuple)?;
            let latitude = parse_ordinate(parts.next(), tuple)?;
            if let Some(altitude) = parts.next() {
                parse_ordinate(Some(altitude), tuple)?;
            }
            if parts.next().is_some() {
                return Err(KmlErrorKind::InvalidCoordinates(tuple.to_string()));
            }
            Ok(Coordinate::new(latitude, longitude))
        })
        .collect()
}

fn parse_ordinate(
    part: Option<&str>,
    tuple: &str,
) -> std::result::Result<f64, KmlErrorKind> {
    part.and_then(|v| v.trim().parse().ok())
        .ok_or_else(|| KmlErrorKind::InvalidCoordinates(tuple.to_string()))
}

fn element_named<'a, 'input>(parent: Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    parent
        .children()
        .find(|child| child.is_element() && child.tag_name().name() == tag)
}

fn child_text(node: Node<'_, '_>, tag: &str) -> Option<String> {
    element_named(node, tag)
        .and_then(|child| child.text())
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}
