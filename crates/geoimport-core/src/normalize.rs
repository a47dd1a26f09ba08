//! Geometry normalization
//!
//! Decoders emit a flat sequence of [`Decoded`] items; normalization
//! assembles them into the final [`GeoData`]: points pass through,
//! lines and areas are grouped into multi-geometry overlays keyed by
//! resolved color, and the aggregate bounding rectangle is computed
//! incrementally.

use crate::bounds::BoundingRect;
use crate::geometry::{GeoData, MultiPolygon, MultiPolyline, Point, Polygon, Polyline};

/// One decoded geometry, already carrying its derived display attributes
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    /// An annotated location
    Point(Point),
    /// A stroke geometry
    Line(Polyline),
    /// An area geometry
    Area(Polygon),
}

/// Assemble the canonical aggregate from a decoder's output
///
/// Grouping is order-preserving: the first occurrence of a color
/// determines its group's position, and members keep input order within
/// the group. The grouping key is color value equality (including
/// "no color"), never object identity.
#[must_use = "assembling produces the aggregate handed to the caller"]
pub fn assemble(decoded: Vec<Decoded>) -> GeoData {
    let mut points = Vec::new();
    let mut lines: Vec<Polyline> = Vec::new();
    let mut areas: Vec<Polygon> = Vec::new();

    for item in decoded {
        match item {
            Decoded::Point(point) => points.push(point),
            Decoded::Line(line) => lines.push(line),
            Decoded::Area(area) => areas.push(area),
        }
    }

    let mut bounds = BoundingRect::from_coordinates(points.iter().map(|p| p.coordinate));
    for rect in lines.iter().filter_map(Polyline::bounds) {
        bounds = BoundingRect::union_opt(bounds, rect);
    }
    for rect in areas.iter().filter_map(Polygon::bounds) {
        bounds = BoundingRect::union_opt(bounds, rect);
    }

    let multi_polylines = group_by_color(
        lines,
        |line| line.color.clone(),
        |color, lines| MultiPolyline { color, lines },
    );
    let multi_polygons = group_by_color(
        areas,
        |polygon| polygon.color.clone(),
        |color, polygons| MultiPolygon { color, polygons },
    );

    GeoData {
        points,
        multi_polylines,
        multi_polygons,
        bounds,
    }
}

/// Order-preserving grouping by color key
///
/// A linear scan over the open groups instead of a hash map: color sets
/// per file are tiny, and first-seen ordering falls out for free.
fn group_by_color<T, G>(
    items: Vec<T>,
    key: impl Fn(&T) -> Option<String>,
    build: impl Fn(Option<String>, Vec<T>) -> G,
) -> Vec<G> {
    let mut groups: Vec<(Option<String>, Vec<T>)> = Vec::new();
    for item in items {
        let color = key(&item);
        match groups.iter_mut().find(|(c, _)| *c == color) {
            Some((_, members)) => members.push(item),
            None => groups.push((color, vec![item])),
        }
    }
    groups
        .into_iter()
        .map(|(color, members)| build(color, members))
        .collect()
}
