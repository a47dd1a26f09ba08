//! Canonical geometry model
//!
//! Every supported input format collapses into the same small set of
//! entities: [`Point`], [`Polyline`], [`Polygon`], and the same-colored
//! groupings [`MultiPolyline`] and [`MultiPolygon`]. All entities are
//! immutable after construction; constructors enforce the model
//! invariants (a polyline has at least 2 coordinates, a polygon has an
//! exterior ring of at least 3), so degenerate inputs are dropped during
//! decode instead of surfacing as geometry.

use serde::{Deserialize, Serialize};

use crate::bounds::BoundingRect;

/// A WGS84 coordinate in double-precision degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees, positive north
    pub latitude: f64,
    /// Longitude in degrees, positive east
    pub longitude: f64,
}

impl Coordinate {
    /// Construct from latitude/longitude degrees
    #[inline]
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// A single annotated location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Location of the point
    pub coordinate: Coordinate,
    /// Display title, if the source feature carried one
    pub title: Option<String>,
    /// Display subtitle, if the source feature carried one
    pub subtitle: Option<String>,
    /// 1-based position when the point came from an ordered waypoint
    /// list and the ordering is meaningful for display
    pub index: Option<u32>,
}

impl Point {
    /// A point with no display metadata
    #[inline]
    #[must_use]
    pub fn new(coordinate: Coordinate) -> Self {
        Self {
            coordinate,
            title: None,
            subtitle: None,
            index: None,
        }
    }
}

/// An ordered run of at least two coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    /// Vertices in document order
    pub coordinates: Vec<Coordinate>,
    /// Resolved stroke color grouping key, if any
    pub color: Option<String>,
    /// Display labels, sorted ascending by length
    pub labels: Vec<String>,
}

impl Polyline {
    /// Build a polyline, returning `None` for fewer than 2 coordinates
    ///
    /// Labels are sorted ascending by string length for deterministic
    /// presentation; the sort is stable, so equal-length labels keep
    /// their input order.
    #[must_use]
    pub fn new(
        coordinates: Vec<Coordinate>,
        color: Option<String>,
        mut labels: Vec<String>,
    ) -> Option<Self> {
        if coordinates.len() < 2 {
            return None;
        }
        labels.sort_by_key(String::len);
        Some(Self {
            coordinates,
            color,
            labels,
        })
    }

    /// The smallest rectangle containing every vertex
    #[inline]
    #[must_use]
    pub fn bounds(&self) -> Option<BoundingRect> {
        BoundingRect::from_coordinates(self.coordinates.iter().copied())
    }
}

/// An area bounded by one exterior ring and zero or more holes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    /// Exterior ring, at least 3 coordinates
    pub exterior: Vec<Coordinate>,
    /// Interior (hole) rings
    pub interiors: Vec<Vec<Coordinate>>,
    /// Resolved stroke color grouping key, if any
    pub color: Option<String>,
}

impl Polygon {
    /// Build a polygon, returning `None` for an exterior ring with fewer
    /// than 3 coordinates
    ///
    /// Interior rings are only meaningful paired with the exterior;
    /// degenerate interior rings are dropped.
    #[must_use]
    pub fn new(
        exterior: Vec<Coordinate>,
        interiors: Vec<Vec<Coordinate>>,
        color: Option<String>,
    ) -> Option<Self> {
        if exterior.len() < 3 {
            return None;
        }
        let interiors = interiors
            .into_iter()
            .filter(|ring| ring.len() >= 3)
            .collect();
        Some(Self {
            exterior,
            interiors,
            color,
        })
    }

    /// The smallest rectangle containing the exterior ring
    ///
    /// Holes lie inside the exterior by definition, so they cannot grow
    /// the rectangle.
    #[inline]
    #[must_use]
    pub fn bounds(&self) -> Option<BoundingRect> {
        BoundingRect::from_coordinates(self.exterior.iter().copied())
    }
}

/// Polylines sharing one resolved color, rendered as a single overlay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiPolyline {
    /// The shared grouping color (possibly "no color")
    pub color: Option<String>,
    /// Member lines in input order; never empty
    pub lines: Vec<Polyline>,
}

/// Polygons sharing one resolved color, rendered as a single overlay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiPolygon {
    /// The shared grouping color (possibly "no color")
    pub color: Option<String>,
    /// Member polygons in input order; never empty
    pub polygons: Vec<Polygon>,
}

/// The canonical aggregate handed to consumers
///
/// Carries no format-specific residue: a consumer renders or stores the
/// same structure whether the source was GeoJSON, GPX or KML.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeoData {
    /// All annotated point locations
    pub points: Vec<Point>,
    /// Line overlays, grouped by color in first-seen order
    pub multi_polylines: Vec<MultiPolyline>,
    /// Area overlays, grouped by color in first-seen order
    pub multi_polygons: Vec<MultiPolygon>,
    /// Union of all member bounds; `None` iff the aggregate is empty
    pub bounds: Option<BoundingRect>,
}

impl GeoData {
    /// True iff all three collections are empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty() && self.multi_polylines.is_empty() && self.multi_polygons.is_empty()
    }
}
