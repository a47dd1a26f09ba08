//! Geographic bounding rectangles

use serde::{Deserialize, Serialize};

use crate::geometry::Coordinate;

/// An axis-aligned bounding rectangle in WGS84 degrees
///
/// Union is associative and commutative, so an aggregate rectangle can be
/// accumulated in any order with the same result.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingRect {
    /// Southernmost latitude
    pub min_latitude: f64,
    /// Northernmost latitude
    pub max_latitude: f64,
    /// Westernmost longitude
    pub min_longitude: f64,
    /// Easternmost longitude
    pub max_longitude: f64,
}

impl BoundingRect {
    /// The degenerate rectangle containing a single coordinate
    #[inline]
    #[must_use]
    pub fn from_coordinate(coordinate: Coordinate) -> Self {
        Self {
            min_latitude: coordinate.latitude,
            max_latitude: coordinate.latitude,
            min_longitude: coordinate.longitude,
            max_longitude: coordinate.longitude,
        }
    }

    /// The smallest rectangle containing every coordinate, or `None` for
    /// an empty sequence
    #[must_use]
    pub fn from_coordinates<I>(coordinates: I) -> Option<Self>
    where
        I: IntoIterator<Item = Coordinate>,
    {
        let mut iter = coordinates.into_iter();
        let mut rect = Self::from_coordinate(iter.next()?);
        for coordinate in iter {
            rect.extend(coordinate);
        }
        Some(rect)
    }

    /// Grow the rectangle to contain `coordinate`
    #[inline]
    pub fn extend(&mut self, coordinate: Coordinate) {
        self.min_latitude = self.min_latitude.min(coordinate.latitude);
        self.max_latitude = self.max_latitude.max(coordinate.latitude);
        self.min_longitude = self.min_longitude.min(coordinate.longitude);
        self.max_longitude = self.max_longitude.max(coordinate.longitude);
    }

    /// The smallest rectangle containing both rectangles
    #[inline]
    #[must_use]
    pub fn union(self, other: Self) -> Self {
        Self {
            min_latitude: self.min_latitude.min(other.min_latitude),
            max_latitude: self.max_latitude.max(other.max_latitude),
            min_longitude: self.min_longitude.min(other.min_longitude),
            max_longitude: self.max_longitude.max(other.max_longitude),
        }
    }

    /// Union of an optional accumulator with a new rectangle
    #[inline]
    #[must_use]
    pub fn union_opt(acc: Option<Self>, rect: Self) -> Option<Self> {
        Some(match acc {
            Some(existing) => existing.union(rect),
            None => rect,
        })
    }

    /// True if `coordinate` lies inside or on the edge of the rectangle
    #[inline]
    #[must_use]
    pub fn contains(&self, coordinate: Coordinate) -> bool {
        (self.min_latitude..=self.max_latitude).contains(&coordinate.latitude)
            && (self.min_longitude..=self.max_longitude).contains(&coordinate.longitude)
    }
}
