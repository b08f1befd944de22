//! Geocoding results and their GeoJSON geometry.
//!
//! A [`Place`] is transient: it lives in the candidate list or in a single
//! update step and is dropped once its values are committed to the fields.

use serde::{Deserialize, Serialize};

/// A `[lon, lat]` GeoJSON position.
pub type Position = [f64; 2];

/// The GeoJSON geometry kinds returned with `polygon_geojson=1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "coordinates")]
pub enum Geometry {
    Point(Position),
    MultiPoint(Vec<Position>),
    LineString(Vec<Position>),
    MultiLineString(Vec<Vec<Position>>),
    Polygon(Vec<Vec<Position>>),
    MultiPolygon(Vec<Vec<Vec<Position>>>),
}

/// Axis-aligned bounds of a geometry in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl BoundingBox {
    fn around(position: Position) -> Self {
        Self {
            west: position[0],
            south: position[1],
            east: position[0],
            north: position[1],
        }
    }

    fn extend(mut self, position: Position) -> Self {
        self.west = self.west.min(position[0]);
        self.south = self.south.min(position[1]);
        self.east = self.east.max(position[0]);
        self.north = self.north.max(position[1]);
        self
    }

    /// Center of the box as `[lon, lat]`.
    #[must_use]
    pub fn center(&self) -> Position {
        [(self.west + self.east) / 2.0, (self.south + self.north) / 2.0]
    }
}

impl Geometry {
    /// Whether the geometry covers more than a point, so the map should frame
    /// it instead of flying to a single position.
    #[must_use]
    pub const fn is_extended(&self) -> bool {
        !matches!(self, Self::Point(_))
    }

    /// Computes the bounding box, or `None` for a geometry without positions.
    #[must_use]
    pub fn bounds(&self) -> Option<BoundingBox> {
        let mut positions = self.positions();
        let first = positions.next()?;
        Some(positions.fold(BoundingBox::around(first), BoundingBox::extend))
    }

    fn positions(&self) -> Box<dyn Iterator<Item = Position> + '_> {
        match self {
            Self::Point(p) => Box::new(std::iter::once(*p)),
            Self::MultiPoint(ps) | Self::LineString(ps) => Box::new(ps.iter().copied()),
            Self::MultiLineString(lines) | Self::Polygon(lines) => {
                Box::new(lines.iter().flatten().copied())
            }
            Self::MultiPolygon(polygons) => {
                Box::new(polygons.iter().flatten().flatten().copied())
            }
        }
    }
}

/// A decoded geocoding result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub lon: f64,
    pub lat: f64,
    pub display_name: String,
    pub geometry: Option<Geometry>,
}

impl Place {
    #[must_use]
    pub fn new(lon: f64, lat: f64, display_name: impl Into<String>) -> Self {
        Self {
            lon,
            lat,
            display_name: display_name.into(),
            geometry: None,
        }
    }

    #[must_use]
    pub fn with_geometry(mut self, geometry: Geometry) -> Self {
        self.geometry = Some(geometry);
        self
    }
}
