//! Geographic coordinates and range validation.

use crate::domain::error::CoordinateError;
use serde::{Deserialize, Serialize};

/// Longitude bounds in degrees.
pub const LON_RANGE: std::ops::RangeInclusive<f64> = -180.0..=180.0;

/// Latitude bounds in degrees.
pub const LAT_RANGE: std::ops::RangeInclusive<f64> = -90.0..=90.0;

/// A validated WGS84 position.
///
/// Construction through [`Coordinate::new`] or [`Coordinate::parse`] rejects
/// anything outside the bounds; nothing is clamped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Longitude in degrees, within [`LON_RANGE`].
    pub lon: f64,
    /// Latitude in degrees, within [`LAT_RANGE`].
    pub lat: f64,
}

impl Coordinate {
    /// Validates a longitude/latitude pair.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinateError::LongitudeOutOfRange`] or
    /// [`CoordinateError::LatitudeOutOfRange`] for values outside the bounds,
    /// including non-finite values.
    pub fn new(lon: f64, lat: f64) -> Result<Self, CoordinateError> {
        if !LON_RANGE.contains(&lon) {
            return Err(CoordinateError::LongitudeOutOfRange(lon));
        }
        if !LAT_RANGE.contains(&lat) {
            return Err(CoordinateError::LatitudeOutOfRange(lat));
        }
        Ok(Self { lon, lat })
    }

    /// Parses and validates a pair of text values.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinateError::NotANumber`] if either text is not a finite
    /// number, otherwise the range errors of [`Coordinate::new`].
    ///
    /// # Examples
    ///
    /// ```
    /// use geoform::domain::Coordinate;
    ///
    /// let c = Coordinate::parse("5.3876", "52.1561").unwrap();
    /// assert_eq!(c.lon, 5.3876);
    /// assert!(Coordinate::parse("5.3876", "91").is_err());
    /// ```
    pub fn parse(lon: &str, lat: &str) -> Result<Self, CoordinateError> {
        Self::new(parse_degrees(lon)?, parse_degrees(lat)?)
    }

    /// Builds a coordinate from a map viewport position.
    ///
    /// Map widgets report unwrapped longitudes after panning across the
    /// antimeridian (e.g. `190.0`); those are wrapped back into range before
    /// validation. Latitude is never adjusted.
    ///
    /// # Errors
    ///
    /// Returns a range error for an out-of-range latitude or non-finite input.
    pub fn from_viewport(lon: f64, lat: f64) -> Result<Self, CoordinateError> {
        if !lon.is_finite() {
            return Err(CoordinateError::LongitudeOutOfRange(lon));
        }
        let wrapped = if LON_RANGE.contains(&lon) {
            lon
        } else {
            (lon + 180.0).rem_euclid(360.0) - 180.0
        };
        Self::new(wrapped, lat)
    }
}

fn parse_degrees(text: &str) -> Result<f64, CoordinateError> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| CoordinateError::NotANumber(text.to_string()))
}
