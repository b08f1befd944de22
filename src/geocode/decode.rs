//! Decoding of geocoding service responses.
//!
//! Forward search answers with a JSON array, reverse lookup with a single
//! object. Both carry `lon`/`lat` as numeric strings. A reverse lookup over
//! open water answers with `{"error": "Unable to geocode"}`, which fails to
//! decode and surfaces as [`GeocodeError::UndecodableResponse`].

use crate::domain::{GeocodeError, Geometry, Place};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct RawPlace {
    lon: String,
    lat: String,
    display_name: String,
    #[serde(default)]
    geojson: Option<serde_json::Value>,
}

impl RawPlace {
    fn into_place(self) -> Result<Place, GeocodeError> {
        let lon = parse_number("lon", &self.lon)?;
        let lat = parse_number("lat", &self.lat)?;

        // Unsupported geometry kinds only lose the outline, not the place.
        let geometry = self.geojson.and_then(|value| {
            serde_json::from_value::<Geometry>(value)
                .map_err(|e| tracing::debug!(error = %e, "ignoring unsupported geometry"))
                .ok()
        });

        Ok(Place {
            lon,
            lat,
            display_name: self.display_name,
            geometry,
        })
    }
}

fn parse_number(field: &str, text: &str) -> Result<f64, GeocodeError> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .ok_or_else(|| GeocodeError::UndecodableResponse(format!("{field} is not a number: {text:?}")))
}

fn undecodable(e: &serde_json::Error) -> GeocodeError {
    GeocodeError::UndecodableResponse(e.to_string())
}

/// Decodes a forward search response body.
///
/// # Errors
///
/// Returns [`GeocodeError::UndecodableResponse`] if the body is not an array
/// of places or any entry has non-numeric coordinates.
pub fn decode_search(body: &str) -> Result<Vec<Place>, GeocodeError> {
    let raw: Vec<RawPlace> = serde_json::from_str(body).map_err(|e| undecodable(&e))?;
    raw.into_iter().map(RawPlace::into_place).collect()
}

/// Decodes a reverse lookup response body.
///
/// # Errors
///
/// Returns [`GeocodeError::UndecodableResponse`] if the body is not a single
/// place, which includes the service's "nothing here" error object.
pub fn decode_reverse(body: &str) -> Result<Place, GeocodeError> {
    let raw: RawPlace = serde_json::from_str(body).map_err(|e| undecodable(&e))?;
    raw.into_place()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_search_results() {
        let body = r#"[
            {"place_id": 1, "lon": "5.3876", "lat": "52.1561",
             "display_name": "Onze Lieve Vrouwetoren, Amersfoort",
             "geojson": {"type": "Point", "coordinates": [5.3876, 52.1561]}},
            {"lon": "5.39", "lat": "52.15", "display_name": "Amersfoort"}
        ]"#;
        let places = decode_search(body).unwrap();
        assert_eq!(places.len(), 2);
        assert_eq!(places[0].lon, 5.3876);
        assert_eq!(places[0].geometry, Some(Geometry::Point([5.3876, 52.1561])));
        assert_eq!(places[1].display_name, "Amersfoort");
        assert_eq!(places[1].geometry, None);
    }

    #[test]
    fn empty_search_is_not_an_error() {
        assert!(decode_search("[]").unwrap().is_empty());
    }

    #[test]
    fn reverse_error_object_is_undecodable() {
        let result = decode_reverse(r#"{"error": "Unable to geocode"}"#);
        assert!(matches!(result, Err(GeocodeError::UndecodableResponse(_))));
    }

    #[test]
    fn non_numeric_coordinates_are_undecodable() {
        let result = decode_reverse(r#"{"lon": "east", "lat": "1", "display_name": "x"}"#);
        assert!(matches!(result, Err(GeocodeError::UndecodableResponse(_))));
    }

    #[test]
    fn unsupported_geometry_is_dropped() {
        let body = r#"{"lon": "1", "lat": "2", "display_name": "x",
                       "geojson": {"type": "GeometryCollection", "geometries": []}}"#;
        let place = decode_reverse(body).unwrap();
        assert_eq!(place.geometry, None);
    }
}
