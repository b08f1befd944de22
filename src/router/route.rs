//! Route parsing and canonical URL rendering.

use crate::domain::format::format;
use crate::domain::{Coordinate, RouteError};
use crate::router::encode::encode_component;
use std::collections::HashMap;
use url::Url;

/// Origin used to resolve relative URLs; only path and query are kept.
const BASE_URL: &str = "http://localhost/";

/// Application intent addressed by a URL.
#[derive(Debug, Clone, PartialEq)]
pub enum Route {
    /// `/`: reverse-geocode the configured default location.
    Home,

    /// `/search?query=<text>[&zoom=<float>]`: forward-geocode `query`.
    Search {
        query: String,
        zoom: Option<f64>,
    },

    /// `/reverse?lon=<float>&lat=<float>[&zoom=<float>]`: reverse-geocode a position.
    Reverse {
        coordinate: Coordinate,
        zoom: Option<f64>,
    },
}

impl Route {
    /// Builds a search route without a zoom parameter.
    #[must_use]
    pub fn search(query: impl Into<String>) -> Self {
        Self::Search {
            query: query.into(),
            zoom: None,
        }
    }

    /// Builds a reverse route with an explicit zoom.
    #[must_use]
    pub const fn reverse(coordinate: Coordinate, zoom: f64) -> Self {
        Self::Reverse {
            coordinate,
            zoom: Some(zoom),
        }
    }

    /// Parses a path-and-query string (or an absolute URL) into a route.
    ///
    /// Trailing slashes are ignored and parameter order does not matter.
    /// Unknown parameters are ignored.
    ///
    /// # Errors
    ///
    /// - [`RouteError::Malformed`] if the text is not a URL reference
    /// - [`RouteError::UnknownPath`] for paths other than `/`, `/search`, `/reverse`
    /// - [`RouteError::MissingQuery`] for a search without non-empty `query`
    /// - [`RouteError::MissingParameter`] / [`RouteError::InvalidNumber`] for
    ///   absent or unparseable `lon`, `lat` or `zoom`
    /// - [`RouteError::OutOfRange`] for coordinates outside the valid range
    ///
    /// # Examples
    ///
    /// ```
    /// use geoform::router::Route;
    ///
    /// let route = Route::parse("/search?query=amersfoort").unwrap();
    /// assert_eq!(route, Route::search("amersfoort"));
    /// assert!(Route::parse("/reverse?lon=200&lat=0").is_err());
    /// ```
    pub fn parse(url: &str) -> Result<Self, RouteError> {
        let malformed = || RouteError::Malformed(url.to_string());
        let base = Url::parse(BASE_URL).map_err(|_| malformed())?;
        let parsed = base.join(url.trim()).map_err(|_| malformed())?;

        let params: HashMap<String, String> = parsed.query_pairs().into_owned().collect();

        match parsed.path().trim_end_matches('/') {
            "" => Ok(Self::Home),
            "/search" => {
                let query = params
                    .get("query")
                    .map(|q| q.trim())
                    .filter(|q| !q.is_empty())
                    .ok_or(RouteError::MissingQuery)?;
                Ok(Self::Search {
                    query: query.to_string(),
                    zoom: optional_number(&params, "zoom")?,
                })
            }
            "/reverse" => {
                let lon = required_number(&params, "lon")?;
                let lat = required_number(&params, "lat")?;
                Ok(Self::Reverse {
                    coordinate: Coordinate::new(lon, lat)?,
                    zoom: optional_number(&params, "zoom")?,
                })
            }
            other => Err(RouteError::UnknownPath(other.to_string())),
        }
    }

    /// Renders the canonical path-and-query for this route.
    ///
    /// Numbers go through the coordinate formatter, so two routes whose
    /// coordinates agree to five decimals render identically. A search zoom
    /// is accepted by [`Route::parse`] but never rendered.
    ///
    /// # Examples
    ///
    /// ```
    /// use geoform::domain::Coordinate;
    /// use geoform::router::Route;
    ///
    /// let route = Route::reverse(Coordinate::new(5.3876, 52.1561).unwrap(), 15.0);
    /// assert_eq!(route.to_url(), "/reverse?lon=5.3876&lat=52.1561&zoom=15");
    /// ```
    #[must_use]
    pub fn to_url(&self) -> String {
        match self {
            Self::Home => "/".to_string(),
            Self::Search { query, .. } => format!("/search?query={}", encode_component(query)),
            Self::Reverse { coordinate, zoom } => {
                let mut url = format!(
                    "/reverse?lon={}&lat={}",
                    render_number(coordinate.lon),
                    render_number(coordinate.lat)
                );
                if let Some(zoom) = zoom {
                    url.push_str(&format!("&zoom={}", render_number(*zoom)));
                }
                url
            }
        }
    }

    /// Short name for log fields.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Search { .. } => "search",
            Self::Reverse { .. } => "reverse",
        }
    }
}

/// Renders a number the way the coordinate fields display it.
#[must_use]
pub fn render_number(value: f64) -> String {
    format(&value.to_string())
}

fn required_number(params: &HashMap<String, String>, param: &'static str) -> Result<f64, RouteError> {
    optional_number(params, param)?.ok_or(RouteError::MissingParameter(param))
}

fn optional_number(
    params: &HashMap<String, String>,
    param: &'static str,
) -> Result<Option<f64>, RouteError> {
    params
        .get(param)
        .map(|value| {
            value
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .ok_or_else(|| RouteError::InvalidNumber {
                    param,
                    value: value.clone(),
                })
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CoordinateError;

    fn coordinate(lon: f64, lat: f64) -> Coordinate {
        Coordinate::new(lon, lat).unwrap()
    }

    #[test]
    fn parses_home_with_and_without_slash() {
        assert_eq!(Route::parse("/"), Ok(Route::Home));
        assert_eq!(Route::parse(""), Ok(Route::Home));
        assert_eq!(Route::parse("http://localhost:8000/"), Ok(Route::Home));
    }

    #[test]
    fn parses_encoded_search_query() {
        let route = Route::parse("/search?query=onze%20lieve%20vrouwetoren%2C%20amersfoort&zoom=12");
        assert_eq!(
            route,
            Ok(Route::Search {
                query: "onze lieve vrouwetoren, amersfoort".to_string(),
                zoom: Some(12.0),
            })
        );
    }

    #[test]
    fn search_requires_query() {
        assert_eq!(Route::parse("/search"), Err(RouteError::MissingQuery));
        assert_eq!(Route::parse("/search?query=%20%20"), Err(RouteError::MissingQuery));
    }

    #[test]
    fn parses_reverse_in_any_parameter_order() {
        assert_eq!(
            Route::parse("/reverse/?zoom=8&lat=52.1561&lon=5.3876"),
            Ok(Route::Reverse {
                coordinate: coordinate(5.3876, 52.1561),
                zoom: Some(8.0),
            })
        );
    }

    #[test]
    fn reverse_validates_parameters() {
        assert_eq!(
            Route::parse("/reverse?lat=1"),
            Err(RouteError::MissingParameter("lon"))
        );
        assert_eq!(
            Route::parse("/reverse?lon=x&lat=1"),
            Err(RouteError::InvalidNumber {
                param: "lon",
                value: "x".to_string()
            })
        );
        assert_eq!(
            Route::parse("/reverse?lon=1&lat=-91"),
            Err(RouteError::OutOfRange(CoordinateError::LatitudeOutOfRange(-91.0)))
        );
        assert_eq!(
            Route::parse("/reverse?lon=1&lat=1&zoom=far"),
            Err(RouteError::InvalidNumber {
                param: "zoom",
                value: "far".to_string()
            })
        );
    }

    #[test]
    fn rejects_unknown_path() {
        assert_eq!(
            Route::parse("/directions?from=a"),
            Err(RouteError::UnknownPath("/directions".to_string()))
        );
    }

    #[test]
    fn renders_search_with_component_encoding() {
        assert_eq!(
            Route::search("onze lieve vrouwetoren, amersfoort").to_url(),
            "/search?query=onze%20lieve%20vrouwetoren%2C%20amersfoort"
        );
    }

    #[test]
    fn search_zoom_is_not_rendered() {
        let route = Route::Search {
            query: "utrecht".to_string(),
            zoom: Some(9.0),
        };
        assert_eq!(route.to_url(), "/search?query=utrecht");
    }

    #[test]
    fn reverse_url_round_trips_to_formatting_precision() {
        let route = Route::reverse(coordinate(-122.4194155, 37.7749295), 11.5);
        let url = route.to_url();
        assert_eq!(url, "/reverse?lon=-122.41942&lat=37.77493&zoom=11.5");

        let Ok(Route::Reverse { coordinate: parsed, zoom }) = Route::parse(&url) else {
            panic!("expected reverse route from {url}");
        };
        assert_eq!(render_number(parsed.lon), "-122.41942");
        assert_eq!(render_number(parsed.lat), "37.77493");
        assert_eq!(zoom, Some(11.5));
        assert_eq!(Route::reverse(parsed, 11.5).to_url(), url);
    }
}
