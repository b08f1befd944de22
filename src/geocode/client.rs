//! HTTP client for a Nominatim-compatible geocoding service.
//!
//! The [`GeocodeClient`] trait is the seam the background worker talks to.
//! [`NominatimClient`] implements it with blocking `ureq` requests; tests
//! substitute canned implementations.

use crate::domain::{GeocodeError, Place};
use crate::geocode::decode::{decode_reverse, decode_search};
use crate::Config;
use std::time::Duration;
use url::Url;

/// Highest zoom level the reverse endpoint distinguishes.
const MAX_REVERSE_ZOOM: f64 = 18.0;

/// Forward and reverse geocoding operations.
///
/// Implementations are moved onto the worker thread, hence `Send`.
pub trait GeocodeClient: Send {
    /// Resolves free text to zero or more places.
    ///
    /// # Errors
    ///
    /// Returns the [`GeocodeError`] kind matching the transport or decode failure.
    fn search(&self, query: &str) -> Result<Vec<Place>, GeocodeError>;

    /// Resolves a position to the nearest addressable place.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::UndecodableResponse`] when the service has no
    /// address for the position, other kinds for transport failures.
    fn reverse(&self, lon: f64, lat: f64, zoom: u8) -> Result<Place, GeocodeError>;
}

/// Maps a map zoom level to the integer detail level of the reverse endpoint.
#[must_use]
pub fn reverse_zoom(zoom: f64) -> u8 {
    if zoom.is_nan() {
        return 0;
    }
    // Clamped to 0..=18 first, so the cast cannot truncate.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let level = zoom.round().clamp(0.0, MAX_REVERSE_ZOOM) as u8;
    level
}

/// Blocking client for `/search` and `/reverse` on a Nominatim service.
pub struct NominatimClient {
    base_url: String,
    polygon_geojson: bool,
    user_agent: String,
    agent: ureq::Agent,
}

impl NominatimClient {
    /// Creates a client from the service settings in `config`.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build();
        Self {
            base_url: config.service_url.trim_end_matches('/').to_string(),
            polygon_geojson: config.polygon_geojson,
            user_agent: config.user_agent.clone(),
            agent,
        }
    }

    /// Builds an endpoint URL with the common `format`/`polygon_geojson` parameters.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::InvalidUrl`] if the configured base URL is not a URL.
    pub fn endpoint(&self, path: &str, params: &[(&str, String)]) -> Result<Url, GeocodeError> {
        let mut url = Url::parse(&format!("{}/{path}", self.base_url))
            .map_err(|e| GeocodeError::InvalidUrl(format!("{}: {e}", self.base_url)))?;
        {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in params {
                pairs.append_pair(key, value);
            }
            pairs.append_pair("format", "json");
            if self.polygon_geojson {
                pairs.append_pair("polygon_geojson", "1");
            }
        }
        Ok(url)
    }

    fn fetch(&self, url: &Url) -> Result<String, GeocodeError> {
        tracing::debug!(url = %url, "geocode request");

        let response = self
            .agent
            .get(url.as_str())
            .set("User-Agent", &self.user_agent)
            .call()
            .map_err(classify)?;

        response.into_string().map_err(|e| classify_io(&e))
    }
}

impl GeocodeClient for NominatimClient {
    fn search(&self, query: &str) -> Result<Vec<Place>, GeocodeError> {
        let url = self.endpoint("search", &[("q", query.to_string())])?;
        let body = self.fetch(&url)?;
        let places = decode_search(&body)?;
        tracing::debug!(query = %query, results = places.len(), "search decoded");
        Ok(places)
    }

    fn reverse(&self, lon: f64, lat: f64, zoom: u8) -> Result<Place, GeocodeError> {
        let url = self.endpoint(
            "reverse",
            &[
                ("lon", lon.to_string()),
                ("lat", lat.to_string()),
                ("zoom", zoom.to_string()),
            ],
        )?;
        let body = self.fetch(&url)?;
        decode_reverse(&body)
    }
}

impl std::fmt::Debug for NominatimClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NominatimClient")
            .field("base_url", &self.base_url)
            .field("polygon_geojson", &self.polygon_geojson)
            .finish_non_exhaustive()
    }
}

fn classify(error: ureq::Error) -> GeocodeError {
    match error {
        ureq::Error::Status(code, response) => GeocodeError::BadStatus {
            code,
            message: response.status_text().to_string(),
        },
        ureq::Error::Transport(transport) => match transport.kind() {
            ureq::ErrorKind::InvalidUrl
            | ureq::ErrorKind::UnknownScheme
            | ureq::ErrorKind::InvalidProxyUrl => GeocodeError::InvalidUrl(transport.to_string()),
            ureq::ErrorKind::Io if is_timeout(&transport) => GeocodeError::Timeout,
            _ => GeocodeError::NetworkUnavailable(transport.to_string()),
        },
    }
}

fn is_timeout(transport: &ureq::Transport) -> bool {
    std::error::Error::source(transport)
        .and_then(|source| source.downcast_ref::<std::io::Error>())
        .is_some_and(|e| is_timeout_kind(e.kind()))
}

fn classify_io(error: &std::io::Error) -> GeocodeError {
    if is_timeout_kind(error.kind()) {
        GeocodeError::Timeout
    } else {
        GeocodeError::NetworkUnavailable(error.to_string())
    }
}

const fn is_timeout_kind(kind: std::io::ErrorKind) -> bool {
    matches!(kind, std::io::ErrorKind::TimedOut | std::io::ErrorKind::WouldBlock)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(service_url: &str, polygon_geojson: bool) -> NominatimClient {
        NominatimClient::new(&Config {
            service_url: service_url.to_string(),
            polygon_geojson,
            ..Config::default()
        })
    }

    #[test]
    fn search_endpoint_carries_query_and_format() {
        let url = client("https://geo.example.org/", true)
            .endpoint("search", &[("q", "amersfoort, nl".to_string())])
            .unwrap();
        assert_eq!(url.path(), "/search");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                ("q".to_string(), "amersfoort, nl".to_string()),
                ("format".to_string(), "json".to_string()),
                ("polygon_geojson".to_string(), "1".to_string()),
            ]
        );
    }

    #[test]
    fn polygon_parameter_is_optional() {
        let url = client("https://geo.example.org", false)
            .endpoint("reverse", &[("zoom", "10".to_string())])
            .unwrap();
        assert_eq!(url.query(), Some("zoom=10&format=json"));
    }

    #[test]
    fn invalid_base_url_is_reported() {
        let result = client("not a url", false).endpoint("search", &[]);
        assert!(matches!(result, Err(GeocodeError::InvalidUrl(_))));
    }

    #[test]
    fn reverse_zoom_is_rounded_and_clamped() {
        assert_eq!(reverse_zoom(14.6), 15);
        assert_eq!(reverse_zoom(-2.0), 0);
        assert_eq!(reverse_zoom(21.0), 18);
        assert_eq!(reverse_zoom(f64::NAN), 0);
    }

    #[test]
    fn io_timeouts_are_classified() {
        let timeout = std::io::Error::new(std::io::ErrorKind::TimedOut, "timed out");
        assert_eq!(classify_io(&timeout), GeocodeError::Timeout);
        let reset = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset");
        assert!(matches!(classify_io(&reset), GeocodeError::NetworkUnavailable(_)));
    }
}
