//! Geoform: a place/coordinate form kept in sync with a map and a geocoder.
//!
//! The form has three inputs (longitude, latitude and place name) that stay
//! consistent with the map viewport, a Nominatim-style geocoding service and
//! the current URL. Typing a place searches for it; editing a coordinate,
//! panning or clicking the map looks up the address there; every committed
//! change becomes a bookmarkable URL.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Host (main.rs): stdin commands, map widget stand-in │  ← Entry point
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Runtime (runtime.rs)                               │  ← Effect execution
//! │  - Event queue                                      │
//! │  - EffectContext: history, map port, worker, toasts │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │  ← Update core
//! │  - Field state machine                              │
//! │  - Event handling, effects                          │
//! │  - View model computation                           │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ Router        │   │ Map boundary  │   │ Worker        │
//! │ (router/)     │   │ (map/)        │   │ (worker/)     │
//! │ - Routes      │   │ - Commands    │   │ - HTTP thread │
//! │ - History     │   │ - Echo guard  │   │ - geocode/    │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Domain (domain/): formatter, coordinates, places   │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`app`]: update core with event/effect model
//! - [`domain`]: formatter, coordinates, places, errors
//! - [`router`]: URL routes and history
//! - [`geocode`]: geocoding client and response decoding
//! - [`worker`]: background thread running geocode requests
//! - [`map`]: map widget protocol
//! - [`ui`]: view models, text rendering, localized messages
//! - [`runtime`]: effect execution
//! - [`observability`]: logging to a rotating file
//!
//! # Example
//!
//! ```
//! use geoform::{handle_event, initialize, Config, Effect, Event};
//!
//! let mut state = initialize(&Config::default());
//! let (_, effects) = handle_event(&mut state, &Event::UrlChanged("/".to_string()));
//! assert!(matches!(effects.as_slice(), [Effect::Navigate { .. }]));
//! assert_eq!(state.lon.saved, "5.3876");
//! ```

#![allow(clippy::multiple_crate_versions)]

pub mod app;
pub mod domain;
pub mod geocode;
pub mod infrastructure;
pub mod map;
pub mod observability;
pub mod router;
pub mod runtime;
pub mod ui;
pub mod worker;

pub use app::{handle_event, AppState, Effect, Event, FieldId, KeyCode};
pub use domain::{GeocodeError, GeoformError, Result};
pub use runtime::{EffectContext, Runtime};

use crate::geocode::GeocodeClient;
use crate::map::{MapPort, Viewport};
use crate::router::History;
use crate::ui::{Locale, Messages};
use crate::worker::GeocodeWorker;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Default geocoding service.
pub const DEFAULT_SERVICE_URL: &str = "https://nominatim.openstreetmap.org";

/// Application configuration.
///
/// Read from `key=value` pairs with [`Config::from_map`] or from a TOML file
/// with [`Config::from_toml_file`]; unset keys keep their defaults.
///
/// ```toml
/// service_url = "https://nominatim.openstreetmap.org"
/// locale = "nl"
/// trace_level = "debug"
///
/// [default_location]
/// lon = 5.3876
/// lat = 52.1561
/// zoom = 15
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Base URL of the geocoding service. Default: [`DEFAULT_SERVICE_URL`]
    pub service_url: String,

    /// Ask for outline geometry with every result. Default: `true`
    pub polygon_geojson: bool,

    /// Per-request timeout. Default: 10 000 ms
    pub request_timeout_ms: u64,

    /// `User-Agent` header; public Nominatim instances require one.
    pub user_agent: String,

    /// Toast and label language. Default: `en`
    pub locale: Locale,

    /// Target of the `/` route. Default: lon 5.3876, lat 52.1561, zoom 15
    pub default_location: Viewport,

    /// Log level: `trace`, `debug`, `info`, `warn`, `error`. Default: `"info"`
    pub trace_level: Option<String>,

    /// Directory for the log file. Default: [`infrastructure::get_data_dir`]
    pub data_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service_url: DEFAULT_SERVICE_URL.to_string(),
            polygon_geojson: true,
            request_timeout_ms: 10_000,
            user_agent: concat!("geoform/", env!("CARGO_PKG_VERSION")).to_string(),
            locale: Locale::En,
            default_location: Viewport::new(5.3876, 52.1561, 15.0),
            trace_level: None,
            data_dir: None,
        }
    }
}

impl Config {
    /// Parses configuration from string key/value pairs.
    ///
    /// # Parsing Rules
    ///
    /// - `service_url`, `user_agent`, `trace_level`: taken as given
    /// - `polygon_geojson`: `true`/`false`/`1`/`0`
    /// - `request_timeout_ms`: `u64`
    /// - `locale`: `en` or `nl`
    /// - `default_lon`, `default_lat`, `default_zoom`: numbers
    /// - `data_dir`: path, `~` expanded
    ///
    /// Values that fail to parse fall back to the default for that key.
    ///
    /// # Example
    ///
    /// ```
    /// use std::collections::BTreeMap;
    /// use geoform::Config;
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("locale".to_string(), "nl".to_string());
    /// map.insert("request_timeout_ms".to_string(), "soon".to_string());
    ///
    /// let config = Config::from_map(&map);
    /// assert_eq!(config.locale, geoform::ui::Locale::Nl);
    /// assert_eq!(config.request_timeout_ms, 10_000);
    /// ```
    #[must_use]
    pub fn from_map(map: &BTreeMap<String, String>) -> Self {
        let defaults = Self::default();
        let text = |key: &str| map.get(key).map(|v| v.trim()).filter(|v| !v.is_empty());
        let number = |key: &str, fallback: f64| {
            text(key)
                .and_then(|v| v.parse::<f64>().ok())
                .filter(|v| v.is_finite())
                .unwrap_or(fallback)
        };

        let polygon_geojson = match text("polygon_geojson") {
            Some("true" | "1" | "yes") => true,
            Some("false" | "0" | "no") => false,
            _ => defaults.polygon_geojson,
        };

        let home = defaults.default_location;

        Self {
            service_url: text("service_url").map_or(defaults.service_url, String::from),
            polygon_geojson,
            request_timeout_ms: text("request_timeout_ms")
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(defaults.request_timeout_ms),
            user_agent: text("user_agent").map_or(defaults.user_agent, String::from),
            locale: text("locale")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.locale),
            default_location: Viewport::new(
                number("default_lon", home.lon),
                number("default_lat", home.lat),
                number("default_zoom", home.zoom),
            ),
            trace_level: text("trace_level").map(String::from),
            data_dir: text("data_dir").map(infrastructure::expand_tilde),
        }
    }

    /// Loads configuration from a TOML file and validates it.
    ///
    /// # Errors
    ///
    /// - [`GeoformError::Io`] if the file cannot be read
    /// - [`GeoformError::Config`] if it is not valid TOML for this struct or
    ///   fails [`Config::validate`]
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&contents)
            .map_err(|e| GeoformError::Config(format!("{}: {e}", path.display())))?;
        config.data_dir = config
            .data_dir
            .map(|dir| infrastructure::expand_tilde(&dir.to_string_lossy()));
        config.validate()?;
        Ok(config)
    }

    /// Checks values the types alone cannot.
    ///
    /// # Errors
    ///
    /// Returns [`GeoformError::Config`] for an unparseable service URL or a
    /// default location outside the coordinate range.
    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.service_url)
            .map_err(|e| GeoformError::Config(format!("service_url {:?}: {e}", self.service_url)))?;
        let home = self.default_location;
        domain::Coordinate::new(home.lon, home.lat)
            .map_err(|e| GeoformError::Config(format!("default_location: {e}")))?;
        Ok(())
    }

    /// The configured data directory, or the platform default.
    #[must_use]
    pub fn resolved_data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(infrastructure::get_data_dir)
    }
}

/// Creates the initial, empty application state.
///
/// The form fills on the first `UrlChanged` event.
#[must_use]
pub fn initialize(config: &Config) -> AppState {
    tracing::debug!(locale = ?config.locale, home = ?config.default_location, "initializing geoform");
    AppState::new(config.default_location, Messages::new(config.locale))
}

/// Wires state, worker, history and map port into a [`Runtime`].
///
/// # Errors
///
/// Returns [`GeoformError::Io`] if the worker thread cannot be spawned.
pub fn launch<C: GeocodeClient + 'static>(
    config: &Config,
    client: C,
    history: Box<dyn History>,
    map: MapPort,
) -> Result<Runtime> {
    let worker = GeocodeWorker::new(client).spawn()?;
    let context = EffectContext::new(history, map, worker);
    Ok(Runtime::new(initialize(config), context))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn map_values_override_defaults_per_key() {
        let map: BTreeMap<String, String> = [
            ("service_url", "http://localhost:8080"),
            ("polygon_geojson", "0"),
            ("default_zoom", "9"),
            ("default_lat", "north"),
            ("trace_level", "debug"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let config = Config::from_map(&map);
        assert_eq!(config.service_url, "http://localhost:8080");
        assert!(!config.polygon_geojson);
        assert_eq!(config.default_location, Viewport::new(5.3876, 52.1561, 9.0));
        assert_eq!(config.trace_level.as_deref(), Some("debug"));
        assert_eq!(config.locale, Locale::En);
    }

    #[test]
    fn toml_file_is_loaded_over_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "locale = \"nl\"\nrequest_timeout_ms = 2500\n\n[default_location]\nlon = 4.9\nlat = 52.37\nzoom = 12"
        )
        .unwrap();

        let config = Config::from_toml_file(file.path()).unwrap();
        assert_eq!(config.locale, Locale::Nl);
        assert_eq!(config.request_timeout_ms, 2500);
        assert_eq!(config.default_location, Viewport::new(4.9, 52.37, 12.0));
        assert_eq!(config.service_url, DEFAULT_SERVICE_URL);
    }

    #[test]
    fn invalid_toml_values_are_config_errors() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[default_location]\nlon = 200.0\nlat = 0.0\nzoom = 3").unwrap();
        assert!(matches!(
            Config::from_toml_file(file.path()),
            Err(GeoformError::Config(_))
        ));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "colour = \"blue\"").unwrap();
        assert!(matches!(
            Config::from_toml_file(file.path()),
            Err(GeoformError::Config(_))
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            Config::from_toml_file(&dir.path().join("absent.toml")),
            Err(GeoformError::Io(_))
        ));
    }
}
