//! Domain layer for geoform.
//!
//! Core value types and pure functions, independent of the event loop, the
//! HTTP client or the map widget.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`format`]: Coordinate text normalization
//! - [`coordinate`]: Validated longitude/latitude pairs
//! - [`place`]: Geocoding results and GeoJSON geometry
//!
//! # Examples
//!
//! ```
//! use geoform::domain::{format::format, Coordinate};
//!
//! let lon = format("5.387612");
//! let lat = format("52.156111");
//! let coordinate = Coordinate::parse(&lon, &lat)?;
//! assert_eq!(coordinate.lat, 52.15611);
//! # Ok::<(), geoform::domain::CoordinateError>(())
//! ```

pub mod coordinate;
pub mod error;
pub mod format;
pub mod place;

pub use coordinate::Coordinate;
pub use error::{CoordinateError, GeocodeError, GeoformError, Result, RouteError};
pub use place::{BoundingBox, Geometry, Place};
