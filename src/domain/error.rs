//! Error types for the geoform core.
//!
//! This module defines the crate-level error type [`GeoformError`] with its
//! [`Result`] alias, plus the narrower error enums that travel inside events:
//! [`GeocodeError`] for geocoding service failures, [`CoordinateError`] for
//! rejected coordinate candidates and [`RouteError`] for malformed URLs. All
//! errors are implemented using the `thiserror` crate.
//!
//! None of these errors is fatal. The update core converts every one of them
//! into either a reverted field or a toast message.

use thiserror::Error;

/// The main error type for geoform operations outside the update core.
///
/// Covers configuration loading, filesystem access and the plumbing between
/// the host and the background geocode worker.
///
/// # Examples
///
/// ```
/// use geoform::GeoformError;
///
/// fn validate_config() -> Result<(), GeoformError> {
///     Err(GeoformError::Config("service_url must not be empty".to_string()))
/// }
/// ```
#[derive(Debug, Error)]
pub enum GeoformError {
    /// Configuration is invalid or could not be parsed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Communication with the background geocode worker failed.
    ///
    /// Occurs when the worker thread has exited and its channel is closed.
    #[error("Worker communication error: {0}")]
    Worker(String),

    /// The map widget side of the boundary is gone.
    #[error("Map boundary error: {0}")]
    Map(String),
}

/// A specialized `Result` type for geoform operations.
pub type Result<T> = std::result::Result<T, GeoformError>;

/// Failure kinds of a forward or reverse geocoding request.
///
/// The variants mirror what a browser HTTP layer can report. The update core
/// treats [`GeocodeError::UndecodableResponse`] on a reverse lookup as "no
/// address here" rather than as a failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeocodeError {
    /// The request URL could not be built from the configured service URL.
    #[error("invalid service URL: {0}")]
    InvalidUrl(String),

    /// The service did not answer within the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// The service could not be reached at all.
    #[error("network unavailable: {0}")]
    NetworkUnavailable(String),

    /// The service answered with a non-success status code.
    #[error("bad status {code}: {message}")]
    BadStatus {
        /// HTTP status code.
        code: u16,
        /// Status text or short body excerpt.
        message: String,
    },

    /// The response body did not have the expected shape.
    #[error("undecodable response: {0}")]
    UndecodableResponse(String),
}

/// Reasons a coordinate candidate is rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoordinateError {
    /// Text that does not parse as a finite number.
    #[error("not a number: {0:?}")]
    NotANumber(String),

    /// Longitude outside `[-180, 180]`.
    #[error("longitude {0} out of range [-180, 180]")]
    LongitudeOutOfRange(f64),

    /// Latitude outside `[-90, 90]`.
    #[error("latitude {0} out of range [-90, 90]")]
    LatitudeOutOfRange(f64),
}

/// Reasons a URL cannot be mapped to a route.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RouteError {
    /// The URL could not be parsed at all.
    #[error("malformed URL {0:?}")]
    Malformed(String),

    /// The path matches none of `/`, `/search`, `/reverse`.
    #[error("unknown path {0:?}")]
    UnknownPath(String),

    /// `/search` without a non-empty `query` parameter.
    #[error("missing search query")]
    MissingQuery,

    /// A required numeric parameter is absent.
    #[error("missing parameter {0:?}")]
    MissingParameter(&'static str),

    /// A numeric parameter does not parse as a finite number.
    #[error("parameter {param:?} is not a number: {value:?}")]
    InvalidNumber {
        /// Query parameter name.
        param: &'static str,
        /// Raw parameter value.
        value: String,
    },

    /// The coordinate parameters are outside the valid range.
    #[error(transparent)]
    OutOfRange(#[from] CoordinateError),
}
