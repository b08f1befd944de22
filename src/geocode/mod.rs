//! Geocoding service access.
//!
//! - [`client`]: `GeocodeClient` trait and the `ureq`-backed `NominatimClient`
//! - [`decode`]: JSON response decoding into [`Place`](crate::domain::Place)
//!
//! Requests are issued from the background worker, never from the update
//! core itself; see [`crate::worker`].

pub mod client;
pub mod decode;

pub use client::{reverse_zoom, GeocodeClient, NominatimClient};
pub use decode::{decode_reverse, decode_search};
