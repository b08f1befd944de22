//! URL routing between browser history and application intent.
//!
//! Inbound, a URL is parsed into a [`Route`] that the update core turns into
//! requests and field updates. Outbound, state changes are rendered back to a
//! canonical URL and pushed (or replaced) into a [`History`], but only when the
//! URL actually changes. Suppressing identical URLs is what keeps the map, the
//! fields and the address bar from triggering each other forever.
//!
//! # Modules
//!
//! - [`route`]: `Route` parsing and canonical rendering
//! - [`encode`]: `encodeURIComponent`-compatible escaping
//! - [`history`]: History trait and in-memory implementation

pub mod encode;
pub mod history;
pub mod route;

pub use encode::encode_component;
pub use history::{History, MemoryHistory, NavigationMode};
pub use route::{render_number, Route};
