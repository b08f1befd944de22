//! Application layer: form state, events and the update core.
//!
//! The application layer follows a unidirectional data flow pattern:
//!
//! ```text
//! Form / Map / URL → Event → handle_event → AppState mutation → Effects
//!                      ↑                                          ↓
//!                      └──── geocode results, URL changes ◀── runtime
//! ```
//!
//! # Modules
//!
//! - [`fields`]: `FieldId` and the per-input edit state machine
//! - [`effects`]: side effects emitted by the update core
//! - [`handler`]: event processing and state transitions
//! - [`state`]: central state container and view model computation

pub mod effects;
pub mod fields;
pub mod handler;
pub mod state;

pub use effects::Effect;
pub use fields::{Field, FieldId};
pub use handler::{handle_event, Event, KeyCode};
pub use state::{AppState, RequestSequences};
