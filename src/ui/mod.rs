//! Presentation: view models, text rendering and localized messages.
//!
//! ```text
//! AppState → compute_viewmodel → FormView → render → text
//! ```
//!
//! # Modules
//!
//! - [`viewmodel`]: view model types representing renderable form state
//! - [`renderer`]: plain-text rendering
//! - [`messages`]: toast and label texts per locale

pub mod messages;
pub mod renderer;
pub mod viewmodel;

pub use messages::{Locale, Messages};
pub use renderer::{render, render_viewmodel};
pub use viewmodel::{CandidateList, FieldView, FormView};
