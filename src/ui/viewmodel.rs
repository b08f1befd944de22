//! View model types representing renderable form state.
//!
//! View models are created via `AppState::compute_viewmodel()` and consumed by
//! the renderer. They contain no logic, only display-ready data.

/// Complete view model of the form.
#[derive(Debug, Clone, PartialEq)]
pub struct FormView {
    /// Inputs in display order: longitude, latitude, place.
    pub fields: Vec<FieldView>,

    /// Zoom rendered the way the URL shows it.
    pub zoom: String,

    /// Pending candidates, present only while a choice is open.
    pub candidates: Option<CandidateList>,

    pub toast: Option<String>,

    /// Canonical URL of the current route.
    pub url: String,
}

/// Display information for one input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldView {
    pub element_id: &'static str,
    pub label: &'static str,
    /// Typed text while focused, saved text otherwise.
    pub text: String,
    pub focused: bool,
}

/// Candidate list shown after an ambiguous search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateList {
    pub heading: &'static str,
    /// Display names, in service order.
    pub names: Vec<String>,
}
