//! Plain-text rendering of the form.
//!
//! The host prints the returned text; nothing here writes to stdout, so the
//! output can be asserted on directly.

use crate::app::AppState;
use crate::ui::viewmodel::FormView;
use std::fmt::Write;

/// Width of the label column.
const LABEL_WIDTH: usize = 14;

/// Renders the current state.
#[must_use]
pub fn render(state: &AppState) -> String {
    render_viewmodel(&state.compute_viewmodel())
}

/// Renders a view model, one line per element.
///
/// ```text
///   Longitude     5.3876
/// > Latitude      52.15|
///   Place         Onze Lieve Vrouwetoren
///   Zoom          15
///   URL           /reverse?lon=5.3876&lat=52.1561&zoom=15
/// ```
#[must_use]
pub fn render_viewmodel(view: &FormView) -> String {
    let mut out = String::new();

    for field in &view.fields {
        let marker = if field.focused { '>' } else { ' ' };
        let cursor = if field.focused { "|" } else { "" };
        let _ = writeln!(
            out,
            "{marker} {:<LABEL_WIDTH$}{}{cursor}",
            field.label, field.text
        );
    }
    let _ = writeln!(out, "  {:<LABEL_WIDTH$}{}", "Zoom", view.zoom);
    let _ = writeln!(out, "  {:<LABEL_WIDTH$}{}", "URL", view.url);

    if let Some(list) = &view.candidates {
        let _ = writeln!(out, "\n  {}:", list.heading);
        for (index, name) in list.names.iter().enumerate() {
            let _ = writeln!(out, "  [{}] {name}", index + 1);
        }
    }

    if let Some(toast) = &view.toast {
        let _ = writeln!(out, "\n  ! {toast}");
    }

    out
}
