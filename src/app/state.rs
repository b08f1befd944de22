//! Application state and view model computation.
//!
//! [`AppState`] is the single owner of the form: the three fields, zoom, the
//! last geometry to outline, pending candidates and the toast. Only
//! [`handle_event`](crate::app::handle_event) mutates it.
//!
//! Besides what the form shows, the state tracks bookkeeping the update core
//! needs to avoid loops and stale writes: the current URL, the last known map
//! viewport and the per-kind request sequence numbers.

use crate::app::{Effect, Field, FieldId};
use crate::domain::{Coordinate, CoordinateError, Geometry, Place};
use crate::map::Viewport;
use crate::router::render_number;
use crate::ui::messages::Messages;
use crate::ui::viewmodel::{CandidateList, FieldView, FormView};

/// Latest issued request tag per request kind.
///
/// Tags start at 1; a result is applied only if its tag is the latest issued
/// for its kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestSequences {
    forward: u64,
    reverse: u64,
}

impl RequestSequences {
    pub fn next_forward(&mut self) -> u64 {
        self.forward += 1;
        self.forward
    }

    pub fn next_reverse(&mut self) -> u64 {
        self.reverse += 1;
        self.reverse
    }

    #[must_use]
    pub const fn is_latest_forward(&self, seq: u64) -> bool {
        seq == self.forward
    }

    #[must_use]
    pub const fn is_latest_reverse(&self, seq: u64) -> bool {
        seq == self.reverse
    }
}

/// Central application state container.
#[derive(Debug, Clone)]
pub struct AppState {
    pub lon: Field,
    pub lat: Field,
    pub place: Field,

    pub zoom: f64,

    /// Geometry of the last resolved place, outlined on the map.
    pub geometry: Option<Geometry>,

    /// Results of an ambiguous search awaiting a choice.
    pub candidates: Vec<Place>,

    pub toast: Option<String>,

    /// URL of the route the state was last synchronized with.
    pub current_url: String,

    /// Where the map is, as far as the core knows. `None` until the first
    /// move or fly, and after a fit whose outcome only the widget knows.
    pub viewport: Option<Viewport>,

    pub sequences: RequestSequences,

    /// Target of the `/` route.
    pub home: Viewport,

    pub messages: Messages,
}

impl AppState {
    /// Creates an empty form; the first `UrlChanged` event fills it.
    #[must_use]
    pub fn new(home: Viewport, messages: Messages) -> Self {
        Self {
            lon: Field::new(FieldId::Lon),
            lat: Field::new(FieldId::Lat),
            place: Field::new(FieldId::Place),
            zoom: home.zoom,
            geometry: None,
            candidates: vec![],
            toast: None,
            current_url: String::new(),
            viewport: None,
            sequences: RequestSequences::default(),
            home,
            messages,
        }
    }

    #[must_use]
    pub const fn field(&self, id: FieldId) -> &Field {
        match id {
            FieldId::Lon => &self.lon,
            FieldId::Lat => &self.lat,
            FieldId::Place => &self.place,
        }
    }

    pub fn field_mut(&mut self, id: FieldId) -> &mut Field {
        match id {
            FieldId::Lon => &mut self.lon,
            FieldId::Lat => &mut self.lat,
            FieldId::Place => &mut self.place,
        }
    }

    /// The committed coordinate pair.
    ///
    /// # Errors
    ///
    /// Fails while either coordinate field is empty or, which the update core
    /// never lets happen, out of range.
    pub fn committed_coordinate(&self) -> Result<Coordinate, CoordinateError> {
        Coordinate::parse(&self.lon.saved, &self.lat.saved)
    }

    /// Commits a coordinate into both coordinate fields.
    pub fn set_coordinate(&mut self, coordinate: Coordinate) {
        self.lon.set_saved(&coordinate.lon.to_string());
        self.lat.set_saved(&coordinate.lat.to_string());
    }

    /// Records a toast and returns the effect that shows it.
    pub fn toast(&mut self, message: String) -> Effect {
        tracing::debug!(message = %message, "toast");
        self.toast = Some(message.clone());
        Effect::ShowToast(message)
    }

    /// Computes the renderable form.
    #[must_use]
    pub fn compute_viewmodel(&self) -> FormView {
        let fields = FieldId::ALL
            .iter()
            .map(|&id| {
                let field = self.field(id);
                FieldView {
                    element_id: id.element_id(),
                    label: self.messages.field_label(id),
                    text: field.displayed().to_string(),
                    focused: field.focused,
                }
            })
            .collect();

        let candidates = (!self.candidates.is_empty()).then(|| CandidateList {
            heading: self.messages.candidates_heading(),
            names: self
                .candidates
                .iter()
                .map(|place| place.display_name.clone())
                .collect(),
        });

        FormView {
            fields,
            zoom: render_number(self.zoom),
            candidates,
            toast: self.toast.clone(),
            url: self.current_url.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::messages::Locale;

    fn state() -> AppState {
        AppState::new(Viewport::new(5.3876, 52.1561, 15.0), Messages::new(Locale::En))
    }

    #[test]
    fn sequences_track_latest_per_kind() {
        let mut sequences = RequestSequences::default();
        let first = sequences.next_forward();
        let second = sequences.next_forward();
        let reverse = sequences.next_reverse();

        assert!(!sequences.is_latest_forward(first));
        assert!(sequences.is_latest_forward(second));
        assert!(sequences.is_latest_reverse(reverse));
        assert_eq!(reverse, 1);
    }

    #[test]
    fn set_coordinate_formats_fields() {
        let mut state = state();
        state.set_coordinate(Coordinate::new(5.387_612_34, -52.1).unwrap());
        assert_eq!(state.lon.saved, "5.38761");
        assert_eq!(state.lat.saved, "-52.1");
        assert_eq!(
            state.committed_coordinate(),
            Ok(Coordinate::new(5.38761, -52.1).unwrap())
        );
    }

    #[test]
    fn empty_form_has_no_coordinate() {
        assert!(state().committed_coordinate().is_err());
    }

    #[test]
    fn viewmodel_shows_typed_text_for_focused_field() {
        let mut state = state();
        state.place.set_saved("Amersfoort");
        state.place.focus();
        state.place.input("Utr");
        state.candidates = vec![Place::new(5.1, 52.1, "Utrecht")];

        let view = state.compute_viewmodel();
        assert_eq!(view.fields[2].text, "Utr");
        assert!(view.fields[2].focused);
        assert_eq!(view.zoom, "15");
        assert_eq!(
            view.candidates.map(|list| list.names),
            Some(vec!["Utrecht".to_string()])
        );
    }
}
