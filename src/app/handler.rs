//! Event handling and state transition logic.
//!
//! [`handle_event`] is the update core: every user input, URL change, map
//! notification and geocode result passes through it, mutates [`AppState`]
//! and yields the [`Effect`]s to run. It never fails; rejected input becomes
//! a reverted field or a toast.
//!
//! # Loop avoidance
//!
//! Map, fields and URL feed each other. Three rules keep that from cycling:
//!
//! 1. Outbound navigation happens only when the canonical URL differs from
//!    [`AppState::current_url`].
//! 2. A map move that lands on the committed coordinate and zoom is a no-op.
//! 3. A route only flies the map when the target differs from the last
//!    known viewport.
//!
//! # Example
//!
//! ```
//! use geoform::app::{handle_event, AppState, Effect, Event};
//! use geoform::map::Viewport;
//! use geoform::ui::messages::Messages;
//!
//! let mut state = AppState::new(Viewport::new(5.3876, 52.1561, 15.0), Messages::default());
//! let (render, effects) = handle_event(&mut state, &Event::UrlChanged("/".to_string()));
//! assert!(render);
//! assert!(matches!(effects[0], Effect::Navigate { .. }));
//! ```

use crate::app::{AppState, Effect, FieldId};
use crate::domain::{Coordinate, GeocodeError, Place, RouteError};
use crate::map::{fly_animation, same_value, Viewport};
use crate::router::{NavigationMode, Route};

/// Keys the form reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    Enter,
    Escape,
    Other,
}

/// Events from the form, the map, the router and the geocode worker.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    FieldFocus(FieldId),
    FieldInput(FieldId, String),
    FieldKeyPress(FieldId, KeyCode),
    /// The field lost focus showing `text`.
    FieldCommit(FieldId, String),

    /// The user finished panning or zooming the map.
    MapMoved { lon: f64, lat: f64, zoom: f64 },
    /// The user clicked a point on the map.
    PointClicked { lon: f64, lat: f64 },

    GeocodeResult {
        seq: u64,
        result: Result<Vec<Place>, GeocodeError>,
    },
    ReverseGeocodeResult {
        seq: u64,
        result: Result<Place, GeocodeError>,
    },

    /// The user picked entry `index` of the candidate list.
    CandidateSelected(usize),

    /// The browser location changed, by navigation or back/forward.
    UrlChanged(String),

    ToastDismissed,
}

impl Event {
    /// Short name for span fields.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::FieldFocus(_) => "field_focus",
            Self::FieldInput(..) => "field_input",
            Self::FieldKeyPress(..) => "field_key_press",
            Self::FieldCommit(..) => "field_commit",
            Self::MapMoved { .. } => "map_moved",
            Self::PointClicked { .. } => "point_clicked",
            Self::GeocodeResult { .. } => "geocode_result",
            Self::ReverseGeocodeResult { .. } => "reverse_geocode_result",
            Self::CandidateSelected(_) => "candidate_selected",
            Self::UrlChanged(_) => "url_changed",
            Self::ToastDismissed => "toast_dismissed",
        }
    }
}

/// Processes an event, mutates application state and returns effects to run.
///
/// The boolean tells the host whether the view changed and should be redrawn.
#[allow(clippy::too_many_lines)]
pub fn handle_event(state: &mut AppState, event: &Event) -> (bool, Vec<Effect>) {
    let _span = tracing::debug_span!("handle_event", event_type = event.name()).entered();

    match event {
        Event::FieldFocus(id) => {
            let select = state.field_mut(*id).focus();
            let effects = if select {
                vec![Effect::SelectText {
                    element_id: id.element_id().to_string(),
                }]
            } else {
                vec![]
            };
            (true, effects)
        }
        Event::FieldInput(id, text) => {
            state.field_mut(*id).input(text);
            tracing::trace!(field = %id, text = %text, "typed");
            (true, vec![])
        }
        Event::FieldKeyPress(id, KeyCode::Enter) => (
            false,
            vec![Effect::Blur {
                element_id: id.element_id().to_string(),
            }],
        ),
        Event::FieldKeyPress(id, KeyCode::Escape) => {
            state.field_mut(*id).cancel();
            (true, vec![])
        }
        Event::FieldKeyPress(_, KeyCode::Other) => (false, vec![]),
        Event::FieldCommit(id, text) => commit_field(state, *id, text),
        Event::MapMoved { lon, lat, zoom } => map_moved(state, *lon, *lat, *zoom),
        Event::PointClicked { lon, lat } => match Coordinate::from_viewport(*lon, *lat) {
            Ok(coordinate) => {
                state.set_coordinate(coordinate);
                tracing::debug!(lon = coordinate.lon, lat = coordinate.lat, "point clicked");
                let effects = navigate(state, Route::reverse(coordinate, state.zoom), NavigationMode::Push)
                    .into_iter()
                    .collect();
                (true, effects)
            }
            Err(error) => {
                let message = state.messages.coordinate_rejected(&error);
                (true, vec![state.toast(message)])
            }
        },
        Event::GeocodeResult { seq, result } => {
            if !state.sequences.is_latest_forward(*seq) {
                tracing::debug!(seq, "discarding stale geocode result");
                return (false, vec![]);
            }
            geocoded(state, result)
        }
        Event::ReverseGeocodeResult { seq, result } => {
            if !state.sequences.is_latest_reverse(*seq) {
                tracing::debug!(seq, "discarding stale reverse geocode result");
                return (false, vec![]);
            }
            reverse_geocoded(state, result)
        }
        Event::CandidateSelected(index) => {
            let Some(place) = state.candidates.get(*index).cloned() else {
                tracing::debug!(index, candidates = state.candidates.len(), "no such candidate");
                return (false, vec![]);
            };
            (true, select_place(state, place))
        }
        Event::UrlChanged(url) => url_changed(state, url),
        Event::ToastDismissed => {
            let had_toast = state.toast.take().is_some();
            (had_toast, vec![])
        }
    }
}

fn commit_field(state: &mut AppState, id: FieldId, text: &str) -> (bool, Vec<Effect>) {
    let field = state.field(id);
    if !field.focused && id.format(text) == field.saved {
        tracing::trace!(field = %id, "commit of unchanged idle field");
        return (false, vec![]);
    }

    match id {
        FieldId::Place => {
            let Some(query) = state.place.commit(text).map(str::to_string) else {
                tracing::debug!("empty place text, reverted");
                return (true, vec![]);
            };
            let effects = navigate(state, Route::search(query), NavigationMode::Push)
                .into_iter()
                .collect();
            (true, effects)
        }
        FieldId::Lon | FieldId::Lat => {
            let formatted = id.format(text);
            if formatted.is_empty() {
                state.field_mut(id).cancel();
                tracing::debug!(field = %id, text = %text, "unparseable coordinate, reverted");
                return (true, vec![]);
            }

            let (lon, lat) = match id {
                FieldId::Lon => (formatted.as_str(), state.lat.saved.as_str()),
                _ => (state.lon.saved.as_str(), formatted.as_str()),
            };

            match Coordinate::parse(lon, lat) {
                Ok(coordinate) => {
                    state.field_mut(id).commit(&formatted);
                    let effects = navigate(state, Route::reverse(coordinate, state.zoom), NavigationMode::Push)
                        .into_iter()
                        .collect();
                    (true, effects)
                }
                Err(error) => {
                    tracing::debug!(field = %id, error = %error, "coordinate rejected, reverted");
                    state.field_mut(id).cancel();
                    let message = state.messages.coordinate_rejected(&error);
                    (true, vec![state.toast(message)])
                }
            }
        }
    }
}

fn map_moved(state: &mut AppState, lon: f64, lat: f64, zoom: f64) -> (bool, Vec<Effect>) {
    let unchanged = state.committed_coordinate().is_ok_and(|committed| {
        same_value(committed.lon, lon) && same_value(committed.lat, lat)
    }) && same_value(state.zoom, zoom);

    if unchanged {
        tracing::trace!(lon, lat, zoom, "map already at committed position");
        state.viewport = Some(Viewport::new(lon, lat, zoom));
        return (false, vec![]);
    }

    match Coordinate::from_viewport(lon, lat) {
        Ok(coordinate) => {
            state.set_coordinate(coordinate);
            state.zoom = zoom;
            state.viewport = Some(Viewport::new(coordinate.lon, coordinate.lat, zoom));
            tracing::debug!(lon = coordinate.lon, lat = coordinate.lat, zoom, "map moved");
            let effects = navigate(state, Route::reverse(coordinate, zoom), NavigationMode::Push)
                .into_iter()
                .collect();
            (true, effects)
        }
        Err(error) => {
            let message = state.messages.coordinate_rejected(&error);
            (true, vec![state.toast(message)])
        }
    }
}

fn geocoded(state: &mut AppState, result: &Result<Vec<Place>, GeocodeError>) -> (bool, Vec<Effect>) {
    match result {
        Ok(places) if places.is_empty() => {
            state.geometry = None;
            state.candidates.clear();
            let message = state.messages.nothing_found();
            (true, vec![state.toast(message)])
        }
        Ok(places) if places.len() == 1 => {
            let effects = select_place(state, places[0].clone());
            (true, effects)
        }
        Ok(places) => {
            tracing::debug!(count = places.len(), "ambiguous search, offering candidates");
            state.candidates.clone_from(places);
            (true, vec![])
        }
        Err(error) => {
            tracing::warn!(error = %error, "geocode request failed");
            let message = state.messages.geocode_failed(error);
            (true, vec![state.toast(message)])
        }
    }
}

fn reverse_geocoded(state: &mut AppState, result: &Result<Place, GeocodeError>) -> (bool, Vec<Effect>) {
    match result {
        Ok(place) => {
            state.place.set_saved(&place.display_name);
            state.geometry.clone_from(&place.geometry);
            (true, vec![])
        }
        Err(GeocodeError::UndecodableResponse(reason)) => {
            tracing::debug!(reason = %reason, "no address at this position");
            state.place.clear();
            state.geometry = None;
            (true, vec![])
        }
        Err(error) => {
            tracing::warn!(error = %error, "reverse geocode request failed");
            state.place.clear();
            state.geometry = None;
            let message = state.messages.geocode_failed(error);
            (true, vec![state.toast(message)])
        }
    }
}

/// Commits a resolved place into the form and moves the map to it.
///
/// A place outside the coordinate range leaves the form untouched.
fn select_place(state: &mut AppState, place: Place) -> Vec<Effect> {
    let coordinate = match Coordinate::new(place.lon, place.lat) {
        Ok(coordinate) => coordinate,
        Err(error) => {
            tracing::warn!(name = %place.display_name, error = %error, "geocoder returned an invalid position");
            let message = state.messages.coordinate_rejected(&error);
            return vec![state.toast(message)];
        }
    };
    tracing::debug!(name = %place.display_name, lon = coordinate.lon, lat = coordinate.lat, "place selected");

    state.set_coordinate(coordinate);
    state.place.set_saved(&place.display_name);
    state.candidates.clear();
    state.geometry.clone_from(&place.geometry);

    match place.geometry {
        Some(geometry) if geometry.is_extended() => {
            state.viewport = None;
            vec![Effect::MapFit { geometry }]
        }
        geometry => {
            let target = Viewport::new(coordinate.lon, coordinate.lat, state.zoom);
            let animation = fly_animation(state.viewport.as_ref(), &target);
            state.viewport = Some(target);
            vec![Effect::MapFly {
                target,
                geometry,
                animation,
            }]
        }
    }
}

fn url_changed(state: &mut AppState, url: &str) -> (bool, Vec<Effect>) {
    state.current_url = url.to_string();

    match Route::parse(url) {
        Ok(Route::Home) => {
            let home = state.home;
            match Coordinate::new(home.lon, home.lat) {
                Ok(coordinate) => {
                    state.set_coordinate(coordinate);
                    state.zoom = home.zoom;
                    let effects = navigate(state, Route::reverse(coordinate, home.zoom), NavigationMode::Replace)
                        .into_iter()
                        .collect();
                    (true, effects)
                }
                Err(error) => {
                    tracing::warn!(error = %error, "home location is out of range");
                    let message = state.messages.coordinate_rejected(&error);
                    (true, vec![state.toast(message)])
                }
            }
        }
        Ok(Route::Search { query, zoom }) => {
            state.place.set_saved(&query);
            if let Some(zoom) = zoom {
                state.zoom = zoom;
            }
            state.candidates.clear();
            let seq = state.sequences.next_forward();
            tracing::debug!(seq, query = %query, "searching");
            (true, vec![Effect::HttpGeocode { seq, query }])
        }
        Ok(Route::Reverse { coordinate, zoom }) => {
            state.set_coordinate(coordinate);
            if let Some(zoom) = zoom {
                state.zoom = zoom;
            }
            state.candidates.clear();

            let seq = state.sequences.next_reverse();
            tracing::debug!(seq, lon = coordinate.lon, lat = coordinate.lat, zoom = state.zoom, "reverse geocoding");
            let mut effects = vec![Effect::HttpReverseGeocode {
                seq,
                lon: coordinate.lon,
                lat: coordinate.lat,
                zoom: state.zoom,
            }];

            let target = Viewport::new(coordinate.lon, coordinate.lat, state.zoom);
            if !state.viewport.is_some_and(|viewport| viewport.same_view(&target)) {
                let animation = fly_animation(state.viewport.as_ref(), &target);
                state.viewport = Some(target);
                effects.push(Effect::MapFly {
                    target,
                    geometry: None,
                    animation,
                });
            }
            (true, effects)
        }
        Err(error) => route_failed(state, &error),
    }
}

fn route_failed(state: &mut AppState, error: &RouteError) -> (bool, Vec<Effect>) {
    tracing::debug!(error = %error, "url rejected");
    let message = state.messages.route_rejected(error);
    let mut effects = vec![state.toast(message)];

    if matches!(error, RouteError::MissingQuery) && state.committed_coordinate().is_ok() {
        effects.push(Effect::FocusElement {
            element_id: FieldId::Place.element_id().to_string(),
        });
    } else {
        effects.extend(navigate(state, Route::Home, NavigationMode::Replace));
    }
    (true, effects)
}

/// Navigation effect for `route`, unless the URL would not change.
fn navigate(state: &AppState, route: Route, mode: NavigationMode) -> Option<Effect> {
    let url = route.to_url();
    if url == state.current_url {
        tracing::trace!(url = %url, "already at url");
        return None;
    }
    tracing::debug!(url = %url, mode = ?mode, route = route.name(), "navigating");
    Some(Effect::Navigate { route, mode })
}
