//! Side effects requested by the update core.
//!
//! [`handle_event`](crate::app::handle_event) never performs I/O. It returns
//! a list of [`Effect`]s which the runtime executes in order against the
//! injected [`EffectContext`](crate::runtime::EffectContext): the geocode
//! worker, the map port, the history and the toast sink.

use crate::domain::Geometry;
use crate::map::{FlyAnimation, MapCommand, Viewport};
use crate::router::{NavigationMode, Route};

/// Commands representing side effects to be executed by the runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Forward-geocode free text.
    HttpGeocode {
        /// Request tag; only the latest forward result is applied.
        seq: u64,
        query: String,
    },

    /// Reverse-geocode a position.
    HttpReverseGeocode {
        /// Request tag; only the latest reverse result is applied.
        seq: u64,
        lon: f64,
        lat: f64,
        zoom: f64,
    },

    /// Animate the map to a viewport.
    MapFly {
        target: Viewport,
        geometry: Option<Geometry>,
        animation: FlyAnimation,
    },

    /// Frame the map to a geometry's bounds.
    MapFit { geometry: Geometry },

    /// Push or replace a history entry for `route`.
    ///
    /// Only emitted when the canonical URL differs from the current one.
    Navigate { route: Route, mode: NavigationMode },

    ShowToast(String),

    FocusElement { element_id: String },

    /// Select all text of an element.
    SelectText { element_id: String },

    /// Blur an element; the host answers with a commit of its displayed text.
    Blur { element_id: String },
}

impl Effect {
    /// The map boundary command this effect maps to, if any.
    #[must_use]
    pub fn map_command(&self) -> Option<MapCommand> {
        match self {
            Self::MapFly {
                target,
                geometry,
                animation,
            } => Some(MapCommand::Fly {
                target: *target,
                geometry: geometry.clone(),
                animation: *animation,
            }),
            Self::MapFit { geometry } => Some(MapCommand::Fit {
                geometry: geometry.clone(),
            }),
            Self::SelectText { element_id } => Some(MapCommand::SelectText {
                element_id: element_id.clone(),
            }),
            _ => None,
        }
    }

    /// Short name for log fields.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::HttpGeocode { .. } => "http_geocode",
            Self::HttpReverseGeocode { .. } => "http_reverse_geocode",
            Self::MapFly { .. } => "map_fly",
            Self::MapFit { .. } => "map_fit",
            Self::Navigate { .. } => "navigate",
            Self::ShowToast(_) => "show_toast",
            Self::FocusElement { .. } => "focus_element",
            Self::SelectText { .. } => "select_text",
            Self::Blur { .. } => "blur",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_effects_become_map_commands() {
        let fly = Effect::MapFly {
            target: Viewport::new(1.0, 2.0, 3.0),
            geometry: None,
            animation: FlyAnimation {
                duration_ms: 300,
                skip_flourish: true,
            },
        };
        assert!(matches!(fly.map_command(), Some(MapCommand::Fly { .. })));
        assert!(Effect::ShowToast("x".to_string()).map_command().is_none());
        assert_eq!(
            Effect::SelectText {
                element_id: "place".to_string()
            }
            .map_command(),
            Some(MapCommand::SelectText {
                element_id: "place".to_string()
            })
        );
    }
}
