//! Map boundary protocol.
//!
//! The map widget is an external collaborator. The core talks to it through
//! a small message protocol: [`MapCommand`] flows out, [`MapNotification`]
//! flows in. [`port`] provides the channel pair and the widget-side guard that
//! keeps the widget from echoing its own programmatic moves back as user
//! moves.
//!
//! ```text
//!   update core ──MapCommand──▶ MapPort ═══▶ MapEndpoint ──▶ widget
//!   update core ◀──Event─────── MapPort ◀═══ MapEndpoint ◀── moveend / click
//! ```

pub mod port;

pub use port::{channel, MapEndpoint, MapPort};

use crate::app::Event;
use crate::domain::Geometry;
use crate::domain::format::equivalent;
use serde::{Deserialize, Serialize};

/// Duration of a long animated jump.
pub const LONG_FLY_MS: u32 = 2000;

/// Duration of a short pan.
pub const SHORT_PAN_MS: u32 = 300;

/// Largest center shift, in degrees, still animated as a short pan.
pub const SHORT_PAN_DEGREES: f64 = 1.0;

/// Map center and zoom.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub lon: f64,
    pub lat: f64,
    pub zoom: f64,
}

impl Viewport {
    #[must_use]
    pub const fn new(lon: f64, lat: f64, zoom: f64) -> Self {
        Self { lon, lat, zoom }
    }

    /// Equality at display precision: what the fields and URL would show.
    #[must_use]
    pub fn same_view(&self, other: &Self) -> bool {
        same_value(self.lon, other.lon)
            && same_value(self.lat, other.lat)
            && same_value(self.zoom, other.zoom)
    }
}

/// Compares two numbers at display precision.
#[must_use]
pub fn same_value(a: f64, b: f64) -> bool {
    equivalent(&a.to_string(), &b.to_string())
}

/// How a fly animation should run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlyAnimation {
    pub duration_ms: u32,
    /// Skip the zoom-out/zoom-in flourish of a long jump.
    pub skip_flourish: bool,
}

/// Picks the animation for a move from `from` to `to`.
///
/// Moves at the same zoom that shift the center by less than
/// [`SHORT_PAN_DEGREES`] on both axes are short pans; anything else, or a
/// move from an unknown viewport, is a long fly.
#[must_use]
pub fn fly_animation(from: Option<&Viewport>, to: &Viewport) -> FlyAnimation {
    let short = from.is_some_and(|from| {
        same_value(from.zoom, to.zoom)
            && (from.lon - to.lon).abs() < SHORT_PAN_DEGREES
            && (from.lat - to.lat).abs() < SHORT_PAN_DEGREES
    });

    if short {
        FlyAnimation {
            duration_ms: SHORT_PAN_MS,
            skip_flourish: true,
        }
    } else {
        FlyAnimation {
            duration_ms: LONG_FLY_MS,
            skip_flourish: false,
        }
    }
}

/// Commands sent from the core to the map widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum MapCommand {
    /// Animate pan and zoom to a target, optionally outlining a geometry.
    Fly {
        target: Viewport,
        geometry: Option<Geometry>,
        animation: FlyAnimation,
    },

    /// Frame the viewport to the bounds of a geometry.
    Fit { geometry: Geometry },

    /// Select all text in a form element.
    SelectText { element_id: String },
}

impl MapCommand {
    /// Whether executing the command moves the viewport programmatically.
    #[must_use]
    pub const fn moves_viewport(&self) -> bool {
        matches!(self, Self::Fly { .. } | Self::Fit { .. })
    }
}

/// Notifications sent from the map widget to the core.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "notification", rename_all = "snake_case")]
pub enum MapNotification {
    /// The user finished panning or zooming.
    Moved { lon: f64, lat: f64, zoom: f64 },

    /// The user clicked a point on the map.
    PointClicked { lon: f64, lat: f64 },
}

impl From<MapNotification> for Event {
    fn from(notification: MapNotification) -> Self {
        match notification {
            MapNotification::Moved { lon, lat, zoom } => Self::MapMoved { lon, lat, zoom },
            MapNotification::PointClicked { lon, lat } => Self::PointClicked { lon, lat },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_origin_is_a_long_fly() {
        let animation = fly_animation(None, &Viewport::new(5.0, 52.0, 15.0));
        assert_eq!(animation.duration_ms, LONG_FLY_MS);
        assert!(!animation.skip_flourish);
    }

    #[test]
    fn nearby_move_at_same_zoom_is_a_short_pan() {
        let from = Viewport::new(5.38, 52.15, 15.0);
        let animation = fly_animation(Some(&from), &Viewport::new(5.39, 52.16, 15.0));
        assert_eq!(animation.duration_ms, SHORT_PAN_MS);
        assert!(animation.skip_flourish);
    }

    #[test]
    fn zoom_change_or_far_move_is_a_long_fly() {
        let from = Viewport::new(5.38, 52.15, 15.0);
        assert_eq!(
            fly_animation(Some(&from), &Viewport::new(5.38, 52.15, 10.0)).duration_ms,
            LONG_FLY_MS
        );
        assert_eq!(
            fly_animation(Some(&from), &Viewport::new(4.9, 50.0, 15.0)).duration_ms,
            LONG_FLY_MS
        );
    }

    #[test]
    fn same_view_ignores_sub_precision_noise() {
        let a = Viewport::new(5.387_600_1, 52.1561, 15.0);
        let b = Viewport::new(5.3876, 52.156_100_2, 15.0);
        assert!(a.same_view(&b));
        assert!(!a.same_view(&Viewport::new(5.3877, 52.1561, 15.0)));
    }

    #[test]
    fn notifications_become_events() {
        let event: Event = MapNotification::Moved { lon: 1.0, lat: 2.0, zoom: 3.0 }.into();
        assert_eq!(event, Event::MapMoved { lon: 1.0, lat: 2.0, zoom: 3.0 });
    }
}
