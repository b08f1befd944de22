//! Channel pair connecting the core to a map widget.
//!
//! [`MapPort`] is the core side, [`MapEndpoint`] the widget side. The endpoint
//! carries the one-shot "ignore next moveend" flag: it is armed whenever a
//! command moves the viewport, and swallows the move-end the widget reports
//! when that programmatic animation finishes.

use crate::domain::error::{GeoformError, Result};
use crate::map::{MapCommand, MapNotification};
use crossbeam_channel::{Receiver, Sender, TryRecvError};

/// Creates a connected port/endpoint pair.
#[must_use]
pub fn channel() -> (MapPort, MapEndpoint) {
    let (command_tx, command_rx) = crossbeam_channel::unbounded();
    let (notification_tx, notification_rx) = crossbeam_channel::unbounded();

    let port = MapPort {
        commands: command_tx,
        notifications: notification_rx,
    };
    let endpoint = MapEndpoint {
        commands: command_rx,
        notifications: notification_tx,
        ignore_next_moveend: false,
    };
    (port, endpoint)
}

/// Core side of the map boundary.
#[derive(Debug, Clone)]
pub struct MapPort {
    commands: Sender<MapCommand>,
    notifications: Receiver<MapNotification>,
}

impl MapPort {
    /// Sends a command to the widget.
    ///
    /// # Errors
    ///
    /// Returns [`GeoformError::Map`] if the widget side has been dropped.
    pub fn send(&self, command: MapCommand) -> Result<()> {
        tracing::debug!(command = ?command, "map command");
        self.commands
            .send(command)
            .map_err(|e| GeoformError::Map(format!("widget disconnected: {e}")))
    }

    /// Receiver for widget notifications, for use in `select!`.
    #[must_use]
    pub const fn notifications(&self) -> &Receiver<MapNotification> {
        &self.notifications
    }

    /// Drains pending notifications without blocking.
    #[must_use]
    pub fn pending(&self) -> Vec<MapNotification> {
        self.notifications.try_iter().collect()
    }
}

/// Widget side of the map boundary.
#[derive(Debug)]
pub struct MapEndpoint {
    commands: Receiver<MapCommand>,
    notifications: Sender<MapNotification>,
    ignore_next_moveend: bool,
}

impl MapEndpoint {
    /// Takes the next pending command, arming the move-end guard for
    /// commands that move the viewport.
    ///
    /// Returns `None` when no command is pending or the core side is gone.
    pub fn next_command(&mut self) -> Option<MapCommand> {
        match self.commands.try_recv() {
            Ok(command) => {
                if command.moves_viewport() {
                    self.ignore_next_moveend = true;
                }
                Some(command)
            }
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    /// Reports that the viewport stopped moving.
    ///
    /// The first move-end after a programmatic move is swallowed; every other
    /// one is forwarded to the core. Returns whether it was forwarded.
    pub fn move_ended(&mut self, lon: f64, lat: f64, zoom: f64) -> bool {
        if std::mem::take(&mut self.ignore_next_moveend) {
            tracing::trace!(lon, lat, zoom, "suppressed move-end of programmatic move");
            return false;
        }
        self.notify(MapNotification::Moved { lon, lat, zoom })
    }

    /// Reports a click on the map.
    pub fn clicked(&self, lon: f64, lat: f64) -> bool {
        self.notify(MapNotification::PointClicked { lon, lat })
    }

    fn notify(&self, notification: MapNotification) -> bool {
        self.notifications.send(notification).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::{FlyAnimation, Viewport};

    fn fly() -> MapCommand {
        MapCommand::Fly {
            target: Viewport::new(5.3876, 52.1561, 15.0),
            geometry: None,
            animation: FlyAnimation {
                duration_ms: 2000,
                skip_flourish: false,
            },
        }
    }

    #[test]
    fn programmatic_move_end_is_swallowed_once() {
        let (port, mut endpoint) = channel();
        port.send(fly()).unwrap();
        assert_eq!(endpoint.next_command(), Some(fly()));

        assert!(!endpoint.move_ended(5.3876, 52.1561, 15.0));
        assert!(endpoint.move_ended(5.4, 52.2, 15.0));
        assert_eq!(
            port.pending(),
            vec![MapNotification::Moved { lon: 5.4, lat: 52.2, zoom: 15.0 }]
        );
    }

    #[test]
    fn select_text_does_not_arm_guard() {
        let (port, mut endpoint) = channel();
        port.send(MapCommand::SelectText {
            element_id: "place".to_string(),
        })
        .unwrap();
        assert!(endpoint.next_command().is_some());
        assert!(endpoint.move_ended(1.0, 2.0, 3.0));
    }

    #[test]
    fn send_fails_once_widget_is_gone() {
        let (port, endpoint) = channel();
        drop(endpoint);
        assert!(matches!(port.send(fly()), Err(GeoformError::Map(_))));
    }
}
