//! Effect execution.
//!
//! [`Runtime`] owns the [`AppState`] and an [`EffectContext`], the explicit
//! bundle of everything effects touch: history, the map port, the geocode
//! worker and the toast queue. Events are applied one at a time; effects that
//! answer with new events (navigation, blur, focus) enqueue them, and the
//! queue is drained before [`Runtime::dispatch`] returns.

use crate::app::{handle_event, AppState, Effect, Event, FieldId};
use crate::domain::GeocodeError;
use crate::geocode::reverse_zoom;
use crate::map::MapPort;
use crate::router::History;
use crate::worker::{WorkerHandle, WorkerMessage};
use crossbeam_channel::RecvTimeoutError;
use std::collections::VecDeque;
use std::time::Duration;

/// Collaborators the effect layer acts on.
pub struct EffectContext {
    pub history: Box<dyn History>,
    pub map: MapPort,
    pub worker: WorkerHandle,
    /// Toasts shown since the host last took them.
    pub toasts: Vec<String>,
}

impl EffectContext {
    #[must_use]
    pub fn new(history: Box<dyn History>, map: MapPort, worker: WorkerHandle) -> Self {
        Self {
            history,
            map,
            worker,
            toasts: vec![],
        }
    }

    /// Removes and returns pending toasts.
    pub fn take_toasts(&mut self) -> Vec<String> {
        std::mem::take(&mut self.toasts)
    }
}

/// Update loop driver.
pub struct Runtime {
    state: AppState,
    context: EffectContext,
    queue: VecDeque<Event>,
}

impl Runtime {
    #[must_use]
    pub fn new(state: AppState, context: EffectContext) -> Self {
        Self {
            state,
            context,
            queue: VecDeque::new(),
        }
    }

    #[must_use]
    pub const fn state(&self) -> &AppState {
        &self.state
    }

    #[must_use]
    pub const fn context(&self) -> &EffectContext {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut EffectContext {
        &mut self.context
    }

    /// Synchronizes with the history's current URL.
    pub fn start(&mut self) -> bool {
        let url = self.context.history.current().to_string();
        self.dispatch(Event::UrlChanged(url))
    }

    /// Applies `event` and every event its effects cause.
    ///
    /// Returns whether any step changed the view.
    pub fn dispatch(&mut self, event: Event) -> bool {
        self.queue.push_back(event);
        let mut render = false;

        while let Some(event) = self.queue.pop_front() {
            let (changed, effects) = handle_event(&mut self.state, &event);
            render |= changed;
            for effect in effects {
                self.execute(effect);
            }
        }
        render
    }

    /// Opens `url` as if typed into the address bar or followed as a link.
    pub fn visit(&mut self, url: &str) -> bool {
        self.context.history.push(url.to_string());
        self.dispatch(Event::UrlChanged(url.to_string()))
    }

    /// Steps back in history.
    pub fn back(&mut self) -> bool {
        let Some(url) = self.context.history.back().map(str::to_string) else {
            return false;
        };
        self.dispatch(Event::UrlChanged(url))
    }

    /// Steps forward in history.
    pub fn forward(&mut self) -> bool {
        let Some(url) = self.context.history.forward().map(str::to_string) else {
            return false;
        };
        self.dispatch(Event::UrlChanged(url))
    }

    /// Applies every worker response and map notification already waiting.
    pub fn pump(&mut self) -> bool {
        let mut render = false;
        let responses: Vec<_> = self.context.worker.responses().try_iter().collect();
        for response in responses {
            render |= self.dispatch(response.into());
        }
        for notification in self.context.map.pending() {
            render |= self.dispatch(notification.into());
        }
        render
    }

    /// Waits up to `timeout` for one worker response and applies it.
    ///
    /// Returns `None` on timeout or if the worker is gone.
    pub fn wait_for_worker(&mut self, timeout: Duration) -> Option<bool> {
        match self.context.worker.responses().recv_timeout(timeout) {
            Ok(response) => Some(self.dispatch(response.into())),
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => None,
        }
    }

    fn execute(&mut self, effect: Effect) {
        tracing::trace!(effect = effect.name(), "executing effect");

        if let Some(command) = effect.map_command() {
            if let Err(e) = self.context.map.send(command) {
                tracing::warn!(error = %e, "map command dropped");
            }
            return;
        }

        match effect {
            Effect::HttpGeocode { seq, query } => {
                if let Err(e) = self.context.worker.post(WorkerMessage::Search { seq, query }) {
                    self.queue.push_back(Event::GeocodeResult {
                        seq,
                        result: Err(GeocodeError::NetworkUnavailable(e.to_string())),
                    });
                }
            }
            Effect::HttpReverseGeocode { seq, lon, lat, zoom } => {
                let message = WorkerMessage::Reverse {
                    seq,
                    lon,
                    lat,
                    zoom: reverse_zoom(zoom),
                };
                if let Err(e) = self.context.worker.post(message) {
                    self.queue.push_back(Event::ReverseGeocodeResult {
                        seq,
                        result: Err(GeocodeError::NetworkUnavailable(e.to_string())),
                    });
                }
            }
            Effect::Navigate { route, mode } => {
                let url = route.to_url();
                self.context.history.navigate(url.clone(), mode);
                self.queue.push_back(Event::UrlChanged(url));
            }
            Effect::ShowToast(message) => self.context.toasts.push(message),
            Effect::FocusElement { element_id } => {
                if let Some(id) = element(&element_id) {
                    self.queue.push_back(Event::FieldFocus(id));
                }
            }
            Effect::Blur { element_id } => {
                if let Some(id) = element(&element_id) {
                    let text = self.state.field(id).displayed().to_string();
                    self.queue.push_back(Event::FieldCommit(id, text));
                }
            }
            Effect::MapFly { .. } | Effect::MapFit { .. } | Effect::SelectText { .. } => {}
        }
    }
}

fn element(element_id: &str) -> Option<FieldId> {
    match element_id.parse() {
        Ok(id) => Some(id),
        Err(e) => {
            tracing::warn!(element_id, error = %e, "effect targets unknown element");
            None
        }
    }
}
