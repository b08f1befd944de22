//! Geocode worker thread.
//!
//! HTTP requests block, so they run on a dedicated thread. The update core
//! never waits on them: the runtime posts a [`WorkerMessage`] and later
//! receives the tagged [`WorkerResponse`] as an ordinary event. Jobs run one at
//! a time in arrival order; superseded results are filtered by the update core
//! through their sequence tags, not cancelled here.

use crate::domain::error::{GeoformError, Result};
use crate::geocode::GeocodeClient;
use crate::worker::{WorkerMessage, WorkerResponse};
use crossbeam_channel::{Receiver, Sender};
use std::thread::JoinHandle;

/// Worker state: the client used for every job.
#[derive(Debug)]
pub struct GeocodeWorker<C> {
    client: C,
}

impl<C: GeocodeClient> GeocodeWorker<C> {
    pub const fn new(client: C) -> Self {
        Self { client }
    }

    /// Runs one job. `Shutdown` yields no response.
    pub fn handle_message(&self, message: WorkerMessage) -> Option<WorkerResponse> {
        let span = tracing::debug_span!("worker_handle_message", message_type = message.name());
        let _guard = span.entered();

        match message {
            WorkerMessage::Search { seq, query } => {
                let result = self.client.search(&query);
                match &result {
                    Ok(places) => tracing::debug!(seq, results = places.len(), "search finished"),
                    Err(e) => tracing::debug!(seq, error = %e, "search failed"),
                }
                Some(WorkerResponse::Searched { seq, result })
            }
            WorkerMessage::Reverse { seq, lon, lat, zoom } => {
                let result = self.client.reverse(lon, lat, zoom);
                match &result {
                    Ok(place) => tracing::debug!(seq, name = %place.display_name, "reverse finished"),
                    Err(e) => tracing::debug!(seq, error = %e, "reverse failed"),
                }
                Some(WorkerResponse::Reversed { seq, result })
            }
            WorkerMessage::Shutdown => None,
        }
    }

    /// Processes jobs until `Shutdown` or until either channel closes.
    pub fn run(&self, jobs: &Receiver<WorkerMessage>, responses: &Sender<WorkerResponse>) {
        for message in jobs {
            if message == WorkerMessage::Shutdown {
                tracing::debug!("worker shutting down");
                break;
            }
            let Some(response) = self.handle_message(message) else {
                continue;
            };
            if responses.send(response).is_err() {
                tracing::debug!("response receiver gone, worker exiting");
                break;
            }
        }
    }
}

impl<C: GeocodeClient + 'static> GeocodeWorker<C> {
    /// Spawns the worker on its own thread.
    ///
    /// # Errors
    ///
    /// Returns [`GeoformError::Io`] if the thread cannot be spawned.
    pub fn spawn(self) -> Result<WorkerHandle> {
        let (job_tx, job_rx) = crossbeam_channel::unbounded();
        let (response_tx, response_rx) = crossbeam_channel::unbounded();

        let thread = std::thread::Builder::new()
            .name("geocode-worker".to_string())
            .spawn(move || self.run(&job_rx, &response_tx))?;

        Ok(WorkerHandle {
            jobs: job_tx,
            responses: response_rx,
            thread: Some(thread),
        })
    }
}

/// Main-thread handle to a running worker.
#[derive(Debug)]
pub struct WorkerHandle {
    jobs: Sender<WorkerMessage>,
    responses: Receiver<WorkerResponse>,
    thread: Option<JoinHandle<()>>,
}

impl WorkerHandle {
    /// Queues a job.
    ///
    /// # Errors
    ///
    /// Returns [`GeoformError::Worker`] if the worker thread has exited.
    pub fn post(&self, message: WorkerMessage) -> Result<()> {
        tracing::debug!(message_type = message.name(), "posting to worker");
        self.jobs
            .send(message)
            .map_err(|e| GeoformError::Worker(format!("worker exited: {e}")))
    }

    /// Receiver for responses, for use in `select!`.
    #[must_use]
    pub const fn responses(&self) -> &Receiver<WorkerResponse> {
        &self.responses
    }

    /// Stops the worker and waits for it to finish its current job.
    ///
    /// # Errors
    ///
    /// Returns [`GeoformError::Worker`] if the worker thread panicked.
    pub fn shutdown(mut self) -> Result<()> {
        self.stop()
    }

    fn stop(&mut self) -> Result<()> {
        let Some(thread) = self.thread.take() else {
            return Ok(());
        };
        // The worker may already be gone; joining still reports a panic.
        let _ = self.jobs.send(WorkerMessage::Shutdown);
        thread
            .join()
            .map_err(|_| GeoformError::Worker("worker thread panicked".to_string()))
    }
}

impl Drop for WorkerHandle {
    fn drop(&mut self) {
        if let Err(e) = self.stop() {
            tracing::warn!(error = %e, "worker did not stop cleanly");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{GeocodeError, Place};
    use std::time::Duration;

    struct FixedClient;

    impl GeocodeClient for FixedClient {
        fn search(&self, query: &str) -> std::result::Result<Vec<Place>, GeocodeError> {
            Ok(vec![Place::new(5.3876, 52.1561, query)])
        }

        fn reverse(&self, _lon: f64, _lat: f64, zoom: u8) -> std::result::Result<Place, GeocodeError> {
            if zoom > 17 {
                Err(GeocodeError::UndecodableResponse("no address".to_string()))
            } else {
                Ok(Place::new(0.0, 0.0, "somewhere"))
            }
        }
    }

    #[test]
    fn handle_message_keeps_sequence_tag() {
        let worker = GeocodeWorker::new(FixedClient);
        let response = worker.handle_message(WorkerMessage::Reverse {
            seq: 9,
            lon: 0.0,
            lat: 0.0,
            zoom: 18,
        });
        assert_eq!(
            response,
            Some(WorkerResponse::Reversed {
                seq: 9,
                result: Err(GeocodeError::UndecodableResponse("no address".to_string())),
            })
        );
        assert_eq!(worker.handle_message(WorkerMessage::Shutdown), None);
    }

    #[test]
    fn spawned_worker_answers_in_order() {
        let handle = GeocodeWorker::new(FixedClient).spawn().unwrap();
        handle
            .post(WorkerMessage::Search {
                seq: 1,
                query: "amersfoort".to_string(),
            })
            .unwrap();
        handle
            .post(WorkerMessage::Reverse {
                seq: 1,
                lon: 5.0,
                lat: 52.0,
                zoom: 15,
            })
            .unwrap();

        let timeout = Duration::from_secs(5);
        let first = handle.responses().recv_timeout(timeout).unwrap();
        let second = handle.responses().recv_timeout(timeout).unwrap();
        assert!(matches!(first, WorkerResponse::Searched { seq: 1, .. }));
        assert!(matches!(second, WorkerResponse::Reversed { seq: 1, result: Ok(_) }));

        handle.shutdown().unwrap();
    }
}
