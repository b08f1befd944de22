//! Worker thread message types.
//!
//! Requests carry the sequence tag the update core assigned; responses carry
//! it back so stale results can be recognized.

use crate::app::Event;
use crate::domain::{GeocodeError, Place};
use serde::{Deserialize, Serialize};

/// Messages sent from the main thread to the worker thread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WorkerMessage {
    /// Forward-geocode free text.
    Search { seq: u64, query: String },

    /// Reverse-geocode a position at an integer zoom.
    Reverse { seq: u64, lon: f64, lat: f64, zoom: u8 },

    /// Stop the worker after the jobs already queued.
    Shutdown,
}

impl WorkerMessage {
    /// Short name for span fields.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Search { .. } => "search",
            Self::Reverse { .. } => "reverse",
            Self::Shutdown => "shutdown",
        }
    }
}

/// Responses sent from the worker thread back to the main thread.
#[derive(Debug, Clone, PartialEq)]
pub enum WorkerResponse {
    Searched {
        seq: u64,
        result: Result<Vec<Place>, GeocodeError>,
    },
    Reversed {
        seq: u64,
        result: Result<Place, GeocodeError>,
    },
}

impl From<WorkerResponse> for Event {
    fn from(response: WorkerResponse) -> Self {
        match response {
            WorkerResponse::Searched { seq, result } => Self::GeocodeResult { seq, result },
            WorkerResponse::Reversed { seq, result } => Self::ReverseGeocodeResult { seq, result },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn responses_become_tagged_events() {
        let event: Event = WorkerResponse::Reversed {
            seq: 4,
            result: Err(GeocodeError::Timeout),
        }
        .into();
        assert_eq!(
            event,
            Event::ReverseGeocodeResult {
                seq: 4,
                result: Err(GeocodeError::Timeout)
            }
        );
    }

    #[test]
    fn messages_serialize_for_logging() {
        let json = serde_json::to_string(&WorkerMessage::Search {
            seq: 1,
            query: "amersfoort".to_string(),
        })
        .unwrap();
        assert_eq!(json, r#"{"Search":{"seq":1,"query":"amersfoort"}}"#);
    }
}
