//! Background worker thread for geocoding requests.
//!
//! Keeps blocking HTTP off the thread that runs the update core.
//!
//! - `messages`: tagged request/response protocol
//! - `handler`: worker loop, thread spawning and the main-thread handle

pub mod handler;
pub mod messages;

pub use handler::{GeocodeWorker, WorkerHandle};
pub use messages::{WorkerMessage, WorkerResponse};
