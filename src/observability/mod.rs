//! Logging to a rotating file.
//!
//! ```text
//! tracing macros → EnvFilter → fmt layer → FileWriter → <data dir>/geoform.log
//! ```
//!
//! The file rotates at 10 MB and keeps 3 backups. The level comes from
//! `RUST_LOG`, then the `trace_level` config option, then `"info"`.
//!
//! # Modules
//!
//! - [`init`]: subscriber setup
//! - [`file_writer`]: rotating file writer

mod file_writer;
mod init;

pub use file_writer::{FileHandle, FileWriter};
pub use init::{init_tracing, LOG_FILE_NAME};
