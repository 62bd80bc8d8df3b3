//! Logging setup for the signal engine.

mod logging;

pub use logging::{setup_logging, WorkerGuard};
