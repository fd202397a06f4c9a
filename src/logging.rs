//! Structured logging setup for embedding applications.
//!
//! ChronoGraph does not initialize logging on its own; library code only
//! ever emits `tracing` events. Call [`init_logging`] once from an
//! application entry point (a `main`, a test harness, a binding layer) to
//! install a subscriber.

use crate::error::{ChronoError, Result};
use tracing_subscriber::{fmt, EnvFilter};

/// Installs a global `tracing` subscriber filtered by `level` (e.g. `"info"`,
/// `"chronograph=debug"`).
///
/// Calling this more than once returns `ChronoError::InvalidArgument` rather
/// than panicking, since a second call generally indicates a bug in the
/// caller rather than the graph engine.
pub fn init_logging(level: &str) -> Result<()> {
    fmt()
        .with_env_filter(
            EnvFilter::try_new(level)
                .map_err(|e| ChronoError::InvalidArgument(format!("invalid log level: {e}")))?,
        )
        .with_target(true)
        .with_thread_ids(true)
        .try_init()
        .map_err(|_| ChronoError::InvalidArgument("logging already initialized".into()))
}
