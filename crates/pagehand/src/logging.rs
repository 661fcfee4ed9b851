//! Logging setup
//!
//! The engine only emits `tracing` events; which sink receives them is
//! decided by the subscriber active where the session runs. Two lifecycles
//! are offered:
//!
//! - [`init_tracing`] installs a process-wide subscriber once.
//! - [`session_scope`] installs a subscriber for the current thread and
//!   removes it when the returned guard drops, bounding logging to one test
//!   session.
//!
//! `RUST_LOG` overrides the level passed to either function.

use crate::locator::Locator;
use tracing::subscriber::DefaultGuard;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry};

/// Replacement for masked values
pub const MASK: &str = "********";

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Pretty,
    /// One JSON object per event
    Json,
}

fn filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

fn subscriber(level: &str, format: LogFormat) -> Box<dyn tracing::Subscriber + Send + Sync> {
    let registry = Registry::default().with(filter(level));
    match format {
        LogFormat::Pretty => Box::new(
            registry.with(
                fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            ),
        ),
        LogFormat::Json => Box::new(
            registry.with(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_writer(std::io::stderr),
            ),
        ),
    }
}

/// Install the process-wide subscriber
///
/// Returns `false` if one was already installed; calling it again is harmless.
pub fn init_tracing(level: &str) -> bool {
    init_tracing_with(level, LogFormat::Pretty)
}

/// Install the process-wide subscriber with an output format
pub fn init_tracing_with(level: &str, format: LogFormat) -> bool {
    subscriber(level, format).try_init().is_ok()
}

/// Install a subscriber for the current thread until the guard drops
#[must_use = "logging stops when the guard is dropped"]
pub fn session_scope(level: &str) -> DefaultGuard {
    tracing::subscriber::set_default(subscriber(level, LogFormat::Pretty))
}

/// Value to log for text typed into or read from `locator`
#[must_use]
pub fn loggable<'a>(locator: &Locator, value: &'a str) -> &'a str {
    if locator.is_sensitive() {
        MASK
    } else {
        value
    }
}
