//! Threshold monitoring for queries, requests and commands.
//!
//! This module provides:
//! - [`ThresholdMonitor`], which compares observed durations against a
//!   [`SafetyConfig`](crate::config::SafetyConfig) and emits [`Warning`]s
//! - the [`SafetyObserver`] interface, with one method per event kind, that
//!   query executors and request/command dispatchers call after each operation
//! - [`CompositeObserver`] for fanning events out to several observers
//!
//! # Example
//!
//! ```rust,ignore
//! use safeguard::config::SafetyConfig;
//! use safeguard::monitor::{EventKind, ObservedEvent, ThresholdMonitor};
//! use safeguard::sink::TracingSink;
//!
//! let monitor = ThresholdMonitor::new(SafetyConfig::from_env()?, TracingSink::new());
//!
//! // Logs "An individual database query exceeded 1000ms."
//! monitor.observe(
//!     &ObservedEvent::new(EventKind::IndividualQuery, 1500)
//!         .with_context("sql", "SELECT * FROM orders"),
//! );
//! ```

mod observers;
mod threshold;
mod types;


pub use observers::{CompositeObserver, NoopObserver};
pub use threshold::ThresholdMonitor;
pub use types::{
    CommandFinished, CumulativeQueryTime, EventKind, ObservedEvent, QueryExecuted, RequestHandled,
    SafetyObserver, Warning,
};

pub(crate) use types::duration_ms;

pub(crate) fn truncate_bytes(value: &str, max_bytes: usize) -> &str {
    if value.len() <= max_bytes {
        return value;
    }
    let mut end = max_bytes;
    while end > 0 && !value.is_char_boundary(end) {
        end -= 1;
    }
    &value[..end]
}
