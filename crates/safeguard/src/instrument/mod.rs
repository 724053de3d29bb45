//! Helpers the owning subsystem uses to feed a [`SafetyObserver`](crate::monitor::SafetyObserver).
//!
//! - [`QueryRecorder`]: one per database connection; times queries and tracks
//!   cumulative query time.
//! - [`RequestTimer`] / [`CommandTimer`]: measure a request or command
//!   lifecycle and report it on `finish`.

mod lifecycle;
mod query;

#[cfg(test)]
mod tests;

pub use lifecycle::{CommandTimer, RequestTimer};
pub use query::QueryRecorder;
