//! Destinations for threshold warnings.
//!
//! A sink must be safe to call from many threads at once and should return
//! quickly: the monitor calls it on the thread that finished the measured
//! operation. Sinks that talk to slow backends belong behind a [`ChannelSink`].

mod channel;
mod sinks;
mod tracing_sink;


pub use channel::ChannelSink;
pub use sinks::{CompositeSink, MemorySink, StatsSink, WarningStats};
pub use tracing_sink::TracingSink;

use crate::error::SinkError;
use crate::monitor::Warning;
use std::sync::Arc;

/// Receives warnings produced by a [`ThresholdMonitor`](crate::monitor::ThresholdMonitor).
pub trait WarningSink: Send + Sync {
    /// Deliver one warning.
    ///
    /// Errors are logged by the monitor and otherwise ignored.
    fn emit(&self, warning: &Warning) -> Result<(), SinkError>;
}

impl<S: WarningSink + ?Sized> WarningSink for Arc<S> {
    fn emit(&self, warning: &Warning) -> Result<(), SinkError> {
        (**self).emit(warning)
    }
}
