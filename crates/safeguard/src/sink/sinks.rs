use super::WarningSink;
use crate::error::SinkError;
use crate::monitor::{EventKind, Warning};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

/// A sink that keeps every warning in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    warnings: Mutex<Vec<Warning>>,
}

impl MemorySink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Warning>> {
        // A panicking reader cannot leave the Vec half-written.
        self.warnings.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Snapshot of the collected warnings, oldest first.
    pub fn warnings(&self) -> Vec<Warning> {
        self.lock().clone()
    }

    /// Number of collected warnings.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether nothing has been collected.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Remove and return all collected warnings.
    pub fn drain(&self) -> Vec<Warning> {
        std::mem::take(&mut *self.lock())
    }
}

impl WarningSink for MemorySink {
    fn emit(&self, warning: &Warning) -> Result<(), SinkError> {
        self.lock().push(warning.clone());
        Ok(())
    }
}

/// A sink that delivers to several sinks.
///
/// Every child is tried even if an earlier one fails; the first error is returned.
#[derive(Default)]
pub struct CompositeSink {
    sinks: Vec<Arc<dyn WarningSink>>,
}

impl CompositeSink {
    /// Create an empty composite sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a sink.
    #[allow(clippy::should_implement_trait)]
    pub fn add<S: WarningSink + 'static>(mut self, sink: S) -> Self {
        self.sinks.push(Arc::new(sink));
        self
    }

    /// Add an Arc-wrapped sink.
    pub fn add_arc(mut self, sink: Arc<dyn WarningSink>) -> Self {
        self.sinks.push(sink);
        self
    }
}

impl WarningSink for CompositeSink {
    fn emit(&self, warning: &Warning) -> Result<(), SinkError> {
        let mut first_error = None;
        for sink in &self.sinks {
            if let Err(err) = sink.emit(warning) {
                first_error.get_or_insert(err);
            }
        }
        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// A sink that counts warnings per event kind.
#[derive(Debug, Default)]
pub struct StatsSink {
    cumulative_query: AtomicU64,
    individual_query: AtomicU64,
    request_lifecycle: AtomicU64,
    command_lifecycle: AtomicU64,
    max_overrun_ms: AtomicU64,
}

/// Snapshot of a [`StatsSink`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WarningStats {
    /// Cumulative query warnings.
    pub cumulative_query: u64,
    /// Individual query warnings.
    pub individual_query: u64,
    /// Request lifecycle warnings.
    pub request_lifecycle: u64,
    /// Command lifecycle warnings.
    pub command_lifecycle: u64,
    /// Largest `duration_ms - threshold_ms` seen.
    pub max_overrun_ms: u64,
}

impl WarningStats {
    /// Warnings of the given kind.
    pub fn count(&self, kind: EventKind) -> u64 {
        match kind {
            EventKind::CumulativeQuery => self.cumulative_query,
            EventKind::IndividualQuery => self.individual_query,
            EventKind::RequestLifecycle => self.request_lifecycle,
            EventKind::CommandLifecycle => self.command_lifecycle,
        }
    }

    /// Warnings of all kinds.
    pub fn total(&self) -> u64 {
        EventKind::ALL
            .into_iter()
            .map(|kind| self.count(kind))
            .fold(0, u64::saturating_add)
    }
}

impl StatsSink {
    /// Create a sink with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    fn counter(&self, kind: EventKind) -> &AtomicU64 {
        match kind {
            EventKind::CumulativeQuery => &self.cumulative_query,
            EventKind::IndividualQuery => &self.individual_query,
            EventKind::RequestLifecycle => &self.request_lifecycle,
            EventKind::CommandLifecycle => &self.command_lifecycle,
        }
    }

    /// Get a snapshot of the counters.
    pub fn stats(&self) -> WarningStats {
        WarningStats {
            cumulative_query: self.cumulative_query.load(Ordering::Relaxed),
            individual_query: self.individual_query.load(Ordering::Relaxed),
            request_lifecycle: self.request_lifecycle.load(Ordering::Relaxed),
            command_lifecycle: self.command_lifecycle.load(Ordering::Relaxed),
            max_overrun_ms: self.max_overrun_ms.load(Ordering::Relaxed),
        }
    }

    /// Reset all counters.
    pub fn reset(&self) {
        for kind in EventKind::ALL {
            self.counter(kind).store(0, Ordering::Relaxed);
        }
        self.max_overrun_ms.store(0, Ordering::Relaxed);
    }
}

impl WarningSink for StatsSink {
    fn emit(&self, warning: &Warning) -> Result<(), SinkError> {
        self.counter(warning.kind).fetch_add(1, Ordering::Relaxed);
        let overrun = warning.duration_ms.saturating_sub(warning.threshold_ms);
        self.max_overrun_ms.fetch_max(overrun, Ordering::Relaxed);
        Ok(())
    }
}
