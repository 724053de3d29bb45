//! Application-level wiring.

use crate::config::SafetyConfig;
use crate::error::ConfigResult;
use crate::instrument::{CommandTimer, QueryRecorder, RequestTimer};
use crate::monitor::{SafetyObserver, ThresholdMonitor};
use crate::sink::{TracingSink, WarningSink};
use std::sync::Arc;

/// A configured [`ThresholdMonitor`] plus constructors for the
/// instrumentation handles that report to it.
///
/// Cheap to clone; clones share the same monitor.
#[derive(Debug, Clone)]
pub struct Safeguard {
    monitor: Arc<ThresholdMonitor>,
}

impl Safeguard {
    /// Build from a loaded configuration and a sink.
    pub fn new<S: WarningSink + 'static>(config: SafetyConfig, sink: S) -> Self {
        Self::from_monitor(ThresholdMonitor::new(config, sink))
    }

    /// Wrap an existing monitor.
    pub fn from_monitor(monitor: ThresholdMonitor) -> Self {
        for (kind, threshold) in monitor.config().iter() {
            tracing::debug!(
                target: "safeguard",
                kind = %kind,
                limit_ms = threshold.limit_ms,
                enabled = threshold.enabled,
                "threshold configured"
            );
        }
        Self {
            monitor: Arc::new(monitor),
        }
    }

    /// Load configuration from the environment and log warnings through `tracing`.
    ///
    /// Fails on invalid settings, so misconfiguration surfaces at startup.
    pub fn from_env() -> ConfigResult<Self> {
        Ok(Self::new(SafetyConfig::from_env()?, TracingSink::new()))
    }

    /// The underlying monitor.
    pub fn monitor(&self) -> &ThresholdMonitor {
        &self.monitor
    }

    /// The active configuration.
    pub fn config(&self) -> &SafetyConfig {
        self.monitor.config()
    }

    /// The monitor as a shareable observer.
    pub fn observer(&self) -> Arc<dyn SafetyObserver> {
        self.monitor.clone()
    }

    /// A query recorder for one connection.
    pub fn connection(&self, name: impl Into<String>) -> QueryRecorder {
        QueryRecorder::new(name, self.monitor.clone())
    }

    /// Start timing an HTTP request.
    pub fn request(&self, method: impl Into<String>, url: impl Into<String>) -> RequestTimer {
        RequestTimer::start(self.observer(), method, url)
    }

    /// Start timing a console command.
    pub fn command(&self, arguments: Vec<String>) -> CommandTimer {
        CommandTimer::start(self.observer(), arguments)
    }
}
