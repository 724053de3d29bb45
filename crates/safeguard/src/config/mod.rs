//! Threshold configuration.
//!
//! A [`SafetyConfig`] is loaded once at startup (defaults, then an optional
//! settings file, then environment variables) and handed to the monitor by
//! value. Nothing in this crate reads configuration after construction.
//!
//! ```rust,ignore
//! use safeguard::config::SafetyConfig;
//!
//! // Fails fast on `REQUEST_THRESHOLD=-1` or `MONITOR_LIFECYCLE=maybe`.
//! let config = SafetyConfig::from_env()?;
//! assert_eq!(config.request_lifecycle.limit_ms, 5000);
//! ```

mod env;
mod settings;


pub use env::vars;
pub use settings::{LifecycleMonitoringSettings, QueryMonitoringSettings, SafetySettings};

use crate::error::ConfigResult;
use crate::monitor::EventKind;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default cumulative query threshold (2 seconds).
pub const DEFAULT_CUMULATIVE_QUERY_THRESHOLD_MS: u64 = 2000;
/// Default individual query threshold (1 second).
pub const DEFAULT_INDIVIDUAL_QUERY_THRESHOLD_MS: u64 = 1000;
/// Default request lifecycle threshold (5 seconds).
pub const DEFAULT_REQUEST_THRESHOLD_MS: u64 = 5000;
/// Default command lifecycle threshold (5 seconds).
pub const DEFAULT_COMMAND_THRESHOLD_MS: u64 = 5000;

/// Threshold for a single event kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThresholdConfig {
    /// Name of the monitored event class.
    pub name: String,
    /// Maximum accepted duration in milliseconds.
    pub limit_ms: u64,
    /// Whether warnings are emitted for this class.
    pub enabled: bool,
}

impl ThresholdConfig {
    /// Create an enabled threshold.
    pub fn new(name: impl Into<String>, limit_ms: u64) -> Self {
        Self {
            name: name.into(),
            limit_ms,
            enabled: true,
        }
    }

    /// Set whether this threshold is enabled.
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// The limit as a `Duration`.
    pub fn limit(&self) -> Duration {
        Duration::from_millis(self.limit_ms)
    }

    /// Whether `duration_ms` should produce a warning.
    ///
    /// The comparison is strict: a duration equal to the limit never triggers.
    pub fn is_exceeded_by(&self, duration_ms: u64) -> bool {
        self.enabled && duration_ms > self.limit_ms
    }
}

/// Thresholds for all four monitored event kinds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetyConfig {
    /// Total query time on one connection.
    pub cumulative_query: ThresholdConfig,
    /// Time of a single query.
    pub individual_query: ThresholdConfig,
    /// Wall-clock time of an HTTP request.
    pub request_lifecycle: ThresholdConfig,
    /// Wall-clock time of a console command.
    pub command_lifecycle: ThresholdConfig,
}

impl Default for SafetyConfig {
    fn default() -> Self {
        Self {
            cumulative_query: ThresholdConfig::new(
                EventKind::CumulativeQuery.as_str(),
                DEFAULT_CUMULATIVE_QUERY_THRESHOLD_MS,
            ),
            individual_query: ThresholdConfig::new(
                EventKind::IndividualQuery.as_str(),
                DEFAULT_INDIVIDUAL_QUERY_THRESHOLD_MS,
            ),
            request_lifecycle: ThresholdConfig::new(
                EventKind::RequestLifecycle.as_str(),
                DEFAULT_REQUEST_THRESHOLD_MS,
            ),
            command_lifecycle: ThresholdConfig::new(
                EventKind::CommandLifecycle.as_str(),
                DEFAULT_COMMAND_THRESHOLD_MS,
            ),
        }
    }
}

impl SafetyConfig {
    /// Create a configuration with the built-in defaults (everything enabled).
    pub fn new() -> Self {
        Self::default()
    }

    /// Load defaults overridden by the process environment.
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load defaults overridden by values from `lookup`.
    ///
    /// `lookup` receives variable names from [`vars`] and returns the raw value
    /// if set.
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::default().with_overrides(lookup)
    }

    /// Apply environment-style overrides on top of this configuration.
    pub fn with_overrides<F>(self, lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        env::apply(self, &lookup)
    }

    /// Threshold for the given event kind.
    pub fn threshold(&self, kind: EventKind) -> &ThresholdConfig {
        match kind {
            EventKind::CumulativeQuery => &self.cumulative_query,
            EventKind::IndividualQuery => &self.individual_query,
            EventKind::RequestLifecycle => &self.request_lifecycle,
            EventKind::CommandLifecycle => &self.command_lifecycle,
        }
    }

    fn threshold_mut(&mut self, kind: EventKind) -> &mut ThresholdConfig {
        match kind {
            EventKind::CumulativeQuery => &mut self.cumulative_query,
            EventKind::IndividualQuery => &mut self.individual_query,
            EventKind::RequestLifecycle => &mut self.request_lifecycle,
            EventKind::CommandLifecycle => &mut self.command_lifecycle,
        }
    }

    /// Override the limit for one kind.
    pub fn with_limit(mut self, kind: EventKind, limit_ms: u64) -> Self {
        self.threshold_mut(kind).limit_ms = limit_ms;
        self
    }

    /// Enable or disable one kind.
    pub fn with_enabled(mut self, kind: EventKind, enabled: bool) -> Self {
        self.threshold_mut(kind).enabled = enabled;
        self
    }

    /// Iterate over `(kind, threshold)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (EventKind, &ThresholdConfig)> {
        EventKind::ALL
            .into_iter()
            .map(move |kind| (kind, self.threshold(kind)))
    }
}
