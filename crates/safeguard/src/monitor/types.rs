use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

/// The class of operation an observation was taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// Total query time accumulated on one connection.
    CumulativeQuery,
    /// A single query.
    IndividualQuery,
    /// An HTTP request, start to response.
    RequestLifecycle,
    /// A console command, start to exit.
    CommandLifecycle,
}

impl EventKind {
    /// All kinds, in declaration order.
    pub const ALL: [EventKind; 4] = [
        EventKind::CumulativeQuery,
        EventKind::IndividualQuery,
        EventKind::RequestLifecycle,
        EventKind::CommandLifecycle,
    ];

    /// Stable snake_case name, also used as the threshold name.
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::CumulativeQuery => "cumulative_query",
            EventKind::IndividualQuery => "individual_query",
            EventKind::RequestLifecycle => "request_lifecycle",
            EventKind::CommandLifecycle => "command_lifecycle",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Convert a duration to whole milliseconds, saturating at `u64::MAX`.
pub(crate) fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

fn format_started_at(started_at: &DateTime<Utc>) -> String {
    started_at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn json_list(items: &[String]) -> String {
    serde_json::to_string(items).unwrap_or_else(|_| "[]".to_string())
}

/// A completed operation, as seen by the monitor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservedEvent {
    /// Which threshold applies.
    pub kind: EventKind,
    /// How long the operation took, in milliseconds.
    pub duration_ms: u64,
    /// Kind-specific details (SQL text, URL, command name, ...).
    #[serde(default)]
    pub context: BTreeMap<String, String>,
}

impl ObservedEvent {
    /// Create an event with an empty context.
    pub fn new(kind: EventKind, duration_ms: u64) -> Self {
        Self {
            kind,
            duration_ms,
            context: BTreeMap::new(),
        }
    }

    /// Create an event from a measured `Duration` (truncated to whole milliseconds).
    pub fn from_duration(kind: EventKind, duration: Duration) -> Self {
        Self::new(kind, duration_ms(duration))
    }

    /// Add a context field.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Add a context field only if `value` is present.
    pub fn with_optional_context(
        self,
        key: impl Into<String>,
        value: Option<impl Into<String>>,
    ) -> Self {
        match value {
            Some(value) => self.with_context(key, value),
            None => self,
        }
    }
}

/// A threshold violation handed to a [`WarningSink`](crate::sink::WarningSink).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warning {
    /// Kind of the offending event.
    pub kind: EventKind,
    /// Human-readable summary.
    pub message: String,
    /// Observed duration in milliseconds.
    pub duration_ms: u64,
    /// Threshold that was exceeded, in milliseconds.
    pub threshold_ms: u64,
    /// Event context plus `duration_ms` and `threshold_ms`.
    pub fields: BTreeMap<String, String>,
}

impl Warning {
    /// Look up a field by name.
    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }
}

/// Total query time on a connection crossed its cumulative threshold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CumulativeQueryTime {
    pub connection: String,
    pub total: Duration,
}

impl From<&CumulativeQueryTime> for ObservedEvent {
    fn from(event: &CumulativeQueryTime) -> Self {
        ObservedEvent::from_duration(EventKind::CumulativeQuery, event.total)
            .with_context("connection", event.connection.clone())
    }
}

/// A single query finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryExecuted {
    pub connection: Option<String>,
    pub sql: String,
    /// Bound parameter values, rendered as text.
    pub bindings: Vec<String>,
    pub duration: Duration,
}

impl QueryExecuted {
    pub fn new(sql: impl Into<String>, duration: Duration) -> Self {
        Self {
            connection: None,
            sql: sql.into(),
            bindings: Vec::new(),
            duration,
        }
    }

    pub fn with_bindings(mut self, bindings: Vec<String>) -> Self {
        self.bindings = bindings;
        self
    }

    pub fn on_connection(mut self, connection: impl Into<String>) -> Self {
        self.connection = Some(connection.into());
        self
    }
}

impl From<&QueryExecuted> for ObservedEvent {
    fn from(event: &QueryExecuted) -> Self {
        let ms = duration_ms(event.duration);
        ObservedEvent::new(EventKind::IndividualQuery, ms)
            .with_context("sql", event.sql.clone())
            .with_context("bindings", json_list(&event.bindings))
            .with_context("time", ms.to_string())
            .with_optional_context("connection", event.connection.clone())
    }
}

/// An HTTP request finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestHandled {
    pub method: String,
    pub url: String,
    /// Response status; `None` when no response was produced.
    pub status: Option<u16>,
    pub started_at: DateTime<Utc>,
    pub duration: Duration,
}

impl From<&RequestHandled> for ObservedEvent {
    fn from(event: &RequestHandled) -> Self {
        ObservedEvent::from_duration(EventKind::RequestLifecycle, event.duration)
            .with_context("url", event.url.clone())
            .with_context("method", event.method.clone())
            .with_optional_context("status", event.status.map(|s| s.to_string()))
            .with_context("started_at", format_started_at(&event.started_at))
    }
}

/// A console command finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandFinished {
    pub arguments: Vec<String>,
    /// Exit status.
    pub status: i32,
    pub started_at: DateTime<Utc>,
    pub duration: Duration,
}

impl From<&CommandFinished> for ObservedEvent {
    fn from(event: &CommandFinished) -> Self {
        ObservedEvent::from_duration(EventKind::CommandLifecycle, event.duration)
            .with_context("command", json_list(&event.arguments))
            .with_context("status", event.status.to_string())
            .with_context("started_at", format_started_at(&event.started_at))
    }
}

/// Receives completed operations from the subsystem that ran them.
///
/// Implementations are called synchronously on the caller's thread or task, so
/// they must return quickly and must not fail the caller. Every method
/// defaults to doing nothing.
pub trait SafetyObserver: Send + Sync {
    /// Called once when a connection's total query time crosses its threshold.
    fn on_cumulative_query(&self, _event: &CumulativeQueryTime) {}

    /// Called after every query.
    fn on_query(&self, _event: &QueryExecuted) {}

    /// Called after every HTTP request.
    fn on_request(&self, _event: &RequestHandled) {}

    /// Called after every console command.
    fn on_command(&self, _event: &CommandFinished) {}
}
