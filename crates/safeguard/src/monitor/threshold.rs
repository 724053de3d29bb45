use super::truncate_bytes;
use super::types::{
    CommandFinished, CumulativeQueryTime, EventKind, ObservedEvent, QueryExecuted, RequestHandled,
    SafetyObserver, Warning,
};
use crate::config::SafetyConfig;
use crate::sink::WarningSink;
use std::collections::BTreeMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

/// Compares observed durations against a [`SafetyConfig`] and reports
/// violations to a [`WarningSink`].
///
/// The monitor holds no mutable state: each observation is judged on its own,
/// so one instance can be shared across threads behind an `Arc`.
pub struct ThresholdMonitor {
    config: SafetyConfig,
    sink: Arc<dyn WarningSink>,
    max_field_length: Option<usize>,
}

impl ThresholdMonitor {
    /// Create a monitor that reports to `sink`.
    pub fn new<S: WarningSink + 'static>(config: SafetyConfig, sink: S) -> Self {
        Self::with_sink_arc(config, Arc::new(sink))
    }

    /// Create a monitor from an Arc-wrapped sink.
    pub fn with_sink_arc(config: SafetyConfig, sink: Arc<dyn WarningSink>) -> Self {
        Self {
            config,
            sink,
            max_field_length: None,
        }
    }

    /// Truncate context values longer than `len` bytes (e.g. very long SQL).
    pub fn max_field_length(mut self, len: usize) -> Self {
        self.max_field_length = Some(len);
        self
    }

    /// The configuration this monitor was built with.
    pub fn config(&self) -> &SafetyConfig {
        &self.config
    }

    /// Decide whether `event` violates its threshold, without emitting anything.
    pub fn evaluate(&self, event: &ObservedEvent) -> Option<Warning> {
        let threshold = self.config.threshold(event.kind);
        if !threshold.is_exceeded_by(event.duration_ms) {
            return None;
        }

        let mut fields: BTreeMap<String, String> = event
            .context
            .iter()
            .map(|(key, value)| (key.clone(), self.truncate(value)))
            .collect();
        fields.insert("duration_ms".to_string(), event.duration_ms.to_string());
        fields.insert("threshold_ms".to_string(), threshold.limit_ms.to_string());

        Some(Warning {
            kind: event.kind,
            message: message(event, threshold.limit_ms),
            duration_ms: event.duration_ms,
            threshold_ms: threshold.limit_ms,
            fields,
        })
    }

    /// Judge `event` and hand any resulting warning to the sink.
    ///
    /// Never fails: sink errors and sink panics are logged and discarded.
    pub fn observe(&self, event: &ObservedEvent) {
        if let Some(warning) = self.evaluate(event) {
            self.dispatch(&warning);
        }
    }

    fn dispatch(&self, warning: &Warning) {
        match panic::catch_unwind(AssertUnwindSafe(|| self.sink.emit(warning))) {
            Ok(Ok(())) => {}
            Ok(Err(err)) => tracing::error!(
                target: "safeguard",
                kind = %warning.kind,
                error = %err,
                "failed to deliver threshold warning"
            ),
            Err(_) => tracing::error!(
                target: "safeguard",
                kind = %warning.kind,
                "threshold warning sink panicked"
            ),
        }
    }

    fn truncate(&self, value: &str) -> String {
        match self.max_field_length {
            Some(max) if value.len() > max => format!("{}...", truncate_bytes(value, max)),
            _ => value.to_string(),
        }
    }
}

fn message(event: &ObservedEvent, threshold_ms: u64) -> String {
    match event.kind {
        EventKind::CumulativeQuery => match event.context.get("connection") {
            Some(connection) => {
                format!("Database queries exceeded {threshold_ms}ms on {connection}")
            }
            None => format!("Database queries exceeded {threshold_ms}ms."),
        },
        EventKind::IndividualQuery => {
            format!("An individual database query exceeded {threshold_ms}ms.")
        }
        EventKind::RequestLifecycle => format!("A request took longer than {threshold_ms}ms."),
        EventKind::CommandLifecycle => format!("A command took longer than {threshold_ms}ms."),
    }
}

impl SafetyObserver for ThresholdMonitor {
    fn on_cumulative_query(&self, event: &CumulativeQueryTime) {
        self.observe(&ObservedEvent::from(event));
    }

    fn on_query(&self, event: &QueryExecuted) {
        self.observe(&ObservedEvent::from(event));
    }

    fn on_request(&self, event: &RequestHandled) {
        self.observe(&ObservedEvent::from(event));
    }

    fn on_command(&self, event: &CommandFinished) {
        self.observe(&ObservedEvent::from(event));
    }
}

impl std::fmt::Debug for ThresholdMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThresholdMonitor")
            .field("config", &self.config)
            .field("max_field_length", &self.max_field_length)
            .finish_non_exhaustive()
    }
}
