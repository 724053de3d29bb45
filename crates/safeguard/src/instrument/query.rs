use crate::config::ThresholdConfig;
use crate::monitor::{
    CumulativeQueryTime, QueryExecuted, SafetyObserver, ThresholdMonitor, duration_ms,
};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// Per-connection query timing.
///
/// Reports every query to the observer and keeps a running total of query time.
/// The first time the total exceeds the monitor's enabled cumulative limit a
/// [`CumulativeQueryTime`] is reported; further crossings are silent until
/// [`reset`](Self::reset).
///
/// A recorder belongs to one connection and is not shared, so the running
/// total needs no synchronization.
pub struct QueryRecorder {
    connection: String,
    observer: Arc<dyn SafetyObserver>,
    cumulative: ThresholdConfig,
    total: Duration,
    reported: bool,
}

impl QueryRecorder {
    /// Create a recorder for `connection` that reports to `monitor`.
    ///
    /// The cumulative limit is taken from the monitor's configuration.
    pub fn new(connection: impl Into<String>, monitor: Arc<ThresholdMonitor>) -> Self {
        let cumulative = monitor.config().cumulative_query.clone();
        Self {
            connection: connection.into(),
            observer: monitor,
            cumulative,
            total: Duration::ZERO,
            reported: false,
        }
    }

    /// Connection name.
    pub fn connection(&self) -> &str {
        &self.connection
    }

    /// Query time accumulated since creation or the last reset.
    pub fn total(&self) -> Duration {
        self.total
    }

    /// Whether the cumulative threshold has already been reported.
    pub fn has_reported(&self) -> bool {
        self.reported
    }

    /// Record a finished query.
    pub fn record(&mut self, sql: impl Into<String>, bindings: Vec<String>, duration: Duration) {
        let query = QueryExecuted::new(sql, duration)
            .with_bindings(bindings)
            .on_connection(self.connection.clone());
        self.observer.on_query(&query);

        self.total = self.total.saturating_add(duration);
        if !self.reported && self.cumulative.is_exceeded_by(duration_ms(self.total)) {
            self.reported = true;
            self.observer.on_cumulative_query(&CumulativeQueryTime {
                connection: self.connection.clone(),
                total: self.total,
            });
        }
    }

    /// Run `query` to completion and record how long it took.
    pub async fn time<F, T>(&mut self, sql: impl Into<String>, bindings: Vec<String>, query: F) -> T
    where
        F: Future<Output = T>,
    {
        let start = Instant::now();
        let output = query.await;
        self.record(sql, bindings, start.elapsed());
        output
    }

    /// Clear the running total and allow the cumulative report to fire again.
    pub fn reset(&mut self) {
        self.total = Duration::ZERO;
        self.reported = false;
    }
}

impl std::fmt::Debug for QueryRecorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryRecorder")
            .field("connection", &self.connection)
            .field("cumulative", &self.cumulative)
            .field("total", &self.total)
            .field("reported", &self.reported)
            .finish_non_exhaustive()
    }
}
