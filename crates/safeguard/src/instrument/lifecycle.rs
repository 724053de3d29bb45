use crate::monitor::{CommandFinished, RequestHandled, SafetyObserver};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// Measures one HTTP request from arrival to response.
pub struct RequestTimer {
    observer: Arc<dyn SafetyObserver>,
    method: String,
    url: String,
    started_at: DateTime<Utc>,
    start: Instant,
}

impl RequestTimer {
    /// Start timing a request.
    pub fn start(
        observer: Arc<dyn SafetyObserver>,
        method: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            observer,
            method: method.into(),
            url: url.into(),
            started_at: Utc::now(),
            start: Instant::now(),
        }
    }

    /// Wall-clock start time.
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Time elapsed so far.
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Stop the timer and report the request. Returns the measured duration.
    ///
    /// `status` is `None` when the request ended without a response.
    pub fn finish(self, status: Option<u16>) -> Duration {
        let duration = self.elapsed();
        self.observer.on_request(&RequestHandled {
            method: self.method,
            url: self.url,
            status,
            started_at: self.started_at,
            duration,
        });
        duration
    }
}

/// Measures one console command from start to exit.
pub struct CommandTimer {
    observer: Arc<dyn SafetyObserver>,
    arguments: Vec<String>,
    started_at: DateTime<Utc>,
    start: Instant,
}

impl CommandTimer {
    /// Start timing a command invoked with `arguments`.
    pub fn start(observer: Arc<dyn SafetyObserver>, arguments: Vec<String>) -> Self {
        Self {
            observer,
            arguments,
            started_at: Utc::now(),
            start: Instant::now(),
        }
    }

    /// Wall-clock start time.
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Time elapsed so far.
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Stop the timer and report the command's exit status. Returns the measured duration.
    pub fn finish(self, status: i32) -> Duration {
        let duration = self.elapsed();
        self.observer.on_command(&CommandFinished {
            arguments: self.arguments,
            status,
            started_at: self.started_at,
            duration,
        });
        duration
    }
}
