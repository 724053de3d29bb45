//! # safeguard
//!
//! Threshold-based monitoring for slow database queries and slow
//! request/command lifecycles.
//!
//! ## Features
//!
//! - **Explicit configuration**: thresholds are loaded once (defaults, file,
//!   environment) into an immutable [`SafetyConfig`]; bad values fail at startup
//! - **Stateless monitor**: [`ThresholdMonitor`] warns if and only if an enabled
//!   threshold is strictly exceeded
//! - **Observer interface**: subsystems report finished operations through
//!   [`SafetyObserver`], one method per event kind
//! - **Pluggable sinks**: `tracing`, in-memory, counting, fan-out and a
//!   non-blocking queue drained by a tokio task
//! - **Never in the way**: sink failures are logged and swallowed, never
//!   returned to the measured operation
//!
//! ```ignore
//! use safeguard::Safeguard;
//!
//! let safeguard = Safeguard::from_env()?;
//!
//! let mut db = safeguard.connection("primary");
//! let rows = db.time("SELECT * FROM orders", vec![], run_query()).await;
//!
//! let request = safeguard.request("GET", "https://example.com/orders");
//! // ... handle the request ...
//! request.finish(Some(200));
//! ```

pub mod config;
pub mod error;
pub mod instrument;
pub mod monitor;
pub mod sink;

mod safeguard;

pub use config::{SafetyConfig, SafetySettings, ThresholdConfig};
pub use error::{ConfigError, ConfigResult, SinkError};
pub use instrument::{CommandTimer, QueryRecorder, RequestTimer};
pub use monitor::{
    CommandFinished, CompositeObserver, CumulativeQueryTime, EventKind, NoopObserver,
    ObservedEvent, QueryExecuted, RequestHandled, SafetyObserver, ThresholdMonitor, Warning,
};
pub use safeguard::Safeguard;
pub use sink::{
    ChannelSink, CompositeSink, MemorySink, StatsSink, TracingSink, WarningSink, WarningStats,
};
