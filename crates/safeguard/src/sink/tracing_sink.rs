use super::WarningSink;
use crate::error::SinkError;
use crate::monitor::Warning;
use tracing::Level;

/// A `tracing`-based sink that logs each warning as one structured event.
///
/// Events use the target `safeguard` and carry `kind`, `duration_ms`,
/// `threshold_ms` and the warning's `fields` rendered as a JSON object. The
/// message is the warning's message.
#[derive(Debug, Clone)]
pub struct TracingSink {
    /// Tracing event level to emit at.
    pub level: Level,
}

impl Default for TracingSink {
    fn default() -> Self {
        Self {
            level: Level::WARN,
        }
    }
}

impl TracingSink {
    /// Create a sink that logs at WARN.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the tracing event level.
    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }
}

impl WarningSink for TracingSink {
    fn emit(&self, warning: &Warning) -> Result<(), SinkError> {
        /// Dispatch a tracing event at a runtime-determined level.
        macro_rules! emit_at_level {
            ($level:expr, $($field:tt)*) => {
                match $level {
                    Level::ERROR => tracing::error!($($field)*),
                    Level::WARN  => tracing::warn!($($field)*),
                    Level::INFO  => tracing::info!($($field)*),
                    Level::DEBUG => tracing::debug!($($field)*),
                    Level::TRACE => tracing::trace!($($field)*),
                }
            };
        }

        let fields = serde_json::to_string(&warning.fields).unwrap_or_default();
        emit_at_level!(
            self.level,
            target: "safeguard",
            kind = %warning.kind,
            duration_ms = warning.duration_ms,
            threshold_ms = warning.threshold_ms,
            fields = %fields,
            "{}",
            warning.message
        );
        Ok(())
    }
}
