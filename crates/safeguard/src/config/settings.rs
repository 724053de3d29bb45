use super::SafetyConfig;
use crate::error::{ConfigError, ConfigResult};
use crate::monitor::EventKind;
use serde::Deserialize;

/// File-based settings, laid out like the `[query_monitoring]` and
/// `[lifecycle_monitoring]` tables of a `safeguard.toml`.
///
/// Every field is optional; unset fields keep the value of the configuration
/// the settings are applied to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SafetySettings {
    pub query_monitoring: QueryMonitoringSettings,
    pub lifecycle_monitoring: LifecycleMonitoringSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct QueryMonitoringSettings {
    pub enabled: Option<bool>,
    pub cumulative_query_threshold: Option<i64>,
    pub individual_query_threshold: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LifecycleMonitoringSettings {
    pub enabled: Option<bool>,
    pub request_threshold: Option<i64>,
    pub command_threshold: Option<i64>,
}

impl SafetySettings {
    /// Apply these settings on top of `config`.
    ///
    /// Negative thresholds are rejected with the dotted setting name
    /// (e.g. `query_monitoring.individual_query_threshold`).
    pub fn apply(&self, mut config: SafetyConfig) -> ConfigResult<SafetyConfig> {
        let query = &self.query_monitoring;
        let lifecycle = &self.lifecycle_monitoring;

        if let Some(enabled) = query.enabled {
            config = config
                .with_enabled(EventKind::CumulativeQuery, enabled)
                .with_enabled(EventKind::IndividualQuery, enabled);
        }
        if let Some(enabled) = lifecycle.enabled {
            config = config
                .with_enabled(EventKind::RequestLifecycle, enabled)
                .with_enabled(EventKind::CommandLifecycle, enabled);
        }

        let limits = [
            (
                EventKind::CumulativeQuery,
                "query_monitoring.cumulative_query_threshold",
                query.cumulative_query_threshold,
            ),
            (
                EventKind::IndividualQuery,
                "query_monitoring.individual_query_threshold",
                query.individual_query_threshold,
            ),
            (
                EventKind::RequestLifecycle,
                "lifecycle_monitoring.request_threshold",
                lifecycle.request_threshold,
            ),
            (
                EventKind::CommandLifecycle,
                "lifecycle_monitoring.command_threshold",
                lifecycle.command_threshold,
            ),
        ];
        for (kind, name, value) in limits {
            let Some(value) = value else { continue };
            let limit_ms = u64::try_from(value).map_err(|_| ConfigError::NegativeThreshold {
                var: name.to_string(),
                value,
            })?;
            config = config.with_limit(kind, limit_ms);
        }

        Ok(config)
    }
}
