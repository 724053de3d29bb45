use super::SafetyConfig;
use crate::error::{ConfigError, ConfigResult};
use crate::monitor::EventKind;

/// Environment variable names read by [`SafetyConfig::from_env`].
pub mod vars {
    /// Enables both query kinds.
    pub const MONITOR_DATABASE_QUERIES: &str = "MONITOR_DATABASE_QUERIES";
    /// Cumulative query threshold in milliseconds.
    pub const CUMULATIVE_QUERY_THRESHOLD: &str = "CUMULATIVE_QUERY_THRESHOLD";
    /// Individual query threshold in milliseconds.
    pub const INDIVIDUAL_QUERY_THRESHOLD: &str = "INDIVIDUAL_QUERY_THRESHOLD";
    /// Enables both lifecycle kinds.
    pub const MONITOR_LIFECYCLE: &str = "MONITOR_LIFECYCLE";
    /// Request lifecycle threshold in milliseconds.
    pub const REQUEST_THRESHOLD: &str = "REQUEST_THRESHOLD";
    /// Command lifecycle threshold in milliseconds.
    pub const COMMAND_THRESHOLD: &str = "COMMAND_THRESHOLD";

    /// Per-kind override of `MONITOR_DATABASE_QUERIES`.
    pub const MONITOR_CUMULATIVE_QUERIES: &str = "MONITOR_CUMULATIVE_QUERIES";
    /// Per-kind override of `MONITOR_DATABASE_QUERIES`.
    pub const MONITOR_INDIVIDUAL_QUERIES: &str = "MONITOR_INDIVIDUAL_QUERIES";
    /// Per-kind override of `MONITOR_LIFECYCLE`.
    pub const MONITOR_REQUESTS: &str = "MONITOR_REQUESTS";
    /// Per-kind override of `MONITOR_LIFECYCLE`.
    pub const MONITOR_COMMANDS: &str = "MONITOR_COMMANDS";

    /// Every variable, in load order.
    pub const ALL: [&str; 10] = [
        MONITOR_DATABASE_QUERIES,
        CUMULATIVE_QUERY_THRESHOLD,
        INDIVIDUAL_QUERY_THRESHOLD,
        MONITOR_LIFECYCLE,
        REQUEST_THRESHOLD,
        COMMAND_THRESHOLD,
        MONITOR_CUMULATIVE_QUERIES,
        MONITOR_INDIVIDUAL_QUERIES,
        MONITOR_REQUESTS,
        MONITOR_COMMANDS,
    ];
}

struct KindVars {
    kind: EventKind,
    group_flag: &'static str,
    flag: &'static str,
    threshold: &'static str,
}

const KIND_VARS: [KindVars; 4] = [
    KindVars {
        kind: EventKind::CumulativeQuery,
        group_flag: vars::MONITOR_DATABASE_QUERIES,
        flag: vars::MONITOR_CUMULATIVE_QUERIES,
        threshold: vars::CUMULATIVE_QUERY_THRESHOLD,
    },
    KindVars {
        kind: EventKind::IndividualQuery,
        group_flag: vars::MONITOR_DATABASE_QUERIES,
        flag: vars::MONITOR_INDIVIDUAL_QUERIES,
        threshold: vars::INDIVIDUAL_QUERY_THRESHOLD,
    },
    KindVars {
        kind: EventKind::RequestLifecycle,
        group_flag: vars::MONITOR_LIFECYCLE,
        flag: vars::MONITOR_REQUESTS,
        threshold: vars::REQUEST_THRESHOLD,
    },
    KindVars {
        kind: EventKind::CommandLifecycle,
        group_flag: vars::MONITOR_LIFECYCLE,
        flag: vars::MONITOR_COMMANDS,
        threshold: vars::COMMAND_THRESHOLD,
    },
];

pub(super) fn apply<F>(mut config: SafetyConfig, lookup: &F) -> ConfigResult<SafetyConfig>
where
    F: Fn(&str) -> Option<String>,
{
    for entry in &KIND_VARS {
        let group = read_flag(lookup, entry.group_flag)?;
        let own = read_flag(lookup, entry.flag)?;
        if let Some(enabled) = own.or(group) {
            config = config.with_enabled(entry.kind, enabled);
        }
        if let Some(limit_ms) = read_threshold(lookup, entry.threshold)? {
            config = config.with_limit(entry.kind, limit_ms);
        }
    }
    Ok(config)
}

fn read_flag<F>(lookup: &F, var: &str) -> ConfigResult<Option<bool>>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(var) {
        Some(raw) => parse_flag(var, &raw),
        None => Ok(None),
    }
}

fn read_threshold<F>(lookup: &F, var: &str) -> ConfigResult<Option<u64>>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(var) {
        Some(raw) => parse_threshold(var, &raw),
        None => Ok(None),
    }
}

/// Parse a boolean flag. Empty values count as unset.
pub(crate) fn parse_flag(var: &str, raw: &str) -> ConfigResult<Option<bool>> {
    let value = raw.trim();
    if value.is_empty() {
        return Ok(None);
    }
    match value.to_ascii_lowercase().as_str() {
        "true" | "(true)" | "1" | "yes" | "on" => Ok(Some(true)),
        "false" | "(false)" | "0" | "no" | "off" => Ok(Some(false)),
        _ => Err(ConfigError::InvalidFlag {
            var: var.to_string(),
            value: raw.to_string(),
        }),
    }
}

/// Parse a millisecond threshold. Empty values count as unset.
pub(crate) fn parse_threshold(var: &str, raw: &str) -> ConfigResult<Option<u64>> {
    let value = raw.trim();
    if value.is_empty() {
        return Ok(None);
    }
    if let Ok(ms) = value.parse::<u64>() {
        return Ok(Some(ms));
    }
    match value.parse::<i64>() {
        Ok(negative) if negative < 0 => Err(ConfigError::NegativeThreshold {
            var: var.to_string(),
            value: negative,
        }),
        // "-0"
        Ok(_) => Ok(Some(0)),
        Err(_) => Err(ConfigError::InvalidThreshold {
            var: var.to_string(),
            value: raw.to_string(),
        }),
    }
}
