use crate::cli::DEFAULT_CONFIG;
use safeguard::{SafetyConfig, SafetySettings};
use std::path::{Path, PathBuf};

/// Load thresholds: defaults, then the settings file, then the environment.
///
/// An explicit `--config` path must exist; the default path is optional.
pub fn load(path: Option<&Path>) -> anyhow::Result<SafetyConfig> {
    load_with(path, |var| std::env::var(var).ok())
}

fn load_with<F>(path: Option<&Path>, lookup: F) -> anyhow::Result<SafetyConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let settings = match path {
        Some(path) => Some(read_settings(path)?),
        None => {
            let default = PathBuf::from(DEFAULT_CONFIG);
            if default.exists() {
                Some(read_settings(&default)?)
            } else {
                None
            }
        }
    };

    let mut config = SafetyConfig::default();
    if let Some(settings) = settings {
        config = settings.apply(config)?;
    }
    Ok(config.with_overrides(lookup)?)
}

fn read_settings(path: &Path) -> anyhow::Result<SafetySettings> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;

    let settings: SafetySettings = toml::from_str(&raw)
        .map_err(|e| anyhow::anyhow!("failed to parse config file {}: {e}", path.display()))?;

    tracing::debug!(target: "safeguard", path = %path.display(), "loaded settings file");
    Ok(settings)
}
