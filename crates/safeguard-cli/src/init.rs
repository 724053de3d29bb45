use crate::cli::ConfigInitArgs;
use std::path::Path;

pub fn run(args: ConfigInitArgs) -> anyhow::Result<()> {
    write_template(&args.config)?;
    println!("wrote {}", args.config.display());
    Ok(())
}

const TEMPLATE: &str = r#"
# Thresholds are in milliseconds. Environment variables take precedence:
# MONITOR_DATABASE_QUERIES, CUMULATIVE_QUERY_THRESHOLD, INDIVIDUAL_QUERY_THRESHOLD,
# MONITOR_LIFECYCLE, REQUEST_THRESHOLD, COMMAND_THRESHOLD.

[query_monitoring]
enabled = true
# Total query time on one connection.
cumulative_query_threshold = 2000
# Time of a single query.
individual_query_threshold = 1000

[lifecycle_monitoring]
enabled = true
request_threshold = 5000
command_threshold = 5000
"#;

fn write_template(path: &Path) -> anyhow::Result<()> {
    if path.exists() {
        anyhow::bail!("refusing to overwrite existing file: {}", path.display());
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| {
                anyhow::anyhow!("failed to create directory {}: {e}", parent.display())
            })?;
        }
    }

    std::fs::write(path, TEMPLATE.trim_start_matches('\n'))
        .map_err(|e| anyhow::anyhow!("failed to write {}: {e}", path.display()))
}
