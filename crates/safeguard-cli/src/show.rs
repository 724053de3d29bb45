use crate::cli::ConfigShowArgs;
use safeguard::SafetyConfig;

pub fn run(args: ConfigShowArgs) -> anyhow::Result<()> {
    let config = crate::config::load(args.config.as_deref())?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&config)?);
    } else {
        print!("{}", render_table(&config));
    }
    Ok(())
}

fn render_table(config: &SafetyConfig) -> String {
    let mut out = format!("{:<20} {:>10}  {}\n", "KIND", "LIMIT_MS", "ENABLED");
    for (kind, threshold) in config.iter() {
        out.push_str(&format!(
            "{:<20} {:>10}  {}\n",
            kind.as_str(),
            threshold.limit_ms,
            if threshold.enabled { "yes" } else { "no" }
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use safeguard::EventKind;

    #[test]
    fn table_lists_every_kind() {
        let config = SafetyConfig::new().with_enabled(EventKind::RequestLifecycle, false);
        let table = render_table(&config);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 5);
        assert!(lines[1].starts_with("cumulative_query"));
        assert!(lines[1].contains("2000"));
        assert!(lines[3].starts_with("request_lifecycle"));
        assert!(lines[3].ends_with("no"));
    }
}
