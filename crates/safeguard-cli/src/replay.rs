use crate::cli::{Input, ReplayArgs};
use safeguard::{
    CompositeSink, EventKind, ObservedEvent, StatsSink, ThresholdMonitor, TracingSink,
    WarningStats,
};
use std::sync::Arc;
use tokio::io::AsyncReadExt;

pub async fn run(args: ReplayArgs) -> anyhow::Result<()> {
    let config = crate::config::load(args.config.as_deref())?;
    let raw = read_input(&args.input).await?;

    let stats = Arc::new(StatsSink::new());
    let sink = CompositeSink::new()
        .add(TracingSink::new())
        .add_arc(stats.clone());
    let monitor = ThresholdMonitor::new(config, sink);

    let events = replay(&monitor, &raw)?;
    let summary = stats.stats();
    print!("{}", render_summary(events, &summary));

    if args.deny_warnings && summary.total() > 0 {
        anyhow::bail!("{} threshold warning(s)", summary.total());
    }
    Ok(())
}

async fn read_input(input: &Input) -> anyhow::Result<String> {
    match input {
        Input::File(path) => tokio::fs::read_to_string(path)
            .await
            .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", path.display())),
        Input::Stdin => {
            let mut raw = String::new();
            tokio::io::stdin()
                .read_to_string(&mut raw)
                .await
                .map_err(|e| anyhow::anyhow!("failed to read stdin: {e}"))?;
            Ok(raw)
        }
    }
}

/// Feed every event line to `monitor`. Returns the number of events read.
fn replay(monitor: &ThresholdMonitor, raw: &str) -> anyhow::Result<usize> {
    let mut events = 0;
    for (idx, line) in raw.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let event: ObservedEvent = serde_json::from_str(line)
            .map_err(|e| anyhow::anyhow!("line {}: invalid event: {e}", idx + 1))?;
        monitor.observe(&event);
        events += 1;
    }
    Ok(events)
}

fn render_summary(events: usize, stats: &WarningStats) -> String {
    let mut out = format!("events: {events}\n");
    for kind in EventKind::ALL {
        out.push_str(&format!("{:<20} {}\n", kind.as_str(), stats.count(kind)));
    }
    out.push_str(&format!("warnings: {}\n", stats.total()));
    if stats.total() > 0 {
        out.push_str(&format!("max overrun: {}ms\n", stats.max_overrun_ms));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use safeguard::{MemorySink, SafetyConfig};

    const LINES: &str = r#"
# recorded in staging
{"kind":"individual_query","duration_ms":1500,"context":{"sql":"select * from orders"}}
{"kind":"individual_query","duration_ms":1000}

{"kind":"request_lifecycle","duration_ms":7000,"context":{"url":"/reports","method":"GET"}}
{"kind":"command_lifecycle","duration_ms":10}
"#;

    #[test]
    fn replays_event_lines() {
        let memory = Arc::new(MemorySink::new());
        let monitor = ThresholdMonitor::new(SafetyConfig::new(), memory.clone());

        assert_eq!(replay(&monitor, LINES).unwrap(), 4);

        let warnings = memory.warnings();
        assert_eq!(warnings.len(), 2);
        assert_eq!(warnings[0].field("sql"), Some("select * from orders"));
        assert_eq!(warnings[1].kind, EventKind::RequestLifecycle);
        assert_eq!(warnings[1].field("url"), Some("/reports"));
    }

    #[test]
    fn reports_the_offending_line() {
        let monitor = ThresholdMonitor::new(SafetyConfig::new(), MemorySink::new());
        let raw = "{\"kind\":\"individual_query\",\"duration_ms\":1}\n{\"kind\":\"slow\"}\n";
        let err = replay(&monitor, raw).unwrap_err();
        assert!(err.to_string().starts_with("line 2: invalid event"), "{err}");
    }

    #[test]
    fn summary_counts_per_kind() {
        let stats = Arc::new(StatsSink::new());
        let monitor = ThresholdMonitor::new(
            SafetyConfig::new().with_limit(EventKind::CommandLifecycle, 5),
            stats.clone(),
        );
        let events = replay(&monitor, LINES).unwrap();
        let summary = render_summary(events, &stats.stats());

        assert!(summary.starts_with("events: 4\n"));
        assert!(summary.contains("command_lifecycle    1\n"));
        assert!(summary.contains("warnings: 3\n"));
        assert!(summary.contains("max overrun: 2000ms\n"));
    }

    #[test]
    fn empty_input_has_no_overrun_line() {
        let summary = render_summary(0, &WarningStats::default());
        assert!(summary.contains("warnings: 0\n"));
        assert!(!summary.contains("max overrun"));
    }
}
