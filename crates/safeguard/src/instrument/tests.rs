use super::*;
use crate::config::SafetyConfig;
use crate::monitor::{EventKind, ThresholdMonitor};
use crate::safeguard::Safeguard;
use crate::sink::MemorySink;
use chrono::SecondsFormat;
use std::sync::Arc;
use std::time::Duration;

fn observer(config: SafetyConfig) -> (Arc<ThresholdMonitor>, Arc<MemorySink>) {
    let sink = Arc::new(MemorySink::new());
    (Arc::new(ThresholdMonitor::new(config, sink.clone())), sink)
}

#[test]
fn recorder_reports_slow_individual_queries() {
    let (monitor, sink) = observer(SafetyConfig::new());
    let mut recorder = QueryRecorder::new("primary", monitor);

    recorder.record("SELECT 1", vec![], Duration::from_millis(5));
    recorder.record(
        "SELECT * FROM orders WHERE customer_id = $1",
        vec!["42".to_string()],
        Duration::from_millis(1200),
    );

    let warnings = sink.warnings();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].kind, EventKind::IndividualQuery);
    assert_eq!(warnings[0].field("connection"), Some("primary"));
    assert_eq!(warnings[0].field("bindings"), Some("[\"42\"]"));
    assert_eq!(recorder.total(), Duration::from_millis(1205));
}

#[test]
fn recorder_reports_cumulative_time_once() {
    let (monitor, sink) = observer(SafetyConfig::new());
    let mut recorder = QueryRecorder::new("primary", monitor);

    for _ in 0..4 {
        recorder.record("SELECT 1", vec![], Duration::from_millis(600));
    }
    // 2400ms total; no single query is slow.
    let warnings = sink.drain();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].kind, EventKind::CumulativeQuery);
    assert_eq!(warnings[0].duration_ms, 2400);
    assert_eq!(warnings[0].message, "Database queries exceeded 2000ms on primary");
    assert!(recorder.has_reported());

    recorder.record("SELECT 1", vec![], Duration::from_millis(600));
    assert!(sink.is_empty());
}

#[test]
fn recorder_total_equal_to_threshold_is_silent() {
    let (monitor, sink) = observer(SafetyConfig::new());
    let mut recorder = QueryRecorder::new("primary", monitor);

    recorder.record("SELECT 1", vec![], Duration::from_millis(1000));
    recorder.record("SELECT 2", vec![], Duration::from_millis(1000));
    assert!(sink.is_empty());
    assert!(!recorder.has_reported());

    recorder.record("SELECT 3", vec![], Duration::from_millis(1));
    assert_eq!(sink.len(), 1);
}

#[test]
fn recorder_reset_rearms_cumulative_report() {
    let config = SafetyConfig::new().with_limit(EventKind::CumulativeQuery, 100);
    let (monitor, sink) = observer(config);
    let mut recorder = QueryRecorder::new("replica", monitor);

    recorder.record("SELECT 1", vec![], Duration::from_millis(150));
    assert_eq!(sink.drain().len(), 1);

    recorder.reset();
    assert_eq!(recorder.total(), Duration::ZERO);
    assert!(!recorder.has_reported());

    recorder.record("SELECT 1", vec![], Duration::from_millis(150));
    assert_eq!(sink.len(), 1);
}

#[test]
fn disabled_query_monitoring_is_silent() {
    let config = SafetyConfig::new()
        .with_enabled(EventKind::CumulativeQuery, false)
        .with_enabled(EventKind::IndividualQuery, false);
    let (monitor, sink) = observer(config);
    let mut recorder = QueryRecorder::new("primary", monitor);

    recorder.record("SELECT pg_sleep(5)", vec![], Duration::from_secs(5));
    assert!(sink.is_empty());
    assert!(!recorder.has_reported());
    assert_eq!(recorder.total(), Duration::from_secs(5));
}

#[test]
fn recorder_uses_the_monitor_cumulative_limit() {
    let config = SafetyConfig::new().with_limit(EventKind::CumulativeQuery, 5000);
    let (monitor, sink) = observer(config);
    let mut recorder = QueryRecorder::new("primary", monitor);

    for _ in 0..5 {
        recorder.record("SELECT 1", vec![], Duration::from_millis(900));
    }
    // 4500ms: over the 2000ms default, but within the configured limit.
    assert!(sink.is_empty());
    assert!(!recorder.has_reported());

    for _ in 0..5 {
        recorder.record("SELECT 1", vec![], Duration::from_millis(900));
    }
    let warnings = sink.warnings();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].kind, EventKind::CumulativeQuery);
    assert_eq!(warnings[0].duration_ms, 5400);
    assert_eq!(warnings[0].threshold_ms, 5000);
}

#[test]
fn recorder_reports_below_default_when_limit_is_lower() {
    let config = SafetyConfig::new().with_limit(EventKind::CumulativeQuery, 500);
    let (monitor, sink) = observer(config);
    let mut recorder = QueryRecorder::new("primary", monitor);

    recorder.record("SELECT 1", vec![], Duration::from_millis(900));

    let warnings = sink.warnings();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].kind, EventKind::CumulativeQuery);
    assert_eq!(warnings[0].threshold_ms, 500);
}

#[tokio::test(start_paused = true)]
async fn recorder_times_futures() {
    let (monitor, sink) = observer(SafetyConfig::new());
    let mut recorder = QueryRecorder::new("primary", monitor);

    let rows = recorder
        .time("SELECT pg_sleep(1.5)", vec![], async {
            tokio::time::sleep(Duration::from_millis(1500)).await;
            3
        })
        .await;

    assert_eq!(rows, 3);
    assert!(recorder.total() >= Duration::from_millis(1500));
    assert!(recorder.total() < Duration::from_millis(1600));

    let warnings = sink.warnings();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].field("sql"), Some("SELECT pg_sleep(1.5)"));
}

#[tokio::test(start_paused = true)]
async fn request_timer_reports_slow_requests() {
    let (monitor, sink) = observer(SafetyConfig::new());

    let timer = RequestTimer::start(monitor, "GET", "https://example.com/reports");
    let started_at = timer.started_at().to_rfc3339_opts(SecondsFormat::Millis, true);
    tokio::time::advance(Duration::from_secs(6)).await;
    let elapsed = timer.finish(Some(200));

    assert!(elapsed >= Duration::from_secs(6));
    let warnings = sink.warnings();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].kind, EventKind::RequestLifecycle);
    assert_eq!(warnings[0].field("method"), Some("GET"));
    assert_eq!(warnings[0].field("url"), Some("https://example.com/reports"));
    assert_eq!(warnings[0].field("status"), Some("200"));
    assert_eq!(warnings[0].field("started_at"), Some(started_at.as_str()));
}

#[tokio::test(start_paused = true)]
async fn fast_request_is_silent() {
    let (monitor, sink) = observer(SafetyConfig::new());

    let timer = RequestTimer::start(monitor, "GET", "/");
    tokio::time::advance(Duration::from_millis(20)).await;
    timer.finish(Some(200));

    assert!(sink.is_empty());
}

#[tokio::test(start_paused = true)]
async fn command_timer_reports_slow_commands() {
    let config = SafetyConfig::new().with_limit(EventKind::CommandLifecycle, 1000);
    let (monitor, sink) = observer(config);

    let timer = CommandTimer::start(
        monitor,
        vec!["reports:rebuild".to_string(), "--all".to_string()],
    );
    let started_at = timer.started_at().to_rfc3339_opts(SecondsFormat::Millis, true);
    tokio::time::advance(Duration::from_millis(1500)).await;
    timer.finish(0);

    let warnings = sink.warnings();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].message, "A command took longer than 1000ms.");
    assert_eq!(warnings[0].field("command"), Some("[\"reports:rebuild\",\"--all\"]"));
    assert_eq!(warnings[0].field("status"), Some("0"));
    assert_eq!(warnings[0].field("started_at"), Some(started_at.as_str()));
}

#[tokio::test(start_paused = true)]
async fn safeguard_wires_recorders_and_timers() {
    let sink = Arc::new(MemorySink::new());
    let config = SafetyConfig::new().with_limit(EventKind::CumulativeQuery, 300);
    let safeguard = Safeguard::new(config, sink.clone());

    let mut db = safeguard.connection("analytics");
    db.record("SELECT 1", vec![], Duration::from_millis(200));
    db.record("SELECT 2", vec![], Duration::from_millis(200));

    let request = safeguard.request("POST", "/imports");
    tokio::time::advance(Duration::from_secs(10)).await;
    request.finish(None);

    let command = safeguard.command(vec!["import".to_string()]);
    command.finish(0);

    let warnings = sink.warnings();
    let kinds: Vec<_> = warnings.iter().map(|w| w.kind).collect();
    assert_eq!(kinds, vec![EventKind::CumulativeQuery, EventKind::RequestLifecycle]);
    assert_eq!(warnings[1].field("status"), None);
    assert_eq!(safeguard.config().cumulative_query.limit_ms, 300);
}
