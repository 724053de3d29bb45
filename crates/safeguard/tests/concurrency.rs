use safeguard::{EventKind, ObservedEvent, QueryRecorder, SafetyConfig, StatsSink, ThresholdMonitor};
use std::sync::Arc;
use std::time::Duration;

#[test]
fn concurrent_observations_do_not_interfere() {
    let stats = Arc::new(StatsSink::new());
    let monitor = Arc::new(ThresholdMonitor::new(SafetyConfig::new(), stats.clone()));

    std::thread::scope(|s| {
        for (i, kind) in EventKind::ALL.into_iter().enumerate() {
            let monitor = monitor.clone();
            s.spawn(move || {
                let limit = monitor.config().threshold(kind).limit_ms;
                for n in 0..250u64 {
                    // Alternate between slow and exactly-at-limit events.
                    let duration = if n % 2 == 0 { limit + 1 + i as u64 } else { limit };
                    monitor.observe(&ObservedEvent::new(kind, duration));
                }
            });
        }
    });

    let stats = stats.stats();
    for kind in EventKind::ALL {
        assert_eq!(stats.count(kind), 125, "{kind}");
    }
    assert_eq!(stats.total(), 500);
    assert_eq!(stats.max_overrun_ms, 4);
}

#[test]
fn recorders_on_separate_threads_report_independently() {
    let stats = Arc::new(StatsSink::new());
    let monitor = Arc::new(ThresholdMonitor::new(SafetyConfig::new(), stats.clone()));

    std::thread::scope(|s| {
        for _ in 0..8 {
            let monitor = monitor.clone();
            s.spawn(move || {
                let mut db = QueryRecorder::new("primary", monitor);
                for _ in 0..3 {
                    db.record("SELECT 1", vec![], Duration::from_millis(900));
                }
            });
        }
    });

    // Each thread owns a recorder, so each crosses the cumulative limit once.
    assert_eq!(stats.stats().count(EventKind::CumulativeQuery), 8);
    assert_eq!(stats.stats().count(EventKind::IndividualQuery), 0);
}
