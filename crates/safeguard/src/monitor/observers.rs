use super::types::{
    CommandFinished, CumulativeQueryTime, QueryExecuted, RequestHandled, SafetyObserver,
};
use std::sync::Arc;

/// An observer that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl SafetyObserver for NoopObserver {}

/// An observer that forwards every event to several observers, in the order
/// they were added.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn SafetyObserver>>,
}

impl CompositeObserver {
    /// Create an empty composite observer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an observer.
    #[allow(clippy::should_implement_trait)]
    pub fn add<O: SafetyObserver + 'static>(mut self, observer: O) -> Self {
        self.observers.push(Arc::new(observer));
        self
    }

    /// Add an Arc-wrapped observer.
    pub fn add_arc(mut self, observer: Arc<dyn SafetyObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Number of registered observers.
    pub fn len(&self) -> usize {
        self.observers.len()
    }

    /// Whether no observers are registered.
    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

impl SafetyObserver for CompositeObserver {
    fn on_cumulative_query(&self, event: &CumulativeQueryTime) {
        for observer in &self.observers {
            observer.on_cumulative_query(event);
        }
    }

    fn on_query(&self, event: &QueryExecuted) {
        for observer in &self.observers {
            observer.on_query(event);
        }
    }

    fn on_request(&self, event: &RequestHandled) {
        for observer in &self.observers {
            observer.on_request(event);
        }
    }

    fn on_command(&self, event: &CommandFinished) {
        for observer in &self.observers {
            observer.on_command(event);
        }
    }
}
