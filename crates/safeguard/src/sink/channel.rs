use super::WarningSink;
use crate::error::SinkError;
use crate::monitor::Warning;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;

/// A non-blocking sink that queues warnings for a background task.
///
/// `emit` only pushes onto a bounded queue; a tokio task drains the queue into
/// the inner sink. When the queue is full the warning is dropped and counted.
///
/// The drain task finishes once every clone of the `ChannelSink` is dropped, so
/// awaiting the returned handle after dropping the monitor flushes the queue.
///
/// ```rust,ignore
/// let (sink, flushed) = ChannelSink::spawn(TracingSink::new(), 1024);
/// let monitor = ThresholdMonitor::new(config, sink);
/// // ...
/// drop(monitor);
/// flushed.await?;
/// ```
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::Sender<Warning>,
    dropped: Arc<AtomicU64>,
}

impl ChannelSink {
    /// Spawn the drain task on the current tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn spawn<S: WarningSink + 'static>(inner: S, capacity: usize) -> (Self, JoinHandle<()>) {
        Self::spawn_arc(Arc::new(inner), capacity)
    }

    /// Spawn the drain task for an Arc-wrapped inner sink.
    pub fn spawn_arc(inner: Arc<dyn WarningSink>, capacity: usize) -> (Self, JoinHandle<()>) {
        let (tx, mut rx) = mpsc::channel::<Warning>(capacity.max(1));
        let handle = tokio::spawn(async move {
            while let Some(warning) = rx.recv().await {
                if let Err(err) = inner.emit(&warning) {
                    tracing::error!(
                        target: "safeguard",
                        kind = %warning.kind,
                        error = %err,
                        "queued threshold warning could not be delivered"
                    );
                }
            }
        });
        let sink = Self {
            tx,
            dropped: Arc::new(AtomicU64::new(0)),
        };
        (sink, handle)
    }

    /// Number of warnings dropped because the queue was full or closed.
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl WarningSink for ChannelSink {
    fn emit(&self, warning: &Warning) -> Result<(), SinkError> {
        match self.tx.try_send(warning.clone()) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                Err(SinkError::QueueFull)
            }
            Err(TrySendError::Closed(_)) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                Err(SinkError::Closed)
            }
        }
    }
}
