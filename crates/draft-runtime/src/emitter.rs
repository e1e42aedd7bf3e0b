//! Broadcast-based emitter for [`DraftEvent`] notifications.

use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::broadcast;

use draft_core::DraftEvent;

/// Default broadcast channel capacity.
const DEFAULT_CAPACITY: usize = 256;

/// Broadcast-based event emitter.
///
/// Non-blocking: `emit` never awaits. Slow receivers lag out rather than
/// blocking the registry's mutation path.
pub struct EventEmitter {
    tx: broadcast::Sender<DraftEvent>,
    emit_count: AtomicU64,
}

impl EventEmitter {
    /// Create a new emitter with the default channel capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create a new emitter with a custom channel capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self {
            tx,
            emit_count: AtomicU64::new(0),
        }
    }

    /// Emit an event to all subscribers. Non-blocking.
    ///
    /// Returns the number of receivers reached; 0 with no subscribers.
    pub fn emit(&self, event: DraftEvent) -> usize {
        let _ = self.emit_count.fetch_add(1, Ordering::Relaxed);
        self.tx.send(event).unwrap_or(0)
    }

    /// Subscribe to events emitted after this call.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<DraftEvent> {
        self.tx.subscribe()
    }

    /// Number of active subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Total number of events emitted.
    #[must_use]
    pub fn emit_count(&self) -> u64 {
        self.emit_count.load(Ordering::Relaxed)
    }
}

impl Default for EventEmitter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use draft_core::SessionHandle;
    use draft_core::events::{draft_complete_event, draft_started_event};

    fn handle() -> SessionHandle {
        SessionHandle::new(9)
    }

    #[test]
    fn emit_with_no_subscribers() {
        let emitter = EventEmitter::new();
        assert_eq!(emitter.emit(draft_started_event(handle())), 0);
        assert_eq!(emitter.emit_count(), 1);
    }

    #[tokio::test]
    async fn emit_and_receive() {
        let emitter = EventEmitter::new();
        let mut rx = emitter.subscribe();

        let count = emitter.emit(draft_complete_event(handle()));
        assert_eq!(count, 1);

        let received = rx.recv().await.unwrap();
        assert_eq!(received.event_type(), "draft_complete");
        assert_eq!(received.handle(), handle());
    }

    #[tokio::test]
    async fn multiple_subscribers_each_receive() {
        let emitter = EventEmitter::new();
        let mut rx1 = emitter.subscribe();
        let mut rx2 = emitter.subscribe();
        assert_eq!(emitter.subscriber_count(), 2);

        assert_eq!(emitter.emit(draft_started_event(handle())), 2);
        assert_eq!(rx1.recv().await.unwrap().event_type(), "draft_started");
        assert_eq!(rx2.recv().await.unwrap().event_type(), "draft_started");
    }

    #[tokio::test]
    async fn slow_receiver_lags_out() {
        let emitter = EventEmitter::with_capacity(2);
        let mut rx = emitter.subscribe();

        let _ = emitter.emit(draft_started_event(handle()));
        let _ = emitter.emit(draft_started_event(handle()));
        let _ = emitter.emit(draft_started_event(handle()));

        assert!(rx.recv().await.is_err(), "receiver should be lagged");
    }

    #[test]
    fn subscriber_count_tracks_drops() {
        let emitter = EventEmitter::new();
        let rx1 = emitter.subscribe();
        let rx2 = emitter.subscribe();
        assert_eq!(emitter.subscriber_count(), 2);
        drop(rx1);
        assert_eq!(emitter.subscriber_count(), 1);
        drop(rx2);
        assert_eq!(emitter.subscriber_count(), 0);
    }
}
