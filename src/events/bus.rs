//! Broadcast Event Bus
//!
//! - Uses `tokio::sync::broadcast` for multi-producer, multi-consumer
//! - Non-blocking emit (fire-and-forget)
//! - Lagging receivers drop old events (no backpressure)

use super::HanoiEvent;
use std::sync::Arc;
use tokio::sync::broadcast;

/// Default capacity for the event bus channel
pub const DEFAULT_CAPACITY: usize = 1024;

/// Distributes driver events to every subscriber
///
/// # Example
///
/// ```rust,ignore
/// let bus = EventBus::new(256);
/// let mut rx = bus.subscribe();
///
/// bus.emit(HanoiEvent::turn_started(1, 0));
///
/// while let Ok(event) = rx.recv().await {
///     println!("Event: {:?}", event);
/// }
/// ```
#[derive(Clone)]
pub struct EventBus {
    sender: Arc<broadcast::Sender<HanoiEvent>>,
}

impl EventBus {
    /// Create a new EventBus buffering up to `capacity` events per receiver
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Emit an event to all subscribers
    ///
    /// Events emitted with no subscribers are dropped.
    pub fn emit(&self, event: HanoiEvent) {
        let _ = self.sender.send(event);
    }

    /// Subscribe to events emitted from now on
    pub fn subscribe(&self) -> broadcast::Receiver<HanoiEvent> {
        self.sender.subscribe()
    }

    /// Get the current number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}
