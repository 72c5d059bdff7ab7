//! # Event Publisher
//!
//! Defines the publishing side of the event bus.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::broadcast;
use tracing::{debug, error};

use crate::events::{DomainEvent, EventRecord, Topic};
use crate::DEFAULT_CHANNEL_CAPACITY;

/// Trait for publishing domain events to the bus.
///
/// Publishing is fire-and-forget from the caller's perspective: the event's
/// resource is serialized to its wire payload and handed to the broker
/// client without waiting for an application-level acknowledgment.
/// At-least-once delivery to the broker is the broker client configuration's
/// responsibility (acknowledge-on-leader-write); the publisher makes no
/// retry attempt, and a failure to enqueue is logged, not surfaced.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publish an event to its topic.
    async fn publish(&self, event: DomainEvent);
}

/// In-memory implementation of the event bus.
///
/// Uses `tokio::sync::broadcast` for multi-producer, multi-consumer
/// semantics. Suitable for single-process operation; a distributed
/// deployment would use a real broker client behind the same trait.
pub struct InMemoryEventBus {
    /// Broadcast sender for wire records.
    sender: broadcast::Sender<EventRecord>,

    /// Total records published.
    records_published: AtomicU64,

    /// Channel capacity.
    capacity: usize,
}

impl InMemoryEventBus {
    /// Create a new in-memory event bus with default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Create a new in-memory event bus with specified capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            records_published: AtomicU64::new(0),
            capacity,
        }
    }

    /// Subscribe to a fixed set of topics.
    #[must_use]
    pub fn subscribe(&self, topics: Vec<Topic>) -> crate::subscriber::Subscription {
        debug!(?topics, "new subscription created");
        crate::subscriber::Subscription::new(self.sender.subscribe(), topics)
    }

    /// Get the number of active subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Get the channel capacity.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Get the total number of records published.
    #[must_use]
    pub fn records_published(&self) -> u64 {
        self.records_published.load(Ordering::Relaxed)
    }
}

impl Default for InMemoryEventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventPublisher for InMemoryEventBus {
    async fn publish(&self, event: DomainEvent) {
        let topic = event.topic();

        let record = match event.to_record() {
            Ok(record) => record,
            Err(e) => {
                // A resource that cannot serialize is a programming error in
                // the closed event set; log it and drop the publish.
                error!(topic = %topic, error = %e, "failed to encode event, dropping");
                return;
            }
        };

        // Counted regardless of outcome: the publish was attempted.
        self.records_published.fetch_add(1, Ordering::Relaxed);

        match self.sender.send(record) {
            Ok(receiver_count) => {
                debug!(topic = %topic, receivers = receiver_count, "event published");
            }
            Err(e) => {
                // No receivers; the record is dropped. Fire-and-forget means
                // the caller never sees this.
                error!(topic = %topic, error = %e, "failed to enqueue event");
            }
        }
    }
}

/// No-op publisher for wiring paths that must not emit events.
#[derive(Debug, Clone, Default)]
pub struct NoOpPublisher;

#[async_trait]
impl EventPublisher for NoOpPublisher {
    async fn publish(&self, _event: DomainEvent) {}
}

/// Recording publisher for tests: captures every published event in order.
#[derive(Default)]
pub struct RecordingPublisher {
    events: Mutex<Vec<DomainEvent>>,
}

impl RecordingPublisher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All events published so far, in publish order.
    #[must_use]
    pub fn events(&self) -> Vec<DomainEvent> {
        self.events.lock().clone()
    }
}

#[async_trait]
impl EventPublisher for RecordingPublisher {
    async fn publish(&self, event: DomainEvent) {
        self.events.lock().push(event);
    }
}
