//! # Event Subscriber and Dispatcher
//!
//! The subscription side of the bus: a [`Subscription`] receives wire
//! records for a fixed topic set, and an [`EventDispatcher`] decodes each
//! record and routes it to the one handler registered for its topic.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::broadcast;
use tracing::{debug, error, warn};

use crate::events::{DomainEvent, EventRecord, Topic};

/// Error returned by a handler for a single delivery.
///
/// A handler error terminates that delivery only: the record is lost (no
/// redelivery under the current design) but the dispatch loop continues
/// with subsequent records.
#[derive(Debug, Clone, Error)]
#[error("handler failed: {0}")]
pub struct HandlerError(pub String);

impl HandlerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// A typed handler for decoded domain events.
///
/// Handlers are expected to be idempotent and non-throwing for
/// business-as-usual inputs: the bus is at-least-once, so the same event
/// may arrive more than once.
#[async_trait]
pub trait EventHandler: Send + Sync {
    async fn handle(&self, event: DomainEvent) -> Result<(), HandlerError>;
}

/// A subscription handle for receiving wire records on a topic set.
pub struct Subscription {
    receiver: broadcast::Receiver<EventRecord>,
    topics: Vec<Topic>,
}

impl Subscription {
    pub(crate) fn new(receiver: broadcast::Receiver<EventRecord>, topics: Vec<Topic>) -> Self {
        Self { receiver, topics }
    }

    /// The topics this subscription listens on.
    #[must_use]
    pub fn topics(&self) -> &[Topic] {
        &self.topics
    }

    /// Receive the next record on one of the subscribed topics.
    ///
    /// Returns `None` when the bus is dropped. Records on other topics are
    /// skipped; broker-order is preserved within each topic.
    pub async fn recv(&mut self) -> Option<EventRecord> {
        loop {
            match self.receiver.recv().await {
                Ok(record) if self.topics.contains(&record.topic) => return Some(record),
                Ok(_) => continue,
                Err(broadcast::error::RecvError::Closed) => return None,
                Err(broadcast::error::RecvError::Lagged(count)) => {
                    warn!(lagged = count, "subscriber lagged, records dropped");
                    continue;
                }
            }
        }
    }
}

/// Routes each inbound record to the handler registered for its topic.
///
/// One handler per topic; a record for a topic with no registered handler
/// is logged and dropped, as is a record whose payload fails to decode.
/// Records are processed one at a time in delivery order, so a slow handler
/// delays consumption of subsequent records (implicit back-pressure).
pub struct EventDispatcher {
    subscription: Subscription,
    handlers: HashMap<Topic, Arc<dyn EventHandler>>,
}

impl EventDispatcher {
    /// Create a dispatcher over an existing subscription.
    #[must_use]
    pub fn new(subscription: Subscription) -> Self {
        Self {
            subscription,
            handlers: HashMap::new(),
        }
    }

    /// Register the handler for one topic, replacing any previous one.
    #[must_use]
    pub fn register(mut self, topic: Topic, handler: Arc<dyn EventHandler>) -> Self {
        self.handlers.insert(topic, handler);
        self
    }

    /// Deliver one record: decode, wrap, dispatch.
    async fn deliver(&self, record: EventRecord) {
        let Some(handler) = self.handlers.get(&record.topic) else {
            warn!(topic = %record.topic, "record on topic without handler, dropping");
            return;
        };

        let event = match DomainEvent::from_record(&record) {
            Ok(event) => event,
            Err(e) => {
                warn!(topic = %record.topic, error = %e, "malformed payload, dropping");
                return;
            }
        };

        debug!(topic = %record.topic, "dispatching event");
        if let Err(e) = handler.handle(event).await {
            // The delivery is lost for this record; the loop keeps going.
            error!(topic = %record.topic, error = %e, "handler failed, record lost");
        }
    }

    /// Run the dispatch loop until the bus is dropped.
    pub async fn run(mut self) {
        while let Some(record) = self.subscription.recv().await {
            self.deliver(record).await;
        }
        debug!("event bus closed, dispatcher exiting");
    }
}
