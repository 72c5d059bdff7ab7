//! # Shared Bus - Domain-Event Channel for Inter-Service Choreography
//!
//! All inter-service coordination happens through durable topics on this
//! bus; services never call each other directly.
//!
//! ## Choreography Pattern
//!
//! ```text
//! ┌───────────────────┐                      ┌───────────────────┐
//! │ allergy-registry  │                      │      therapy      │
//! │                   │      publish()       │                   │
//! │                   │ ───────┐             │                   │
//! └───────────────────┘        │             └───────────────────┘
//!                              ▼                      ↑
//!                       ┌──────────────┐              │
//!                       │  Event Bus   │ ─────────────┘
//!                       │ (topics)     │   subscribe()/dispatch()
//!                       └──────────────┘
//! ```
//!
//! ## Delivery Semantics
//!
//! - **At-least-once**: the broker layer may deliver a record more than
//!   once but does not silently drop it; handlers must tolerate duplicates.
//!   No idempotency keys are attached to records; consumers that need
//!   dedup must derive it from their own state.
//! - **Fire-and-forget publish**: a failure to enqueue is logged, never
//!   surfaced to the caller.
//! - **Per-topic ordering**: records on one topic arrive in broker order;
//!   nothing is guaranteed across topics.

pub mod events;
pub mod publisher;
pub mod subscriber;

pub use events::{DomainEvent, EventCodecError, EventRecord, Topic};
pub use publisher::{EventPublisher, InMemoryEventBus, NoOpPublisher, RecordingPublisher};
pub use subscriber::{EventDispatcher, EventHandler, HandlerError, Subscription};

/// Maximum records buffered per subscriber before backpressure.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1000;
