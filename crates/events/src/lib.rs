//! Cross-module order lifecycle events.
//!
//! This crate owns the event contracts every module agrees on, the in-process
//! pub/sub bus that carries them, and the listener contract modules implement to
//! react to them. It depends on no module crate: payloads only carry identifiers.

pub mod bus;
pub mod contracts;
pub mod envelope;
pub mod event;
pub mod in_memory_bus;
pub mod listener;

pub use bus::{EventBus, Subscription};
pub use contracts::{
    LineItemData, OrderCancelled, OrderCreated, OrderDelivered, OrderEvent, OrderShipped,
    OrderStatusUpdated, CANCELLATION_REASON_STATUS_UPDATE,
};
pub use envelope::EventEnvelope;
pub use event::Event;
pub use in_memory_bus::{InMemoryBusError, InMemoryEventBus};
pub use listener::{dispatch, ListenerResult, OrderEventListener};

/// Envelope type carried by the order event bus.
pub type OrderEnvelope = EventEnvelope<OrderEvent>;
