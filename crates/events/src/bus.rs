//! Event publishing/subscription abstraction (mechanics only).
//!
//! This module provides the **event bus pattern**: a pub/sub mechanism that hands a
//! copy of every published event to each subscriber (listeners in the customer,
//! inventory and order modules).
//!
//! ## Delivery semantics
//!
//! - **Fire-and-forget**: `publish()` never waits for subscribers to run
//! - **No acknowledgement**: the publisher never learns whether a listener succeeded
//! - **No backpressure**: subscriptions are unbounded queues
//! - **Per-subscriber FIFO**: one subscription sees events in publish order, but
//!   there is no ordering between different subscribers
//!
//! Listeners are therefore independent of each other and of the HTTP request that
//! caused the event.

use std::sync::Arc;

use tokio::sync::mpsc::{error::TryRecvError, UnboundedReceiver};

/// A subscription to an event stream.
///
/// Each subscription gets a copy of all events published after it was created
/// (broadcast semantics). Subscribe *before* anything is published if you must not
/// miss early events.
///
/// ## Usage Pattern
///
/// ```ignore
/// let mut subscription = bus.subscribe();
/// while let Some(envelope) = subscription.recv().await {
///     handle(envelope).await;
/// }
/// // `None`: the bus was dropped
/// ```
#[derive(Debug)]
pub struct Subscription<M> {
    receiver: UnboundedReceiver<M>,
}

impl<M> Subscription<M> {
    pub fn new(receiver: UnboundedReceiver<M>) -> Self {
        Self { receiver }
    }

    /// Wait for the next message. Returns `None` once the bus is gone.
    pub async fn recv(&mut self) -> Option<M> {
        self.receiver.recv().await
    }

    /// Try to receive a message without waiting.
    pub fn try_recv(&mut self) -> Result<M, TryRecvError> {
        self.receiver.try_recv()
    }
}

/// Domain-agnostic event bus (pub/sub abstraction).
///
/// ## Architecture Role
///
/// ```text
/// HTTP handler → OrderService → persist → EventBus::publish → Subscriptions
///                                                               ├─ customer listener
///                                                               ├─ inventory listener
///                                                               └─ order listener
/// ```
///
/// Events are published only after the state change they describe has been
/// persisted. A failed publish is reported to the caller; listener failures never
/// are.
///
/// ## Thread Safety
///
/// The trait requires `Send + Sync`: request handlers on any worker thread may
/// publish concurrently.
pub trait EventBus<M>: Send + Sync {
    type Error: core::fmt::Debug + core::fmt::Display + Send + Sync + 'static;

    fn publish(&self, message: M) -> Result<(), Self::Error>;

    fn subscribe(&self) -> Subscription<M>;
}

impl<M, B> EventBus<M> for Arc<B>
where
    B: EventBus<M> + ?Sized,
{
    type Error = B::Error;

    fn publish(&self, message: M) -> Result<(), Self::Error> {
        (**self).publish(message)
    }

    fn subscribe(&self) -> Subscription<M> {
        (**self).subscribe()
    }
}
