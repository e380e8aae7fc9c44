//! Publishes order lifecycle events.

use thiserror::Error;
use tracing::debug;

use ordermanager_events::{
    Event, EventBus, EventEnvelope, OrderCancelled, OrderCreated, OrderDelivered, OrderEnvelope,
    OrderEvent, OrderShipped, OrderStatusUpdated,
};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PublishError {
    #[error("failed to publish {event_type}: {reason}")]
    Bus {
        event_type: &'static str,
        reason: String,
    },
}

/// Outbound port for order events. One method per event kind.
///
/// Callers publish only after the change the event describes has been stored.
pub trait OrderEventPublisher: Send + Sync {
    fn publish_order_created(&self, event: OrderCreated) -> Result<(), PublishError>;

    fn publish_order_status_updated(&self, event: OrderStatusUpdated) -> Result<(), PublishError>;

    fn publish_order_shipped(&self, event: OrderShipped) -> Result<(), PublishError>;

    fn publish_order_delivered(&self, event: OrderDelivered) -> Result<(), PublishError>;

    fn publish_order_cancelled(&self, event: OrderCancelled) -> Result<(), PublishError>;
}

/// [`OrderEventPublisher`] over an [`EventBus`] of envelopes.
#[derive(Debug, Clone)]
pub struct BusOrderEventPublisher<B> {
    bus: B,
}

impl<B> BusOrderEventPublisher<B>
where
    B: EventBus<OrderEnvelope>,
{
    pub fn new(bus: B) -> Self {
        Self { bus }
    }

    fn publish(&self, event: OrderEvent) -> Result<(), PublishError> {
        let event_type = event.event_type();
        let order_id = event.order_id();
        let envelope = EventEnvelope::new(event);

        debug!(event_id = %envelope.event_id(), event_type, %order_id, "publishing order event");

        self.bus.publish(envelope).map_err(|e| PublishError::Bus {
            event_type,
            reason: e.to_string(),
        })
    }
}

impl<B> OrderEventPublisher for BusOrderEventPublisher<B>
where
    B: EventBus<OrderEnvelope>,
{
    fn publish_order_created(&self, event: OrderCreated) -> Result<(), PublishError> {
        self.publish(event.into())
    }

    fn publish_order_status_updated(&self, event: OrderStatusUpdated) -> Result<(), PublishError> {
        self.publish(event.into())
    }

    fn publish_order_shipped(&self, event: OrderShipped) -> Result<(), PublishError> {
        self.publish(event.into())
    }

    fn publish_order_delivered(&self, event: OrderDelivered) -> Result<(), PublishError> {
        self.publish(event.into())
    }

    fn publish_order_cancelled(&self, event: OrderCancelled) -> Result<(), PublishError> {
        self.publish(event.into())
    }
}
