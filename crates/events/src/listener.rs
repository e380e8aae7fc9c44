//! Listener contract: one typed handler per event variant.
//!
//! Modules register a listener by implementing [`OrderEventListener`] and handing
//! it to a worker that drains a bus subscription. Routing from the tagged union to
//! the handler is the explicit `match` in [`dispatch`].

use async_trait::async_trait;

use crate::contracts::{
    OrderCancelled, OrderCreated, OrderDelivered, OrderEvent, OrderShipped, OrderStatusUpdated,
};

/// Outcome of a listener handler. Errors are logged by the worker, never returned
/// to the publisher.
pub type ListenerResult = anyhow::Result<()>;

/// Reacts to order lifecycle events. Every handler defaults to a no-op.
#[async_trait]
pub trait OrderEventListener: Send + Sync + 'static {
    /// Stable name used in logs (e.g. "inventory").
    fn name(&self) -> &'static str;

    async fn on_order_created(&self, _event: &OrderCreated) -> ListenerResult {
        Ok(())
    }

    async fn on_order_status_updated(&self, _event: &OrderStatusUpdated) -> ListenerResult {
        Ok(())
    }

    async fn on_order_shipped(&self, _event: &OrderShipped) -> ListenerResult {
        Ok(())
    }

    async fn on_order_delivered(&self, _event: &OrderDelivered) -> ListenerResult {
        Ok(())
    }

    async fn on_order_cancelled(&self, _event: &OrderCancelled) -> ListenerResult {
        Ok(())
    }
}

/// Route one event to the matching handler of `listener`.
pub async fn dispatch<L>(listener: &L, event: &OrderEvent) -> ListenerResult
where
    L: OrderEventListener + ?Sized,
{
    match event {
        OrderEvent::OrderCreated(e) => listener.on_order_created(e).await,
        OrderEvent::OrderStatusUpdated(e) => listener.on_order_status_updated(e).await,
        OrderEvent::OrderShipped(e) => listener.on_order_shipped(e).await,
        OrderEvent::OrderDelivered(e) => listener.on_order_delivered(e).await,
        OrderEvent::OrderCancelled(e) => listener.on_order_cancelled(e).await,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use ordermanager_core::OrderId;

    use super::*;

    #[derive(Default)]
    struct Recorder {
        seen: Mutex<Vec<&'static str>>,
    }

    #[async_trait]
    impl OrderEventListener for Recorder {
        fn name(&self) -> &'static str {
            "recorder"
        }

        async fn on_order_shipped(&self, _event: &OrderShipped) -> ListenerResult {
            self.seen.lock().unwrap().push("shipped");
            Ok(())
        }

        async fn on_order_cancelled(&self, event: &OrderCancelled) -> ListenerResult {
            anyhow::bail!("cannot handle cancellation of {}", event.order_id())
        }
    }

    #[tokio::test]
    async fn dispatch_routes_by_variant() {
        let listener = Recorder::default();
        let id = OrderId::new(5);

        dispatch(&listener, &OrderShipped::new(id).into()).await.unwrap();
        dispatch(&listener, &OrderDelivered::new(id).into()).await.unwrap();

        assert_eq!(*listener.seen.lock().unwrap(), vec!["shipped"]);
    }

    #[tokio::test]
    async fn dispatch_returns_handler_errors() {
        let listener = Recorder::default();
        let ev = OrderCancelled::new(OrderId::new(9), "changed mind").unwrap();

        let err = dispatch(&listener, &ev.into()).await.unwrap_err();
        assert_eq!(err.to_string(), "cannot handle cancellation of 9");
    }
}
