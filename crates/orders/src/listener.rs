use async_trait::async_trait;
use tracing::info;

use ordermanager_events::{
    ListenerResult, OrderCancelled, OrderCreated, OrderDelivered, OrderEventListener, OrderShipped,
    OrderStatusUpdated,
};

/// Order module's own observer of its lifecycle events. Logs only.
#[derive(Debug, Clone, Copy, Default)]
pub struct OrderEventProcessor;

impl OrderEventProcessor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl OrderEventListener for OrderEventProcessor {
    fn name(&self) -> &'static str {
        "order"
    }

    async fn on_order_created(&self, event: &OrderCreated) -> ListenerResult {
        info!(order_id = %event.order_id(), lines = event.line_items().len(), "processing created order");
        Ok(())
    }

    async fn on_order_status_updated(&self, event: &OrderStatusUpdated) -> ListenerResult {
        info!(
            order_id = %event.order_id(),
            old_status = event.old_status(),
            new_status = event.new_status(),
            "processing order status change"
        );
        Ok(())
    }

    async fn on_order_shipped(&self, event: &OrderShipped) -> ListenerResult {
        info!(order_id = %event.order_id(), "processing shipped order");
        Ok(())
    }

    async fn on_order_delivered(&self, event: &OrderDelivered) -> ListenerResult {
        info!(order_id = %event.order_id(), "processing delivered order");
        Ok(())
    }

    async fn on_order_cancelled(&self, event: &OrderCancelled) -> ListenerResult {
        info!(order_id = %event.order_id(), reason = event.reason(), "processing cancelled order");
        Ok(())
    }
}
