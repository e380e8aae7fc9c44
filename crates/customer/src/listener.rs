use async_trait::async_trait;
use tracing::info;

use ordermanager_events::{
    ListenerResult, OrderCancelled, OrderCreated, OrderDelivered, OrderEventListener, OrderShipped,
    OrderStatusUpdated,
};

/// Customer-side view of the order lifecycle. Observational only.
#[derive(Debug, Default, Clone, Copy)]
pub struct CustomerEventListener;

#[async_trait]
impl OrderEventListener for CustomerEventListener {
    fn name(&self) -> &'static str {
        "customer"
    }

    async fn on_order_created(&self, event: &OrderCreated) -> ListenerResult {
        info!(order_id = %event.order_id(), "received order confirmation");
        Ok(())
    }

    async fn on_order_status_updated(&self, event: &OrderStatusUpdated) -> ListenerResult {
        info!(
            order_id = %event.order_id(),
            old_status = event.old_status(),
            new_status = event.new_status(),
            "order status updated"
        );
        Ok(())
    }

    async fn on_order_shipped(&self, event: &OrderShipped) -> ListenerResult {
        info!(order_id = %event.order_id(), "order has been shipped");
        Ok(())
    }

    async fn on_order_delivered(&self, event: &OrderDelivered) -> ListenerResult {
        info!(order_id = %event.order_id(), "order has been delivered");
        Ok(())
    }

    async fn on_order_cancelled(&self, event: &OrderCancelled) -> ListenerResult {
        info!(order_id = %event.order_id(), reason = event.reason(), "order has been cancelled");
        Ok(())
    }
}
