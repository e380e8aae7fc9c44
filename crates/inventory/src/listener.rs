use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use tracing::{debug, info, warn};

use ordermanager_events::{
    ListenerResult, OrderCancelled, OrderCreated, OrderDelivered, OrderEventListener, OrderShipped,
    OrderStatusUpdated,
};

use crate::repository::InventoryRepository;

/// Keeps stock levels in step with placed orders.
///
/// Each line of an `OrderCreated` is applied as load, decrement, save with no lock
/// held in between. Events may be handled concurrently, so two orders for the same
/// item can lose an update.
#[derive(Clone)]
pub struct InventoryEventListener {
    inventory: Arc<dyn InventoryRepository>,
}

impl InventoryEventListener {
    pub fn new(inventory: Arc<dyn InventoryRepository>) -> Self {
        Self { inventory }
    }
}

#[async_trait]
impl OrderEventListener for InventoryEventListener {
    fn name(&self) -> &'static str {
        "inventory"
    }

    async fn on_order_created(&self, event: &OrderCreated) -> ListenerResult {
        info!(order_id = %event.order_id(), "reserving stock for new order");

        for line in event.line_items() {
            let item_id = line.inventory_item_id;
            let Some(mut item) = self
                .inventory
                .find_by_id(item_id)
                .await
                .with_context(|| format!("loading inventory item {item_id}"))?
            else {
                debug!(order_id = %event.order_id(), %item_id, "inventory item vanished; skipping line");
                continue;
            };

            item.decrement_stock(line.quantity).with_context(|| {
                format!("applying order {} to inventory item {item_id}", event.order_id())
            })?;
            let saved = self
                .inventory
                .update(item)
                .await
                .with_context(|| format!("saving stock for inventory item {item_id}"))?;

            info!(%item_id, stock = saved.stock(), "updated stock for inventory item");
        }

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
        info!(order_id = %event.order_id(), "shipped order needs no stock change");
        Ok(())
    }

    async fn on_order_delivered(&self, event: &OrderDelivered) -> ListenerResult {
        info!(order_id = %event.order_id(), "delivered order needs no stock change");
        Ok(())
    }

    async fn on_order_cancelled(&self, event: &OrderCancelled) -> ListenerResult {
        info!(order_id = %event.order_id(), reason = event.reason(), "order cancelled");
        // TODO: restock the cancelled order's lines once OrderCancelled carries them.
        warn!(order_id = %event.order_id(), "stock is not restored for cancelled orders");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    use ordermanager_core::{Entity, InventoryItemId, OrderId, Repository, StoreError, StoreResult};
    use ordermanager_events::{LineItemData, OrderEvent, dispatch};

    use super::*;
    use crate::item::{InventoryItem, NewInventoryItem};

    #[derive(Default)]
    struct FakeInventory {
        rows: Mutex<BTreeMap<InventoryItemId, InventoryItem>>,
    }

    impl FakeInventory {
        fn with(items: &[(i64, i64)]) -> Arc<Self> {
            let repo = Self::default();
            for (id, stock) in items {
                let item = NewInventoryItem::new("Item", "Test item", *stock)
                    .unwrap()
                    .into_item(InventoryItemId::new(*id));
                repo.rows.lock().unwrap().insert(item.id(), item);
            }
            Arc::new(repo)
        }

        fn stock(&self, id: i64) -> i64 {
            self.rows.lock().unwrap()[&InventoryItemId::new(id)].stock()
        }
    }

    #[async_trait]
    impl Repository<InventoryItem> for FakeInventory {
        type Draft = NewInventoryItem;

        async fn find_all(&self) -> StoreResult<Vec<InventoryItem>> {
            Ok(self.rows.lock().unwrap().values().cloned().collect())
        }

        async fn find_by_id(&self, id: InventoryItemId) -> StoreResult<Option<InventoryItem>> {
            Ok(self.rows.lock().unwrap().get(&id).cloned())
        }

        async fn exists_by_id(&self, id: InventoryItemId) -> StoreResult<bool> {
            Ok(self.rows.lock().unwrap().contains_key(&id))
        }

        async fn insert(&self, _draft: NewInventoryItem) -> StoreResult<InventoryItem> {
            Err(StoreError::unavailable("insert not supported by fake"))
        }

        async fn update(&self, entity: InventoryItem) -> StoreResult<InventoryItem> {
            self.rows.lock().unwrap().insert(entity.id(), entity.clone());
            Ok(entity)
        }

        async fn delete_by_id(&self, id: InventoryItemId) -> StoreResult<bool> {
            Ok(self.rows.lock().unwrap().remove(&id).is_some())
        }
    }

    fn line(item: i64, quantity: i64) -> LineItemData {
        LineItemData {
            inventory_item_id: InventoryItemId::new(item),
            quantity,
            unit_price: 1000,
        }
    }

    #[tokio::test]
    async fn order_created_decrements_each_referenced_item() {
        let repo = FakeInventory::with(&[(100, 10), (101, 5)]);
        let listener = InventoryEventListener::new(repo.clone());

        let event = OrderCreated::new(OrderId::new(1), vec![line(100, 2), line(101, 5)]);
        dispatch(&listener, &event.into()).await.unwrap();

        assert_eq!(repo.stock(100), 8);
        assert_eq!(repo.stock(101), 0);
    }

    #[tokio::test]
    async fn unknown_items_are_skipped() {
        let repo = FakeInventory::with(&[(100, 10)]);
        let listener = InventoryEventListener::new(repo.clone());

        let event = OrderCreated::new(OrderId::new(1), vec![line(999, 1), line(100, 1)]);
        dispatch(&listener, &event.into()).await.unwrap();

        assert_eq!(repo.stock(100), 9);
    }

    #[tokio::test]
    async fn stock_has_no_floor() {
        let repo = FakeInventory::with(&[(100, 1)]);
        let listener = InventoryEventListener::new(repo.clone());

        let event = OrderCreated::new(OrderId::new(1), vec![line(100, 4)]);
        dispatch(&listener, &event.into()).await.unwrap();

        assert_eq!(repo.stock(100), -3);
    }

    #[tokio::test]
    async fn overflowing_decrement_fails_and_keeps_stock() {
        let repo = FakeInventory::with(&[(100, 0)]);
        let listener = InventoryEventListener::new(repo.clone());
        let event: OrderEvent = OrderCreated::new(OrderId::new(1), vec![line(100, i64::MAX)]).into();

        dispatch(&listener, &event).await.unwrap();
        assert_eq!(repo.stock(100), -i64::MAX);

        let err = dispatch(&listener, &event).await.unwrap_err();
        assert!(err.to_string().contains("inventory item 100"));
        assert_eq!(repo.stock(100), -i64::MAX);
    }

    #[tokio::test]
    async fn cancellation_leaves_stock_untouched() {
        let repo = FakeInventory::with(&[(100, 3)]);
        let listener = InventoryEventListener::new(repo.clone());

        let event = OrderCancelled::new(OrderId::new(1), "Order status updated to cancelled").unwrap();
        dispatch(&listener, &event.into()).await.unwrap();

        assert_eq!(repo.stock(100), 3);
    }
}
