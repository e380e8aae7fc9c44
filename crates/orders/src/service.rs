//! Order use cases: list, look up, place, change status, delete.

use std::fmt::Display;
use std::sync::Arc;

use thiserror::Error;
use tracing::{info, instrument};

use ordermanager_core::{CustomerId, Entity, InventoryItemId, OrderId};
use ordermanager_customer::CustomerManagement;
use ordermanager_events::{
    OrderCancelled, OrderCreated, OrderDelivered, OrderShipped, OrderStatusUpdated,
    CANCELLATION_REASON_STATUS_UPDATE,
};
use ordermanager_inventory::InventoryManagement;

use crate::order::{NewOrder, Order};
use crate::publisher::OrderEventPublisher;
use crate::repository::OrderRepository;
use crate::status::LifecycleTransition;

/// Unit price applied to every line until pricing exists (10.00).
pub const DEFAULT_UNIT_PRICE: u64 = 1000;

/// Failure of an order use case. The message is meant for the caller.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OrderError {
    /// The addressed order does not exist.
    #[error("{0}")]
    NotFound(String),

    /// The request referenced a customer or inventory item that does not exist.
    #[error("{0}")]
    BadRequest(String),

    /// Anything else: storage, publishing or validation failures.
    #[error("{0}")]
    Internal(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderLineRequest {
    pub inventory_item_id: InventoryItemId,
    pub quantity: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateOrder {
    pub customer_id: CustomerId,
    pub items: Vec<OrderLineRequest>,
}

pub struct OrderService {
    orders: Arc<dyn OrderRepository>,
    customers: Arc<dyn CustomerManagement>,
    inventory: Arc<dyn InventoryManagement>,
    publisher: Arc<dyn OrderEventPublisher>,
    unit_price: u64,
}

impl OrderService {
    pub fn new(
        orders: Arc<dyn OrderRepository>,
        customers: Arc<dyn CustomerManagement>,
        inventory: Arc<dyn InventoryManagement>,
        publisher: Arc<dyn OrderEventPublisher>,
    ) -> Self {
        Self {
            orders,
            customers,
            inventory,
            publisher,
            unit_price: DEFAULT_UNIT_PRICE,
        }
    }

    pub fn with_unit_price(mut self, unit_price: u64) -> Self {
        self.unit_price = unit_price;
        self
    }

    pub fn unit_price(&self) -> u64 {
        self.unit_price
    }

    pub async fn list(&self) -> Result<Vec<Order>, OrderError> {
        self.orders
            .find_all()
            .await
            .map_err(|e| OrderError::Internal(e.to_string()))
    }

    pub async fn get(&self, id: OrderId) -> Result<Order, OrderError> {
        self.orders
            .find_by_id(id)
            .await
            .map_err(|e| OrderError::Internal(e.to_string()))?
            .ok_or_else(|| order_not_found(id))
    }

    /// Place an order.
    ///
    /// The customer and every referenced inventory item must exist; nothing is
    /// stored or published otherwise. Stock is not checked here: the inventory
    /// module decrements it when it sees `OrderCreated`.
    #[instrument(skip(self, request), fields(customer_id = %request.customer_id, lines = request.items.len()))]
    pub async fn create(&self, request: CreateOrder) -> Result<Order, OrderError> {
        let customer = self
            .customers
            .find_by_id(request.customer_id)
            .await
            .map_err(create_failed)?
            .ok_or_else(|| {
                OrderError::BadRequest(format!("Customer not found with id: {}", request.customer_id))
            })?;

        let mut draft = NewOrder::new(customer);
        for line in &request.items {
            let item = self
                .inventory
                .find_by_id(line.inventory_item_id)
                .await
                .map_err(create_failed)?
                .ok_or_else(|| {
                    OrderError::BadRequest(format!(
                        "Inventory item not found with id: {}",
                        line.inventory_item_id
                    ))
                })?;

            draft
                .add_line_item(item.id(), line.quantity, self.unit_price)
                .map_err(create_failed)?;
        }

        let order = self.orders.insert(draft).await.map_err(create_failed)?;

        self.publisher
            .publish_order_created(OrderCreated::new(order.id(), order.line_item_data()))
            .map_err(create_failed)?;

        info!(order_id = %order.id(), total = order.total_amount(), "order created");
        Ok(order)
    }

    /// Set a new status and publish the matching lifecycle events.
    ///
    /// `OrderStatusUpdated` is always published; `SHIPPED`, `DELIVERED` and
    /// `CANCELLED` (any case) additionally publish their dedicated event.
    #[instrument(skip(self))]
    pub async fn update_status(&self, id: OrderId, new_status: &str) -> Result<Order, OrderError> {
        let mut order = self
            .orders
            .find_by_id(id)
            .await
            .map_err(status_update_failed)?
            .ok_or_else(|| order_not_found(id))?;

        let updated = OrderStatusUpdated::new(id, order.status(), new_status)
            .map_err(status_update_failed)?;
        let old_status = order.set_status(new_status);

        let order = self.orders.update(order).await.map_err(status_update_failed)?;

        self.publisher
            .publish_order_status_updated(updated)
            .map_err(status_update_failed)?;

        match LifecycleTransition::classify(new_status) {
            LifecycleTransition::Shipped => self
                .publisher
                .publish_order_shipped(OrderShipped::new(id))
                .map_err(status_update_failed)?,
            LifecycleTransition::Delivered => self
                .publisher
                .publish_order_delivered(OrderDelivered::new(id))
                .map_err(status_update_failed)?,
            LifecycleTransition::Cancelled => {
                let cancelled = OrderCancelled::new(id, CANCELLATION_REASON_STATUS_UPDATE)
                    .map_err(status_update_failed)?;
                self.publisher
                    .publish_order_cancelled(cancelled)
                    .map_err(status_update_failed)?
            }
            LifecycleTransition::Other => {}
        }

        info!(order_id = %id, %old_status, new_status, "order status updated");
        Ok(order)
    }

    /// Delete an order and its line items.
    pub async fn delete(&self, id: OrderId) -> Result<(), OrderError> {
        let removed = self
            .orders
            .delete_by_id(id)
            .await
            .map_err(|e| OrderError::Internal(e.to_string()))?;

        if !removed {
            return Err(order_not_found(id));
        }

        info!(order_id = %id, "order deleted");
        Ok(())
    }
}

fn order_not_found(id: OrderId) -> OrderError {
    OrderError::NotFound(format!("Order not found with id: {id}"))
}

fn create_failed(err: impl Display) -> OrderError {
    OrderError::Internal(format!("Failed to create order: {err}"))
}

fn status_update_failed(err: impl Display) -> OrderError {
    OrderError::Internal(format!("Failed to update order status: {err}"))
}
