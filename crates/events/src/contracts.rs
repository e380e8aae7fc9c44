//! Order lifecycle event payloads.
//!
//! Payloads are immutable once built. Constructors that take free-text fields
//! validate them, so a listener never sees a blank status or reason.

use serde::{Deserialize, Serialize};

use ordermanager_core::{DomainError, DomainResult, InventoryItemId, OrderId, ValueObject};

use crate::event::Event;

/// Reason attached to `OrderCancelled` when cancellation comes from a status update.
pub const CANCELLATION_REASON_STATUS_UPDATE: &str = "Order status updated to cancelled";

/// Snapshot of one order line at the time the event was raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItemData {
    pub inventory_item_id: InventoryItemId,
    pub quantity: i64,
    /// Price in smallest currency unit (e.g., cents).
    pub unit_price: u64,
}

impl ValueObject for LineItemData {}

/// An order was persisted with the given lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreated {
    order_id: OrderId,
    line_items: Vec<LineItemData>,
}

impl OrderCreated {
    pub fn new(order_id: OrderId, line_items: Vec<LineItemData>) -> Self {
        Self {
            order_id,
            line_items,
        }
    }

    pub fn order_id(&self) -> OrderId {
        self.order_id
    }

    pub fn line_items(&self) -> &[LineItemData] {
        &self.line_items
    }
}

/// An order moved from one status to another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderStatusUpdated {
    order_id: OrderId,
    old_status: String,
    new_status: String,
}

impl OrderStatusUpdated {
    pub fn new(
        order_id: OrderId,
        old_status: impl Into<String>,
        new_status: impl Into<String>,
    ) -> DomainResult<Self> {
        let old_status = non_blank(old_status.into(), "old status")?;
        let new_status = non_blank(new_status.into(), "new status")?;
        Ok(Self {
            order_id,
            old_status,
            new_status,
        })
    }

    pub fn order_id(&self) -> OrderId {
        self.order_id
    }

    pub fn old_status(&self) -> &str {
        &self.old_status
    }

    pub fn new_status(&self) -> &str {
        &self.new_status
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderShipped {
    order_id: OrderId,
}

impl OrderShipped {
    pub fn new(order_id: OrderId) -> Self {
        Self { order_id }
    }

    pub fn order_id(&self) -> OrderId {
        self.order_id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDelivered {
    order_id: OrderId,
}

impl OrderDelivered {
    pub fn new(order_id: OrderId) -> Self {
        Self { order_id }
    }

    pub fn order_id(&self) -> OrderId {
        self.order_id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCancelled {
    order_id: OrderId,
    reason: String,
}

impl OrderCancelled {
    pub fn new(order_id: OrderId, reason: impl Into<String>) -> DomainResult<Self> {
        let reason = non_blank(reason.into(), "reason")?;
        Ok(Self { order_id, reason })
    }

    pub fn order_id(&self) -> OrderId {
        self.order_id
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}

impl ValueObject for OrderCreated {}
impl ValueObject for OrderStatusUpdated {}
impl ValueObject for OrderShipped {}
impl ValueObject for OrderDelivered {}
impl ValueObject for OrderCancelled {}

/// Tagged union over every event the order module publishes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum OrderEvent {
    OrderCreated(OrderCreated),
    OrderStatusUpdated(OrderStatusUpdated),
    OrderShipped(OrderShipped),
    OrderDelivered(OrderDelivered),
    OrderCancelled(OrderCancelled),
}

impl OrderEvent {
    pub fn order_id(&self) -> OrderId {
        match self {
            OrderEvent::OrderCreated(e) => e.order_id(),
            OrderEvent::OrderStatusUpdated(e) => e.order_id(),
            OrderEvent::OrderShipped(e) => e.order_id(),
            OrderEvent::OrderDelivered(e) => e.order_id(),
            OrderEvent::OrderCancelled(e) => e.order_id(),
        }
    }
}

impl Event for OrderEvent {
    fn event_type(&self) -> &'static str {
        match self {
            OrderEvent::OrderCreated(_) => "order.created",
            OrderEvent::OrderStatusUpdated(_) => "order.status_updated",
            OrderEvent::OrderShipped(_) => "order.shipped",
            OrderEvent::OrderDelivered(_) => "order.delivered",
            OrderEvent::OrderCancelled(_) => "order.cancelled",
        }
    }

    fn version(&self) -> u32 {
        1
    }
}

impl From<OrderCreated> for OrderEvent {
    fn from(value: OrderCreated) -> Self {
        OrderEvent::OrderCreated(value)
    }
}

impl From<OrderStatusUpdated> for OrderEvent {
    fn from(value: OrderStatusUpdated) -> Self {
        OrderEvent::OrderStatusUpdated(value)
    }
}

impl From<OrderShipped> for OrderEvent {
    fn from(value: OrderShipped) -> Self {
        OrderEvent::OrderShipped(value)
    }
}

impl From<OrderDelivered> for OrderEvent {
    fn from(value: OrderDelivered) -> Self {
        OrderEvent::OrderDelivered(value)
    }
}

impl From<OrderCancelled> for OrderEvent {
    fn from(value: OrderCancelled) -> Self {
        OrderEvent::OrderCancelled(value)
    }
}

fn non_blank(value: String, field: &str) -> DomainResult<String> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(format!("{field} must not be blank")));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_updated_rejects_blank_statuses() {
        let order_id = OrderId::new(1);
        assert!(OrderStatusUpdated::new(order_id, "", "SHIPPED").is_err());
        assert!(OrderStatusUpdated::new(order_id, "PENDING", "   ").is_err());

        let ev = OrderStatusUpdated::new(order_id, "PENDING", "SHIPPED").unwrap();
        assert_eq!(ev.old_status(), "PENDING");
        assert_eq!(ev.new_status(), "SHIPPED");
    }

    #[test]
    fn cancelled_rejects_blank_reason() {
        let err = OrderCancelled::new(OrderId::new(1), "\t").unwrap_err();
        assert_eq!(err, DomainError::validation("reason must not be blank"));
    }

    #[test]
    fn event_type_names_are_stable() {
        let id = OrderId::new(3);
        let events: Vec<OrderEvent> = vec![
            OrderCreated::new(id, vec![]).into(),
            OrderStatusUpdated::new(id, "PENDING", "X").unwrap().into(),
            OrderShipped::new(id).into(),
            OrderDelivered::new(id).into(),
            OrderCancelled::new(id, CANCELLATION_REASON_STATUS_UPDATE).unwrap().into(),
        ];
        let names: Vec<_> = events.iter().map(|e| e.event_type()).collect();
        assert_eq!(
            names,
            [
                "order.created",
                "order.status_updated",
                "order.shipped",
                "order.delivered",
                "order.cancelled"
            ]
        );
        assert!(events.iter().all(|e| e.order_id() == id));
    }

    #[test]
    fn created_serializes_line_snapshot_in_camel_case() {
        let ev = OrderEvent::from(OrderCreated::new(
            OrderId::new(10),
            vec![LineItemData {
                inventory_item_id: InventoryItemId::new(100),
                quantity: 2,
                unit_price: 1000,
            }],
        ));
        let json = serde_json::to_value(&ev).unwrap();
        assert_eq!(json["type"], "OrderCreated");
        assert_eq!(json["data"]["orderId"], 10);
        assert_eq!(json["data"]["lineItems"][0]["inventoryItemId"], 100);
        assert_eq!(json["data"]["lineItems"][0]["unitPrice"], 1000);
    }
}
