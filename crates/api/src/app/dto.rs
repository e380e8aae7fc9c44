use serde::Deserialize;
use serde_json::{Value, json};

use ordermanager_core::{CustomerId, Entity, InventoryItemId};
use ordermanager_customer::Customer;
use ordermanager_inventory::InventoryItem;
use ordermanager_orders::{CreateOrder, LineItem, Order, OrderLineRequest};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct CreateCustomerRequest {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateInventoryItemRequest {
    pub name: String,
    pub description: String,
    pub stock: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItemRequest {
    pub inventory_item_id: InventoryItemId,
    pub quantity: i32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub customer_id: CustomerId,
    pub items: Vec<LineItemRequest>,
}

impl From<CreateOrderRequest> for CreateOrder {
    fn from(body: CreateOrderRequest) -> Self {
        CreateOrder {
            customer_id: body.customer_id,
            items: body
                .items
                .into_iter()
                .map(|line| OrderLineRequest {
                    inventory_item_id: line.inventory_item_id,
                    quantity: i64::from(line.quantity),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: String,
}

// -------------------------
// JSON mapping helpers
// -------------------------

pub fn customer_to_json(c: &Customer) -> Value {
    json!({
        "id": c.id(),
        "name": c.name(),
        "email": c.email(),
    })
}

pub fn inventory_item_to_json(item: &InventoryItem) -> Value {
    json!({
        "id": item.id(),
        "name": item.name(),
        "description": item.description(),
        "stock": item.stock(),
    })
}

/// Amounts are in cents.
pub fn order_to_json(order: &Order) -> Value {
    json!({
        "id": order.id(),
        "customer": customer_to_json(order.customer()),
        "orderDate": order.order_date().to_rfc3339(),
        "status": order.status(),
        "lineItems": order.line_items().iter().map(line_item_to_json).collect::<Vec<_>>(),
        "totalAmount": order.total_amount(),
    })
}

fn line_item_to_json(line: &LineItem) -> Value {
    json!({
        "id": line.id(),
        "inventoryItemId": line.inventory_item_id(),
        "quantity": line.quantity(),
        "unitPrice": line.unit_price(),
        "total": line.total(),
    })
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use ordermanager_core::{LineItemId, OrderId};
    use ordermanager_orders::NewOrder;

    use super::*;

    #[test]
    fn order_json_uses_camel_case_and_nests_customer() {
        let customer = Customer::from_parts(
            CustomerId::new(1),
            "Test Customer".to_string(),
            "test@example.com".to_string(),
        );
        let mut draft = NewOrder::placed_at(customer, Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap());
        draft.add_line_item(InventoryItemId::new(100), 2, 1000).unwrap();
        let order = draft
            .into_order(OrderId::new(10), [LineItemId::new(5)])
            .unwrap();

        let json = order_to_json(&order);

        assert_eq!(json["id"], 10);
        assert_eq!(json["customer"]["name"], "Test Customer");
        assert_eq!(json["orderDate"], "2025-03-01T12:00:00+00:00");
        assert_eq!(json["status"], "PENDING");
        assert_eq!(json["lineItems"][0]["inventoryItemId"], 100);
        assert_eq!(json["lineItems"][0]["unitPrice"], 1000);
        assert_eq!(json["lineItems"][0]["total"], 2000);
        assert_eq!(json["totalAmount"], 2000);
    }

    #[test]
    fn order_request_accepts_camel_case_and_requires_items() {
        assert!(serde_json::from_value::<CreateOrderRequest>(json!({"customerId": 1})).is_err());

        let body: CreateOrderRequest =
            serde_json::from_value(json!({"customerId": 1, "items": []})).unwrap();
        assert!(body.items.is_empty());

        let body: CreateOrderRequest = serde_json::from_value(json!({
            "customerId": 1,
            "items": [{"inventoryItemId": 100, "quantity": 2}]
        }))
        .unwrap();
        let cmd = CreateOrder::from(body);
        assert_eq!(cmd.customer_id, CustomerId::new(1));
        assert_eq!(cmd.items[0].inventory_item_id, InventoryItemId::new(100));
        assert_eq!(cmd.items[0].quantity, 2);
    }
}
