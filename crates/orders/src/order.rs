use chrono::{DateTime, Utc};

use ordermanager_core::{DomainError, DomainResult, Entity, InventoryItemId, LineItemId, OrderId};
use ordermanager_customer::Customer;
use ordermanager_events::LineItemData;

use crate::status;

/// Largest quantity a single line may carry.
pub const MAX_LINE_QUANTITY: i64 = i32::MAX as i64;

/// Order line before it has been stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLineItem {
    inventory_item_id: InventoryItemId,
    quantity: i64,
    unit_price: u64,
}

impl NewLineItem {
    pub fn new(inventory_item_id: InventoryItemId, quantity: i64, unit_price: u64) -> DomainResult<Self> {
        if quantity <= 0 {
            return Err(DomainError::validation("quantity must be greater than 0"));
        }
        if quantity > MAX_LINE_QUANTITY {
            return Err(DomainError::validation(format!(
                "quantity must not exceed {MAX_LINE_QUANTITY}"
            )));
        }
        Ok(Self {
            inventory_item_id,
            quantity,
            unit_price,
        })
    }

    pub fn inventory_item_id(&self) -> InventoryItemId {
        self.inventory_item_id
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    pub fn unit_price(&self) -> u64 {
        self.unit_price
    }

    pub fn into_line_item(self, id: LineItemId) -> LineItem {
        LineItem {
            id,
            inventory_item_id: self.inventory_item_id,
            quantity: self.quantity,
            unit_price: self.unit_price,
        }
    }
}

/// Order line: inventory item, quantity and the unit price at time of order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineItem {
    id: LineItemId,
    inventory_item_id: InventoryItemId,
    quantity: i64,
    /// Price in smallest currency unit (e.g., cents).
    unit_price: u64,
}

impl LineItem {
    pub fn from_parts(
        id: LineItemId,
        inventory_item_id: InventoryItemId,
        quantity: i64,
        unit_price: u64,
    ) -> Self {
        Self {
            id,
            inventory_item_id,
            quantity,
            unit_price,
        }
    }

    pub fn id(&self) -> LineItemId {
        self.id
    }

    pub fn inventory_item_id(&self) -> InventoryItemId {
        self.inventory_item_id
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    pub fn unit_price(&self) -> u64 {
        self.unit_price
    }

    /// `unit_price * quantity`, clamped at `u64::MAX`.
    ///
    /// Quantity is capped at [`MAX_LINE_QUANTITY`], so with the default price the
    /// clamp is unreachable; only a configured unit price above ~8.6e9 can hit it.
    pub fn total(&self) -> u64 {
        // quantity is positive for every line built through `NewLineItem`
        self.unit_price.saturating_mul(self.quantity.unsigned_abs())
    }

    pub fn to_event_data(&self) -> LineItemData {
        LineItemData {
            inventory_item_id: self.inventory_item_id,
            quantity: self.quantity,
            unit_price: self.unit_price,
        }
    }
}

/// An order being assembled, not yet stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    customer: Customer,
    order_date: DateTime<Utc>,
    status: String,
    line_items: Vec<NewLineItem>,
}

impl NewOrder {
    /// Start a `PENDING` order for `customer`, dated now.
    pub fn new(customer: Customer) -> Self {
        Self::placed_at(customer, Utc::now())
    }

    pub fn placed_at(customer: Customer, order_date: DateTime<Utc>) -> Self {
        Self {
            customer,
            order_date,
            status: status::PENDING.to_string(),
            line_items: Vec::new(),
        }
    }

    pub fn add_line_item(
        &mut self,
        inventory_item_id: InventoryItemId,
        quantity: i64,
        unit_price: u64,
    ) -> DomainResult<()> {
        self.line_items
            .push(NewLineItem::new(inventory_item_id, quantity, unit_price)?);
        Ok(())
    }

    pub fn customer(&self) -> &Customer {
        &self.customer
    }

    pub fn order_date(&self) -> DateTime<Utc> {
        self.order_date
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn line_items(&self) -> &[NewLineItem] {
        &self.line_items
    }

    /// Attach the identities assigned by the store.
    ///
    /// `line_ids` must yield one id per line, in line order.
    pub fn into_order(self, id: OrderId, line_ids: impl IntoIterator<Item = LineItemId>) -> DomainResult<Order> {
        let mut line_ids = line_ids.into_iter();
        let line_items = self
            .line_items
            .into_iter()
            .map(|line| {
                line_ids
                    .next()
                    .map(|line_id| line.into_line_item(line_id))
                    .ok_or_else(|| DomainError::invariant("fewer line item ids than lines"))
            })
            .collect::<DomainResult<Vec<_>>>()?;

        Ok(Order {
            id,
            customer: self.customer,
            order_date: self.order_date,
            status: self.status,
            line_items,
        })
    }
}

/// A stored order with its line items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    id: OrderId,
    customer: Customer,
    order_date: DateTime<Utc>,
    status: String,
    line_items: Vec<LineItem>,
}

impl Order {
    /// Rehydrate a stored row.
    pub fn from_parts(
        id: OrderId,
        customer: Customer,
        order_date: DateTime<Utc>,
        status: String,
        line_items: Vec<LineItem>,
    ) -> Self {
        Self {
            id,
            customer,
            order_date,
            status,
            line_items,
        }
    }

    pub fn customer(&self) -> &Customer {
        &self.customer
    }

    pub fn order_date(&self) -> DateTime<Utc> {
        self.order_date
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    /// Replace the status, returning the previous one. The value is stored as given.
    pub fn set_status(&mut self, status: impl Into<String>) -> String {
        std::mem::replace(&mut self.status, status.into())
    }

    pub fn line_items(&self) -> &[LineItem] {
        &self.line_items
    }

    /// Sum of line totals, clamped at `u64::MAX` like [`LineItem::total`].
    pub fn total_amount(&self) -> u64 {
        self.line_items
            .iter()
            .fold(0u64, |acc, line| acc.saturating_add(line.total()))
    }

    /// Snapshot of the lines as carried by `OrderCreated`.
    pub fn line_item_data(&self) -> Vec<LineItemData> {
        self.line_items.iter().map(LineItem::to_event_data).collect()
    }
}

impl Entity for Order {
    type Id = OrderId;

    const KIND: &'static str = "order";

    fn id(&self) -> OrderId {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use ordermanager_core::CustomerId;
    use ordermanager_customer::NewCustomer;

    use super::*;

    fn test_customer() -> Customer {
        NewCustomer::new("John Doe", "john.doe@example.com")
            .unwrap()
            .into_customer(CustomerId::new(1))
    }

    fn line_ids() -> impl Iterator<Item = LineItemId> {
        (1..).map(LineItemId::new)
    }

    #[test]
    fn new_orders_start_pending_without_lines() {
        let draft = NewOrder::new(test_customer());
        assert_eq!(draft.status(), "PENDING");
        assert!(draft.line_items().is_empty());
        assert_eq!(draft.customer().id(), CustomerId::new(1));
    }

    #[test]
    fn add_line_item_rejects_non_positive_quantity() {
        let mut draft = NewOrder::new(test_customer());
        assert_eq!(
            draft.add_line_item(InventoryItemId::new(100), 0, 1000),
            Err(DomainError::validation("quantity must be greater than 0"))
        );
        assert!(draft.add_line_item(InventoryItemId::new(100), -2, 1000).is_err());
        assert!(draft.line_items().is_empty());
    }

    #[test]
    fn add_line_item_caps_quantity() {
        let mut draft = NewOrder::new(test_customer());
        draft
            .add_line_item(InventoryItemId::new(100), MAX_LINE_QUANTITY, 1000)
            .unwrap();
        assert_eq!(
            draft.add_line_item(InventoryItemId::new(100), MAX_LINE_QUANTITY + 1, 1000),
            Err(DomainError::validation("quantity must not exceed 2147483647"))
        );
        assert!(draft.add_line_item(InventoryItemId::new(100), i64::MAX, 1000).is_err());
        assert_eq!(draft.line_items().len(), 1);
    }

    #[test]
    fn totals_follow_price_times_quantity() {
        let mut draft = NewOrder::new(test_customer());
        draft.add_line_item(InventoryItemId::new(100), 2, 1000).unwrap();
        draft.add_line_item(InventoryItemId::new(101), 3, 250).unwrap();

        let order = draft.into_order(OrderId::new(7), line_ids()).unwrap();

        assert_eq!(order.line_items()[0].total(), 2000);
        assert_eq!(order.line_items()[1].total(), 750);
        assert_eq!(order.total_amount(), 2750);
        assert_eq!(order.line_items()[1].id(), LineItemId::new(2));
    }

    #[test]
    fn into_order_requires_an_id_per_line() {
        let mut draft = NewOrder::new(test_customer());
        draft.add_line_item(InventoryItemId::new(100), 1, 1000).unwrap();
        draft.add_line_item(InventoryItemId::new(101), 1, 1000).unwrap();

        let err = draft
            .into_order(OrderId::new(1), [LineItemId::new(1)])
            .unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(_)));
    }

    #[test]
    fn set_status_keeps_case_and_returns_previous() {
        let mut order = NewOrder::new(test_customer())
            .into_order(OrderId::new(1), line_ids())
            .unwrap();

        let old = order.set_status("shipped");
        assert_eq!(old, "PENDING");
        assert_eq!(order.status(), "shipped");
    }

    #[test]
    fn event_snapshot_matches_lines() {
        let mut draft = NewOrder::new(test_customer());
        draft.add_line_item(InventoryItemId::new(100), 2, 1000).unwrap();
        let order = draft.into_order(OrderId::new(1), line_ids()).unwrap();

        assert_eq!(
            order.line_item_data(),
            vec![LineItemData {
                inventory_item_id: InventoryItemId::new(100),
                quantity: 2,
                unit_price: 1000,
            }]
        );
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn total_is_sum_of_line_totals(
                lines in prop::collection::vec((1i64..1_000, 0u64..100_000), 0..20)
            ) {
                let mut draft = NewOrder::new(test_customer());
                for (i, (quantity, price)) in lines.iter().enumerate() {
                    draft.add_line_item(InventoryItemId::new(i as i64 + 1), *quantity, *price).unwrap();
                }
                let order = draft.into_order(OrderId::new(1), line_ids()).unwrap();

                let expected: u64 = lines.iter().map(|(q, p)| *q as u64 * *p).sum();
                prop_assert_eq!(order.total_amount(), expected);
                prop_assert_eq!(order.line_items().len(), lines.len());
            }
        }
    }
}
