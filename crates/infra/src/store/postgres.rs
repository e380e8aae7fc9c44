//! Postgres-backed repositories.
//!
//! ## Schema
//!
//! Four tables with `BIGSERIAL` identities: `customers`, `inventory_items`,
//! `orders` (plural, `order` is reserved) and `line_items`. Line items belong to
//! exactly one order; `line_items.order_id` references `orders(id)` with
//! `ON DELETE CASCADE`.
//!
//! ## Units of work
//!
//! Inserting an order writes the order row and all its line-item rows in one
//! transaction. Deleting an order removes its line items and then the order in one
//! transaction; the cascade on the foreign key is a second line, not the mechanism.
//!
//! ## Error Mapping
//!
//! | SQLx Error | PostgreSQL Error Code | StoreError |
//! |------------|----------------------|------------|
//! | Database (unique violation) | `23505` | `Constraint` |
//! | Database (foreign key violation) | `23503` | `Constraint` |
//! | Database (check constraint violation) | `23514` | `Constraint` |
//! | Database (other) | Any other | `Unavailable` |
//! | PoolClosed / Io / other | N/A | `Unavailable` |
//! | ColumnDecode / row mapping | N/A | `Corrupt` |

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{FromRow, PgPool, Row};
use tracing::{info, instrument};

use ordermanager_core::{
    CustomerId, Entity, InventoryItemId, LineItemId, OrderId, Repository, StoreError, StoreResult,
};
use ordermanager_customer::{Customer, NewCustomer};
use ordermanager_inventory::{InventoryItem, NewInventoryItem};
use ordermanager_orders::{LineItem, NewOrder, Order};

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS customers (
        id BIGSERIAL PRIMARY KEY,
        name TEXT NOT NULL,
        email TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS inventory_items (
        id BIGSERIAL PRIMARY KEY,
        name TEXT NOT NULL,
        description TEXT NOT NULL,
        stock BIGINT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS orders (
        id BIGSERIAL PRIMARY KEY,
        customer_id BIGINT NOT NULL REFERENCES customers (id),
        order_date TIMESTAMPTZ NOT NULL,
        status TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS line_items (
        id BIGSERIAL PRIMARY KEY,
        order_id BIGINT NOT NULL REFERENCES orders (id) ON DELETE CASCADE,
        inventory_item_id BIGINT NOT NULL,
        quantity BIGINT NOT NULL CHECK (quantity > 0),
        unit_price BIGINT NOT NULL CHECK (unit_price >= 0)
    )
    "#,
    "CREATE INDEX IF NOT EXISTS line_items_order_id_idx ON line_items (order_id)",
];

/// Connection pool plus the three repositories built on it.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: Arc<PgPool>,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    pub async fn connect(database_url: &str, max_connections: u32) -> StoreResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;
        Ok(Self::new(pool))
    }

    /// Create missing tables. Safe to run on every start.
    pub async fn ensure_schema(&self) -> StoreResult<()> {
        for statement in SCHEMA {
            sqlx::query(statement)
                .execute(&*self.pool)
                .await
                .map_err(|e| map_sqlx_error("ensure_schema", e))?;
        }
        info!("database schema ready");
        Ok(())
    }

    pub fn customers(&self) -> PostgresCustomerRepository {
        PostgresCustomerRepository {
            pool: self.pool.clone(),
        }
    }

    pub fn inventory(&self) -> PostgresInventoryRepository {
        PostgresInventoryRepository {
            pool: self.pool.clone(),
        }
    }

    pub fn orders(&self) -> PostgresOrderRepository {
        PostgresOrderRepository {
            pool: self.pool.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Customers

#[derive(Debug, Clone)]
pub struct PostgresCustomerRepository {
    pool: Arc<PgPool>,
}

#[async_trait]
impl Repository<Customer> for PostgresCustomerRepository {
    type Draft = NewCustomer;

    async fn find_all(&self) -> StoreResult<Vec<Customer>> {
        let rows = sqlx::query("SELECT id, name, email FROM customers ORDER BY id ASC")
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_all_customers", e))?;

        rows.iter().map(customer_from_row).collect()
    }

    async fn find_by_id(&self, id: CustomerId) -> StoreResult<Option<Customer>> {
        let row = sqlx::query("SELECT id, name, email FROM customers WHERE id = $1")
            .bind(id.get())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_customer", e))?;

        row.as_ref().map(customer_from_row).transpose()
    }

    async fn exists_by_id(&self, id: CustomerId) -> StoreResult<bool> {
        exists(&self.pool, "SELECT EXISTS (SELECT 1 FROM customers WHERE id = $1)", id.get()).await
    }

    #[instrument(skip(self, draft), err)]
    async fn insert(&self, draft: NewCustomer) -> StoreResult<Customer> {
        let id: i64 = sqlx::query_scalar("INSERT INTO customers (name, email) VALUES ($1, $2) RETURNING id")
            .bind(draft.name())
            .bind(draft.email())
            .fetch_one(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("insert_customer", e))?;

        Ok(draft.into_customer(CustomerId::new(id)))
    }

    async fn update(&self, entity: Customer) -> StoreResult<Customer> {
        let result = sqlx::query("UPDATE customers SET name = $2, email = $3 WHERE id = $1")
            .bind(entity.id().get())
            .bind(entity.name())
            .bind(entity.email())
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("update_customer", e))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found(Customer::KIND, entity.id()));
        }
        Ok(entity)
    }

    async fn delete_by_id(&self, id: CustomerId) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM customers WHERE id = $1")
            .bind(id.get())
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_customer", e))?;
        Ok(result.rows_affected() > 0)
    }
}

// ---------------------------------------------------------------------------
// Inventory

#[derive(Debug, Clone)]
pub struct PostgresInventoryRepository {
    pool: Arc<PgPool>,
}

#[async_trait]
impl Repository<InventoryItem> for PostgresInventoryRepository {
    type Draft = NewInventoryItem;

    async fn find_all(&self) -> StoreResult<Vec<InventoryItem>> {
        let rows = sqlx::query(
            "SELECT id, name, description, stock FROM inventory_items ORDER BY id ASC",
        )
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_all_inventory_items", e))?;

        rows.iter().map(inventory_item_from_row).collect()
    }

    async fn find_by_id(&self, id: InventoryItemId) -> StoreResult<Option<InventoryItem>> {
        let row = sqlx::query(
            "SELECT id, name, description, stock FROM inventory_items WHERE id = $1",
        )
        .bind(id.get())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_inventory_item", e))?;

        row.as_ref().map(inventory_item_from_row).transpose()
    }

    async fn exists_by_id(&self, id: InventoryItemId) -> StoreResult<bool> {
        exists(
            &self.pool,
            "SELECT EXISTS (SELECT 1 FROM inventory_items WHERE id = $1)",
            id.get(),
        )
        .await
    }

    #[instrument(skip(self, draft), err)]
    async fn insert(&self, draft: NewInventoryItem) -> StoreResult<InventoryItem> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO inventory_items (name, description, stock) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(draft.name())
        .bind(draft.description())
        .bind(draft.stock())
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_inventory_item", e))?;

        Ok(draft.into_item(InventoryItemId::new(id)))
    }

    async fn update(&self, entity: InventoryItem) -> StoreResult<InventoryItem> {
        let result = sqlx::query(
            "UPDATE inventory_items SET name = $2, description = $3, stock = $4 WHERE id = $1",
        )
        .bind(entity.id().get())
        .bind(entity.name())
        .bind(entity.description())
        .bind(entity.stock())
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("update_inventory_item", e))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found(InventoryItem::KIND, entity.id()));
        }
        Ok(entity)
    }

    async fn delete_by_id(&self, id: InventoryItemId) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM inventory_items WHERE id = $1")
            .bind(id.get())
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_inventory_item", e))?;
        Ok(result.rows_affected() > 0)
    }
}

// ---------------------------------------------------------------------------
// Orders

const ORDER_SELECT: &str = r#"
    SELECT
        o.id,
        o.order_date,
        o.status,
        c.id AS customer_id,
        c.name AS customer_name,
        c.email AS customer_email
    FROM orders o
    JOIN customers c ON c.id = o.customer_id
"#;

#[derive(Debug, Clone)]
pub struct PostgresOrderRepository {
    pool: Arc<PgPool>,
}

impl PostgresOrderRepository {
    async fn load_lines(&self, order_ids: &[i64]) -> StoreResult<BTreeMap<i64, Vec<LineItem>>> {
        let rows = sqlx::query(
            r#"
            SELECT id, order_id, inventory_item_id, quantity, unit_price
            FROM line_items
            WHERE order_id = ANY($1)
            ORDER BY order_id ASC, id ASC
            "#,
        )
        .bind(order_ids)
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("load_line_items", e))?;

        let mut by_order: BTreeMap<i64, Vec<LineItem>> = BTreeMap::new();
        for row in rows {
            let line = LineItemRow::from_row(&row)
                .map_err(|e| StoreError::corrupt(format!("failed to decode line item row: {e}")))?;
            by_order.entry(line.order_id).or_default().push(line.try_into()?);
        }
        Ok(by_order)
    }

    fn assemble(
        orders: Vec<OrderRow>,
        mut lines: BTreeMap<i64, Vec<LineItem>>,
    ) -> Vec<Order> {
        orders
            .into_iter()
            .map(|row| {
                let line_items = lines.remove(&row.id).unwrap_or_default();
                row.into_order(line_items)
            })
            .collect()
    }
}

#[async_trait]
impl Repository<Order> for PostgresOrderRepository {
    type Draft = NewOrder;

    async fn find_all(&self) -> StoreResult<Vec<Order>> {
        let rows = sqlx::query(&format!("{ORDER_SELECT} ORDER BY o.id ASC"))
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_all_orders", e))?;

        let orders = rows
            .iter()
            .map(OrderRow::from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| StoreError::corrupt(format!("failed to decode order row: {e}")))?;

        let ids: Vec<i64> = orders.iter().map(|o| o.id).collect();
        let lines = self.load_lines(&ids).await?;
        Ok(Self::assemble(orders, lines))
    }

    async fn find_by_id(&self, id: OrderId) -> StoreResult<Option<Order>> {
        let row = sqlx::query(&format!("{ORDER_SELECT} WHERE o.id = $1"))
            .bind(id.get())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_order", e))?;

        let Some(row) = row else {
            return Ok(None);
        };
        let order = OrderRow::from_row(&row)
            .map_err(|e| StoreError::corrupt(format!("failed to decode order row: {e}")))?;

        let lines = self.load_lines(&[order.id]).await?;
        Ok(Self::assemble(vec![order], lines).pop())
    }

    async fn exists_by_id(&self, id: OrderId) -> StoreResult<bool> {
        exists(&self.pool, "SELECT EXISTS (SELECT 1 FROM orders WHERE id = $1)", id.get()).await
    }

    #[instrument(skip(self, draft), fields(lines = draft.line_items().len()), err)]
    async fn insert(&self, draft: NewOrder) -> StoreResult<Order> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("begin_transaction", e))?;

        let order_id: i64 = sqlx::query_scalar(
            "INSERT INTO orders (customer_id, order_date, status) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(draft.customer().id().get())
        .bind(draft.order_date())
        .bind(draft.status())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("insert_order", e))?;

        let mut line_ids = Vec::with_capacity(draft.line_items().len());
        for line in draft.line_items() {
            let line_id: i64 = sqlx::query_scalar(
                r#"
                INSERT INTO line_items (order_id, inventory_item_id, quantity, unit_price)
                VALUES ($1, $2, $3, $4)
                RETURNING id
                "#,
            )
            .bind(order_id)
            .bind(line.inventory_item_id().get())
            .bind(line.quantity())
            .bind(price_to_db(line.unit_price())?)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("insert_line_item", e))?;
            line_ids.push(LineItemId::new(line_id));
        }

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("commit_transaction", e))?;

        Ok(draft.into_order(OrderId::new(order_id), line_ids)?)
    }

    /// Writes the order row only; line items are immutable once stored.
    async fn update(&self, entity: Order) -> StoreResult<Order> {
        let result = sqlx::query(
            "UPDATE orders SET customer_id = $2, order_date = $3, status = $4 WHERE id = $1",
        )
        .bind(entity.id().get())
        .bind(entity.customer().id().get())
        .bind(entity.order_date())
        .bind(entity.status())
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("update_order", e))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found(Order::KIND, entity.id()));
        }
        Ok(entity)
    }

    #[instrument(skip(self), err)]
    async fn delete_by_id(&self, id: OrderId) -> StoreResult<bool> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("begin_transaction", e))?;

        sqlx::query("DELETE FROM line_items WHERE order_id = $1")
            .bind(id.get())
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("delete_line_items", e))?;

        let result = sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(id.get())
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("delete_order", e))?;

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("commit_transaction", e))?;

        Ok(result.rows_affected() > 0)
    }
}

async fn exists(pool: &PgPool, sql: &str, id: i64) -> StoreResult<bool> {
    sqlx::query_scalar(sql)
        .bind(id)
        .fetch_one(pool)
        .await
        .map_err(|e| map_sqlx_error("exists", e))
}

/// Map SQLx errors into `StoreError` with operation context.
fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            let msg = format!("database error in {}: {}", operation, db_err.message());
            match db_err.code().as_deref() {
                Some("23505") | Some("23503") | Some("23514") => StoreError::Constraint(msg),
                _ => StoreError::Unavailable(msg),
            }
        }
        sqlx::Error::PoolClosed => {
            StoreError::Unavailable(format!("connection pool closed in {}", operation))
        }
        sqlx::Error::ColumnDecode { .. } | sqlx::Error::ColumnNotFound(_) => {
            StoreError::Corrupt(format!("row decode failed in {}: {}", operation, err))
        }
        _ => StoreError::Unavailable(format!("sqlx error in {}: {}", operation, err)),
    }
}

fn price_to_db(price: u64) -> StoreResult<i64> {
    i64::try_from(price).map_err(|_| StoreError::Constraint(format!("unit price {price} out of range")))
}

fn price_from_db(price: i64) -> StoreResult<u64> {
    u64::try_from(price).map_err(|_| StoreError::corrupt(format!("negative unit price {price}")))
}

// SQLx row types

fn customer_from_row(row: &PgRow) -> StoreResult<Customer> {
    let decode = |e: sqlx::Error| StoreError::corrupt(format!("failed to decode customer row: {e}"));
    Ok(Customer::from_parts(
        CustomerId::new(row.try_get("id").map_err(decode)?),
        row.try_get("name").map_err(decode)?,
        row.try_get("email").map_err(decode)?,
    ))
}

fn inventory_item_from_row(row: &PgRow) -> StoreResult<InventoryItem> {
    let decode =
        |e: sqlx::Error| StoreError::corrupt(format!("failed to decode inventory item row: {e}"));
    Ok(InventoryItem::from_parts(
        InventoryItemId::new(row.try_get("id").map_err(decode)?),
        row.try_get("name").map_err(decode)?,
        row.try_get("description").map_err(decode)?,
        row.try_get("stock").map_err(decode)?,
    ))
}

#[derive(Debug)]
struct OrderRow {
    id: i64,
    order_date: DateTime<Utc>,
    status: String,
    customer_id: i64,
    customer_name: String,
    customer_email: String,
}

impl OrderRow {
    fn into_order(self, line_items: Vec<LineItem>) -> Order {
        Order::from_parts(
            OrderId::new(self.id),
            Customer::from_parts(
                CustomerId::new(self.customer_id),
                self.customer_name,
                self.customer_email,
            ),
            self.order_date,
            self.status,
            line_items,
        )
    }
}

impl<'r> FromRow<'r, PgRow> for OrderRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(OrderRow {
            id: row.try_get("id")?,
            order_date: row.try_get("order_date")?,
            status: row.try_get("status")?,
            customer_id: row.try_get("customer_id")?,
            customer_name: row.try_get("customer_name")?,
            customer_email: row.try_get("customer_email")?,
        })
    }
}

#[derive(Debug)]
struct LineItemRow {
    id: i64,
    order_id: i64,
    inventory_item_id: i64,
    quantity: i64,
    unit_price: i64,
}

impl<'r> FromRow<'r, PgRow> for LineItemRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(LineItemRow {
            id: row.try_get("id")?,
            order_id: row.try_get("order_id")?,
            inventory_item_id: row.try_get("inventory_item_id")?,
            quantity: row.try_get("quantity")?,
            unit_price: row.try_get("unit_price")?,
        })
    }
}

impl TryFrom<LineItemRow> for LineItem {
    type Error = StoreError;

    fn try_from(row: LineItemRow) -> Result<Self, Self::Error> {
        Ok(LineItem::from_parts(
            LineItemId::new(row.id),
            InventoryItemId::new(row.inventory_item_id),
            row.quantity,
            price_from_db(row.unit_price)?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prices_outside_bigint_are_rejected() {
        assert_eq!(price_to_db(1000).unwrap(), 1000);
        assert!(matches!(price_to_db(u64::MAX), Err(StoreError::Constraint(_))));
        assert!(matches!(price_from_db(-1), Err(StoreError::Corrupt(_))));
    }

    #[test]
    fn pool_errors_map_to_unavailable() {
        let err = map_sqlx_error("find_order", sqlx::Error::PoolClosed);
        assert_eq!(
            err,
            StoreError::Unavailable("connection pool closed in find_order".to_string())
        );
    }

    #[test]
    fn line_items_attach_to_their_order() {
        let row = |id| OrderRow {
            id,
            order_date: Utc::now(),
            status: "PENDING".to_string(),
            customer_id: 1,
            customer_name: "John Doe".to_string(),
            customer_email: "john.doe@example.com".to_string(),
        };
        let mut lines = BTreeMap::new();
        lines.insert(
            2,
            vec![LineItem::from_parts(LineItemId::new(9), InventoryItemId::new(100), 2, 1000)],
        );

        let orders = PostgresOrderRepository::assemble(vec![row(1), row(2)], lines);

        assert!(orders[0].line_items().is_empty());
        assert_eq!(orders[1].line_items().len(), 1);
        assert_eq!(orders[1].total_amount(), 2000);
    }
}
