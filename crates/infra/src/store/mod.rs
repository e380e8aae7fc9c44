//! Repository implementations.
//!
//! - `in_memory`: dev/test store, state is lost on restart
//! - `postgres`: durable store, selected when a database URL is configured

pub mod in_memory;
pub mod postgres;

use std::sync::Arc;

use ordermanager_core::StoreResult;
use ordermanager_customer::CustomerRepository;
use ordermanager_inventory::InventoryRepository;
use ordermanager_orders::OrderRepository;

pub use in_memory::{
    InMemoryCustomerRepository, InMemoryEntity, InMemoryInventoryRepository,
    InMemoryOrderRepository, InMemoryRepository,
};
pub use postgres::{
    PostgresCustomerRepository, PostgresInventoryRepository, PostgresOrderRepository,
    PostgresStore,
};

/// One repository per module, all backed by the same store.
#[derive(Clone)]
pub struct Stores {
    pub customers: Arc<dyn CustomerRepository>,
    pub inventory: Arc<dyn InventoryRepository>,
    pub orders: Arc<dyn OrderRepository>,
}

impl Stores {
    pub fn in_memory() -> Self {
        Self {
            customers: Arc::new(InMemoryCustomerRepository::new()),
            inventory: Arc::new(InMemoryInventoryRepository::new()),
            orders: Arc::new(InMemoryOrderRepository::new()),
        }
    }

    /// Connect, create the schema if needed and hand out the Postgres repositories.
    pub async fn postgres(database_url: &str, max_connections: u32) -> StoreResult<Self> {
        let store = PostgresStore::connect(database_url, max_connections).await?;
        store.ensure_schema().await?;
        Ok(Self {
            customers: Arc::new(store.customers()),
            inventory: Arc::new(store.inventory()),
            orders: Arc::new(store.orders()),
        })
    }
}
