use std::sync::{Arc, Mutex};

use anyhow::Context;
use tracing::info;

use ordermanager_customer::{CustomerEventListener, CustomerRepository, DefaultCustomerManagement};
use ordermanager_events::{InMemoryEventBus, OrderEnvelope};
use ordermanager_infra::{AppConfig, ListenerWorker, Stores, WorkerHandle};
use ordermanager_inventory::{DefaultInventoryManagement, InventoryEventListener, InventoryRepository};
use ordermanager_orders::{BusOrderEventPublisher, OrderEventProcessor, OrderService};

pub type OrderBus = InMemoryEventBus<OrderEnvelope>;

/// Everything the HTTP handlers need, wired once at startup.
pub struct AppServices {
    pub customers: Arc<dyn CustomerRepository>,
    pub inventory: Arc<dyn InventoryRepository>,
    pub orders: OrderService,
    pub bus: Arc<OrderBus>,
    workers: Mutex<Vec<WorkerHandle>>,
}

impl AppServices {
    /// Build services on the store selected by `config`.
    ///
    /// Must be called from within a tokio runtime (listener workers are spawned here).
    pub async fn build(config: &AppConfig) -> anyhow::Result<Self> {
        let stores = match &config.database_url {
            Some(url) => {
                info!(max_connections = config.db_max_connections, "using postgres store");
                Stores::postgres(url, config.db_max_connections)
                    .await
                    .context("failed to initialise postgres store")?
            }
            None => {
                info!("DATABASE_URL not set; using in-memory store");
                Stores::in_memory()
            }
        };
        Ok(Self::with_stores(stores, config.unit_price))
    }

    /// In-memory services with default settings (tests, local runs).
    pub fn in_memory() -> Self {
        Self::with_stores(Stores::in_memory(), AppConfig::default().unit_price)
    }

    pub fn with_stores(stores: Stores, unit_price: u64) -> Self {
        let bus: Arc<OrderBus> = Arc::new(InMemoryEventBus::new());

        // Subscribe every listener before any request can publish.
        let workers = vec![
            ListenerWorker::spawn(Arc::new(CustomerEventListener), &*bus),
            ListenerWorker::spawn(
                Arc::new(InventoryEventListener::new(stores.inventory.clone())),
                &*bus,
            ),
            ListenerWorker::spawn(Arc::new(OrderEventProcessor::new()), &*bus),
        ];

        let orders = OrderService::new(
            stores.orders.clone(),
            Arc::new(DefaultCustomerManagement::new(stores.customers.clone())),
            Arc::new(DefaultInventoryManagement::new(stores.inventory.clone())),
            Arc::new(BusOrderEventPublisher::new(bus.clone())),
        )
        .with_unit_price(unit_price);

        Self {
            customers: stores.customers,
            inventory: stores.inventory,
            orders,
            bus,
            workers: Mutex::new(workers),
        }
    }

    /// Stop all listener workers. Events already dispatched still run to completion.
    pub async fn shutdown(&self) {
        let workers = match self.workers.lock() {
            Ok(mut guard) => std::mem::take(&mut *guard),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        };
        for worker in workers {
            let name = worker.name();
            worker.shutdown().await;
            info!(worker = name, "listener worker stopped");
        }
    }
}
