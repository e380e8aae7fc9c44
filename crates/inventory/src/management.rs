use std::sync::Arc;

use async_trait::async_trait;

use ordermanager_core::{InventoryItemId, StoreResult};

use crate::item::InventoryItem;
use crate::repository::InventoryRepository;

/// Read-only inventory lookups exposed to other modules.
#[async_trait]
pub trait InventoryManagement: Send + Sync {
    async fn find_by_id(&self, id: InventoryItemId) -> StoreResult<Option<InventoryItem>>;
}

/// Repository-backed [`InventoryManagement`].
#[derive(Clone)]
pub struct DefaultInventoryManagement {
    repository: Arc<dyn InventoryRepository>,
}

impl DefaultInventoryManagement {
    pub fn new(repository: Arc<dyn InventoryRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl InventoryManagement for DefaultInventoryManagement {
    async fn find_by_id(&self, id: InventoryItemId) -> StoreResult<Option<InventoryItem>> {
        self.repository.find_by_id(id).await
    }
}
