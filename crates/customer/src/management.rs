use std::sync::Arc;

use async_trait::async_trait;

use ordermanager_core::{CustomerId, StoreResult};

use crate::customer::Customer;
use crate::repository::CustomerRepository;

/// Read-only customer lookups exposed to other modules.
#[async_trait]
pub trait CustomerManagement: Send + Sync {
    async fn find_by_id(&self, id: CustomerId) -> StoreResult<Option<Customer>>;
}

/// Repository-backed [`CustomerManagement`].
#[derive(Clone)]
pub struct DefaultCustomerManagement {
    repository: Arc<dyn CustomerRepository>,
}

impl DefaultCustomerManagement {
    pub fn new(repository: Arc<dyn CustomerRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl CustomerManagement for DefaultCustomerManagement {
    async fn find_by_id(&self, id: CustomerId) -> StoreResult<Option<Customer>> {
        self.repository.find_by_id(id).await
    }
}
