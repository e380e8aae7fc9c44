use std::collections::BTreeMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;

use ordermanager_core::{Entity, LineItemId, Repository, StoreError, StoreResult};
use ordermanager_customer::{Customer, NewCustomer};
use ordermanager_inventory::{InventoryItem, NewInventoryItem};
use ordermanager_orders::{NewOrder, Order};

/// Entities the in-memory store can hold: how a draft becomes a row once ids are picked.
pub trait InMemoryEntity: Entity {
    type Draft: Send + 'static;

    /// `id` is the entity's identity; `next_child_id` hands out ids for owned rows.
    fn from_draft(
        draft: Self::Draft,
        id: i64,
        next_child_id: &mut dyn FnMut() -> i64,
    ) -> StoreResult<Self>;
}

impl InMemoryEntity for Customer {
    type Draft = NewCustomer;

    fn from_draft(draft: NewCustomer, id: i64, _: &mut dyn FnMut() -> i64) -> StoreResult<Self> {
        Ok(draft.into_customer(id.into()))
    }
}

impl InMemoryEntity for InventoryItem {
    type Draft = NewInventoryItem;

    fn from_draft(draft: NewInventoryItem, id: i64, _: &mut dyn FnMut() -> i64) -> StoreResult<Self> {
        Ok(draft.into_item(id.into()))
    }
}

impl InMemoryEntity for Order {
    type Draft = NewOrder;

    fn from_draft(
        draft: NewOrder,
        id: i64,
        next_child_id: &mut dyn FnMut() -> i64,
    ) -> StoreResult<Self> {
        let line_ids: Vec<LineItemId> = (0..draft.line_items().len())
            .map(|_| LineItemId::new(next_child_id()))
            .collect();
        Ok(draft.into_order(id.into(), line_ids)?)
    }
}

/// In-memory table for dev/tests.
///
/// Ids start at 1 and are never reused. Owned rows (order line items) draw from a
/// second sequence, as they would from their own table.
#[derive(Debug)]
pub struct InMemoryRepository<E: Entity> {
    rows: RwLock<BTreeMap<E::Id, E>>,
    ids: AtomicI64,
    child_ids: AtomicI64,
}

pub type InMemoryCustomerRepository = InMemoryRepository<Customer>;
pub type InMemoryInventoryRepository = InMemoryRepository<InventoryItem>;
pub type InMemoryOrderRepository = InMemoryRepository<Order>;

impl<E: Entity> InMemoryRepository<E> {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(BTreeMap::new()),
            ids: AtomicI64::new(1),
            child_ids: AtomicI64::new(1),
        }
    }

    fn poisoned() -> StoreError {
        StoreError::unavailable(format!("{} table lock poisoned", E::KIND))
    }
}

impl<E: Entity> Default for InMemoryRepository<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<E: InMemoryEntity> Repository<E> for InMemoryRepository<E> {
    type Draft = E::Draft;

    async fn find_all(&self) -> StoreResult<Vec<E>> {
        let rows = self.rows.read().map_err(|_| Self::poisoned())?;
        Ok(rows.values().cloned().collect())
    }

    async fn find_by_id(&self, id: E::Id) -> StoreResult<Option<E>> {
        let rows = self.rows.read().map_err(|_| Self::poisoned())?;
        Ok(rows.get(&id).cloned())
    }

    async fn exists_by_id(&self, id: E::Id) -> StoreResult<bool> {
        let rows = self.rows.read().map_err(|_| Self::poisoned())?;
        Ok(rows.contains_key(&id))
    }

    async fn insert(&self, draft: E::Draft) -> StoreResult<E> {
        let mut rows = self.rows.write().map_err(|_| Self::poisoned())?;

        let id = self.ids.fetch_add(1, Ordering::Relaxed);
        let mut next_child_id = || self.child_ids.fetch_add(1, Ordering::Relaxed);
        let entity = E::from_draft(draft, id, &mut next_child_id)?;

        rows.insert(entity.id(), entity.clone());
        Ok(entity)
    }

    async fn update(&self, entity: E) -> StoreResult<E> {
        let mut rows = self.rows.write().map_err(|_| Self::poisoned())?;
        match rows.get_mut(&entity.id()) {
            Some(slot) => {
                *slot = entity.clone();
                Ok(entity)
            }
            None => Err(StoreError::not_found(E::KIND, entity.id())),
        }
    }

    async fn delete_by_id(&self, id: E::Id) -> StoreResult<bool> {
        let mut rows = self.rows.write().map_err(|_| Self::poisoned())?;
        Ok(rows.remove(&id).is_some())
    }
}
