//! Generic persistence accessor.
//!
//! Module crates declare their own repository as a sub-trait of
//! `Repository<TheirEntity>`; the implementations (in-memory, Postgres) live in
//! the infrastructure crate.

use std::sync::Arc;

use async_trait::async_trait;

use crate::entity::Entity;
use crate::error::StoreResult;

/// Find/save/delete over one entity type.
///
/// Each call is its own unit of work: implementations must make `insert`,
/// `update` and `delete_by_id` atomic for the entity and everything it owns.
#[async_trait]
pub trait Repository<E: Entity>: Send + Sync {
    /// Not-yet-persisted shape of the entity (no identity assigned).
    type Draft: Send + 'static;

    /// All rows, ordered by id.
    async fn find_all(&self) -> StoreResult<Vec<E>>;

    async fn find_by_id(&self, id: E::Id) -> StoreResult<Option<E>>;

    async fn exists_by_id(&self, id: E::Id) -> StoreResult<bool>;

    /// Persist a draft and return it with its assigned identity.
    async fn insert(&self, draft: Self::Draft) -> StoreResult<E>;

    /// Replace the stored row for `entity.id()`.
    async fn update(&self, entity: E) -> StoreResult<E>;

    /// Returns `true` when a row was removed.
    async fn delete_by_id(&self, id: E::Id) -> StoreResult<bool>;
}

#[async_trait]
impl<E, R> Repository<E> for Arc<R>
where
    E: Entity,
    R: Repository<E> + ?Sized,
{
    type Draft = <R as Repository<E>>::Draft;

    async fn find_all(&self) -> StoreResult<Vec<E>> {
        (**self).find_all().await
    }

    async fn find_by_id(&self, id: E::Id) -> StoreResult<Option<E>> {
        (**self).find_by_id(id).await
    }

    async fn exists_by_id(&self, id: E::Id) -> StoreResult<bool> {
        (**self).exists_by_id(id).await
    }

    async fn insert(&self, draft: Self::Draft) -> StoreResult<E> {
        (**self).insert(draft).await
    }

    async fn update(&self, entity: E) -> StoreResult<E> {
        (**self).update(entity).await
    }

    async fn delete_by_id(&self, id: E::Id) -> StoreResult<bool> {
        (**self).delete_by_id(id).await
    }
}
