//! `ordermanager-core`: shared domain building blocks.
//!
//! Identifiers, the entity/repository contracts and the error types every module
//! crate agrees on. No IO lives here.

pub mod entity;
pub mod error;
pub mod id;
pub mod repository;
pub mod value_object;

pub use entity::Entity;
pub use error::{DomainError, DomainResult, StoreError, StoreResult};
pub use id::{CustomerId, InventoryItemId, LineItemId, OrderId};
pub use repository::Repository;
pub use value_object::ValueObject;
