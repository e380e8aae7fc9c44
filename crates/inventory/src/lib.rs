//! Inventory module.
//!
//! Owns inventory items and their stock levels. Stock is only changed in reaction
//! to order events (see [`InventoryEventListener`]); nothing here calls into the
//! order module.

pub mod item;
pub mod listener;
pub mod management;
pub mod repository;

pub use item::{InventoryItem, NewInventoryItem};
pub use listener::InventoryEventListener;
pub use management::{DefaultInventoryManagement, InventoryManagement};
pub use repository::InventoryRepository;
