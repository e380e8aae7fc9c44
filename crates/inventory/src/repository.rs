use ordermanager_core::Repository;

use crate::item::{InventoryItem, NewInventoryItem};

/// Persistence accessor for inventory items.
pub trait InventoryRepository: Repository<InventoryItem, Draft = NewInventoryItem> {}

impl<T> InventoryRepository for T where T: Repository<InventoryItem, Draft = NewInventoryItem> + ?Sized {}
