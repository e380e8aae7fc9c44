use serde::{Deserialize, Serialize};

use ordermanager_core::{DomainError, DomainResult, Entity, InventoryItemId};

/// Validated input for creating an inventory item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewInventoryItem {
    name: String,
    description: String,
    stock: i64,
}

impl NewInventoryItem {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        stock: i64,
    ) -> DomainResult<Self> {
        let name = name.into();
        let description = description.into();

        if name.trim().is_empty() {
            return Err(DomainError::validation("name must not be empty"));
        }
        if description.trim().is_empty() {
            return Err(DomainError::validation("description must not be empty"));
        }
        if stock < 0 {
            return Err(DomainError::validation("stock must be greater than or equal to 0"));
        }

        Ok(Self {
            name,
            description,
            stock,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn stock(&self) -> i64 {
        self.stock
    }

    /// Attach the identity assigned by the store.
    pub fn into_item(self, id: InventoryItemId) -> InventoryItem {
        InventoryItem {
            id,
            name: self.name,
            description: self.description,
            stock: self.stock,
        }
    }
}

/// A persisted inventory item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryItem {
    id: InventoryItemId,
    name: String,
    description: String,
    stock: i64,
}

impl InventoryItem {
    /// Rehydrate a stored row.
    pub fn from_parts(id: InventoryItemId, name: String, description: String, stock: i64) -> Self {
        Self {
            id,
            name,
            description,
            stock,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn stock(&self) -> i64 {
        self.stock
    }

    /// Remove `quantity` units from stock.
    ///
    /// There is no floor: an order for more than is on hand drives stock negative.
    /// Fails, leaving stock untouched, if the result does not fit in an `i64`.
    pub fn decrement_stock(&mut self, quantity: i64) -> DomainResult<()> {
        self.stock = self.stock.checked_sub(quantity).ok_or_else(|| {
            DomainError::invariant(format!(
                "stock {} of inventory item {} cannot be reduced by {quantity}",
                self.stock, self.id
            ))
        })?;
        Ok(())
    }
}

impl Entity for InventoryItem {
    type Id = InventoryItemId;

    const KIND: &'static str = "inventory item";

    fn id(&self) -> InventoryItemId {
        self.id
    }
}
