use serde::{Deserialize, Serialize};

use ordermanager_core::{CustomerId, DomainError, DomainResult, Entity};

/// Validated input for registering a customer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCustomer {
    name: String,
    email: String,
}

impl NewCustomer {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> DomainResult<Self> {
        let name = name.into();
        let email = email.into();

        if name.trim().is_empty() {
            return Err(DomainError::validation("name must not be empty"));
        }
        if email.trim().is_empty() {
            return Err(DomainError::validation("email must not be empty"));
        }

        Ok(Self { name, email })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    /// Attach the identity assigned by the store.
    pub fn into_customer(self, id: CustomerId) -> Customer {
        Customer {
            id,
            name: self.name,
            email: self.email,
        }
    }
}

/// A persisted customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    id: CustomerId,
    name: String,
    email: String,
}

impl Customer {
    /// Rehydrate a stored row.
    pub fn from_parts(id: CustomerId, name: String, email: String) -> Self {
        Self { id, name, email }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }
}

impl Entity for Customer {
    type Id = CustomerId;

    const KIND: &'static str = "customer";

    fn id(&self) -> CustomerId {
        self.id
    }
}
