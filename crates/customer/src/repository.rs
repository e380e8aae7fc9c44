use ordermanager_core::Repository;

use crate::customer::{Customer, NewCustomer};

/// Persistence accessor for customers.
pub trait CustomerRepository: Repository<Customer, Draft = NewCustomer> {}

impl<T> CustomerRepository for T where T: Repository<Customer, Draft = NewCustomer> + ?Sized {}
