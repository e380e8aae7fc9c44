use ordermanager_core::Repository;

use crate::order::{NewOrder, Order};

/// Persistence accessor for orders. Line items are stored and removed with their order.
pub trait OrderRepository: Repository<Order, Draft = NewOrder> {}

impl<T> OrderRepository for T where T: Repository<Order, Draft = NewOrder> + ?Sized {}
