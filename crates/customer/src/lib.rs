//! Customer module.
//!
//! Owns the customer record, the repository contract for it, the lookup facade
//! other modules use, and the customer-side order event listener.

pub mod customer;
pub mod listener;
pub mod management;
pub mod repository;

pub use customer::{Customer, NewCustomer};
pub use listener::CustomerEventListener;
pub use management::{CustomerManagement, DefaultCustomerManagement};
pub use repository::CustomerRepository;
