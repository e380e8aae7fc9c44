//! Order module.
//!
//! Orders reference a customer and a set of inventory items by id. Creating or
//! changing an order publishes lifecycle events; the other modules react to those
//! events on their own schedule.

pub mod listener;
pub mod order;
pub mod publisher;
pub mod repository;
pub mod service;
pub mod status;

pub use listener::OrderEventProcessor;
pub use order::{LineItem, MAX_LINE_QUANTITY, NewLineItem, NewOrder, Order};
pub use publisher::{BusOrderEventPublisher, OrderEventPublisher, PublishError};
pub use repository::OrderRepository;
pub use service::{CreateOrder, DEFAULT_UNIT_PRICE, OrderError, OrderLineRequest, OrderService};
pub use status::LifecycleTransition;
