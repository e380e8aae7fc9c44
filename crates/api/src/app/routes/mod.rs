use axum::{Router, routing::get};

pub mod customers;
pub mod inventory;
pub mod orders;
pub mod system;

/// Router for all endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/", get(system::health))
        .route("/ok", get(system::health))
        .route("/health", get(system::health))
        .nest("/customers", customers::router())
        .nest("/inventory", inventory::router())
        .nest("/orders", orders::router())
}
