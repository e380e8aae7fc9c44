//! HTTP application wiring (Axum router + service wiring).
//!
//! - `services.rs`: stores, event bus and listener workers
//! - `routes/`: handlers, one file per module
//! - `dto.rs`: request bodies and JSON mapping helpers
//! - `envelope.rs`: the uniform response body
//! - `errors.rs`: failure to envelope mapping

use std::sync::Arc;

use axum::{Extension, Router};
use tower::ServiceBuilder;

use crate::middleware;

pub mod dto;
pub mod envelope;
pub mod errors;
pub mod routes;
pub mod services;

use services::AppServices;

/// Build the full HTTP router (public entrypoint used by `main.rs` and the tests).
pub fn build_app(services: Arc<AppServices>) -> Router {
    routes::router().layer(
        ServiceBuilder::new()
            .layer(axum::middleware::from_fn(middleware::log_requests))
            .layer(Extension(services)),
    )
}
