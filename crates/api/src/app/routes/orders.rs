use std::sync::Arc;

use axum::{
    Extension, Router,
    extract::Path,
    response::IntoResponse,
    routing::{get, put},
};

use ordermanager_core::OrderId;

use crate::app::envelope::{ApiResponse, EnvelopeJson};
use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_orders).post(create_order))
        .route("/:id", get(get_order).delete(delete_order))
        .route("/:id/status", put(update_order_status))
}

pub async fn list_orders(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    match services.orders.list().await {
        Ok(orders) => {
            let items = orders.iter().map(dto::order_to_json).collect::<Vec<_>>();
            ApiResponse::success(items).into_response()
        }
        Err(e) => errors::order_error_to_response(e),
    }
}

pub async fn get_order(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: OrderId = match errors::parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.orders.get(id).await {
        Ok(order) => ApiResponse::success(dto::order_to_json(&order)).into_response(),
        Err(e) => errors::order_error_to_response(e),
    }
}

pub async fn create_order(
    Extension(services): Extension<Arc<AppServices>>,
    EnvelopeJson(body): EnvelopeJson<dto::CreateOrderRequest>,
) -> axum::response::Response {
    match services.orders.create(body.into()).await {
        Ok(order) => {
            ApiResponse::success_with_message("Order created successfully", dto::order_to_json(&order))
                .into_response()
        }
        Err(e) => errors::order_error_to_response(e),
    }
}

pub async fn update_order_status(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    EnvelopeJson(body): EnvelopeJson<dto::StatusUpdateRequest>,
) -> axum::response::Response {
    let id: OrderId = match errors::parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.orders.update_status(id, &body.status).await {
        Ok(order) => ApiResponse::success_with_message(
            "Order status updated successfully",
            dto::order_to_json(&order),
        )
        .into_response(),
        Err(e) => errors::order_error_to_response(e),
    }
}

pub async fn delete_order(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: OrderId = match errors::parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.orders.delete(id).await {
        Ok(()) => ApiResponse::<()>::success_with_code(204, "Order deleted successfully", None)
            .into_response(),
        Err(e) => errors::order_error_to_response(e),
    }
}
