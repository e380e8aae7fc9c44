use std::sync::Arc;

use axum::{Extension, Router, response::IntoResponse, routing::get};

use ordermanager_core::Entity;
use ordermanager_inventory::NewInventoryItem;

use crate::app::envelope::{ApiResponse, EnvelopeJson};
use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new().route("/", get(list_items).post(create_item))
}

pub async fn list_items(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    match services.inventory.find_all().await {
        Ok(items) => {
            let items = items.iter().map(dto::inventory_item_to_json).collect::<Vec<_>>();
            ApiResponse::success(items).into_response()
        }
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn create_item(
    Extension(services): Extension<Arc<AppServices>>,
    EnvelopeJson(body): EnvelopeJson<dto::CreateInventoryItemRequest>,
) -> axum::response::Response {
    let draft = match NewInventoryItem::new(body.name, body.description, body.stock) {
        Ok(d) => d,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.inventory.insert(draft).await {
        Ok(item) => {
            tracing::info!(item_id = %item.id(), stock = item.stock(), "inventory item created");
            ApiResponse::success(dto::inventory_item_to_json(&item)).into_response()
        }
        Err(e) => errors::store_error_to_response(e),
    }
}
