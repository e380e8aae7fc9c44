use std::sync::Arc;

use axum::{Extension, Router, response::IntoResponse, routing::get};

use ordermanager_core::Entity;
use ordermanager_customer::NewCustomer;

use crate::app::envelope::{ApiResponse, EnvelopeJson};
use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new().route("/", get(list_customers).post(create_customer))
}

pub async fn list_customers(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.customers.find_all().await {
        Ok(customers) => {
            let items = customers.iter().map(dto::customer_to_json).collect::<Vec<_>>();
            ApiResponse::success(items).into_response()
        }
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn create_customer(
    Extension(services): Extension<Arc<AppServices>>,
    EnvelopeJson(body): EnvelopeJson<dto::CreateCustomerRequest>,
) -> axum::response::Response {
    let draft = match NewCustomer::new(body.name, body.email) {
        Ok(d) => d,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.customers.insert(draft).await {
        Ok(customer) => {
            tracing::info!(customer_id = %customer.id(), "customer created");
            ApiResponse::success(dto::customer_to_json(&customer)).into_response()
        }
        Err(e) => errors::store_error_to_response(e),
    }
}
