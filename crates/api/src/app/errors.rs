//! Mapping of domain and storage failures onto the response envelope.

use axum::response::{IntoResponse, Response};

use ordermanager_core::{DomainError, StoreError};
use ordermanager_orders::OrderError;

use crate::app::envelope::ApiResponse;

pub fn order_error_to_response(err: OrderError) -> Response {
    match err {
        OrderError::NotFound(msg) => ApiResponse::<()>::not_found(msg),
        OrderError::BadRequest(msg) => ApiResponse::<()>::bad_request(msg),
        OrderError::Internal(msg) => {
            tracing::error!(error = %msg, "order request failed");
            ApiResponse::<()>::server_error(msg)
        }
    }
    .into_response()
}

/// Invalid input on create endpoints.
pub fn domain_error_to_response(err: DomainError) -> Response {
    let msg = match err {
        DomainError::Validation(msg)
        | DomainError::InvariantViolation(msg)
        | DomainError::InvalidId(msg) => msg,
    };
    ApiResponse::<()>::bad_request(msg).into_response()
}

pub fn store_error_to_response(err: StoreError) -> Response {
    tracing::error!(error = %err, "storage failure");
    ApiResponse::<()>::server_error(err.to_string()).into_response()
}

/// Parse a path id, answering a 400 envelope when it is not a number.
pub fn parse_id<T>(raw: &str) -> Result<T, Response>
where
    T: std::str::FromStr<Err = DomainError>,
{
    raw.parse()
        .map_err(|e: DomainError| ApiResponse::<()>::bad_request(e.to_string()).into_response())
}
