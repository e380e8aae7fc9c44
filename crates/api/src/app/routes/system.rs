use axum::response::IntoResponse;

use crate::app::envelope::ApiResponse;

/// Liveness probe.
pub async fn health() -> impl IntoResponse {
    ApiResponse::success("OK")
}
