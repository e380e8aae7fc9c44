//! Uniform response envelope.
//!
//! Every endpoint answers HTTP 200; success or failure is carried in the body
//! (`success`, `code`, `message`, optional `data`, `timestamp`).

use axum::{
    Json, async_trait,
    extract::{FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{SecondsFormat, Utc};
use serde::{Serialize, de::DeserializeOwned};

pub const DEFAULT_SUCCESS_MESSAGE: &str = "Success";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub code: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// RFC 3339, UTC.
    pub timestamp: String,
}

impl<T> ApiResponse<T> {
    fn new(success: bool, code: u16, message: impl Into<String>, data: Option<T>) -> Self {
        Self {
            success,
            code,
            message: message.into(),
            data,
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }

    pub fn success(data: T) -> Self {
        Self::new(true, 200, DEFAULT_SUCCESS_MESSAGE, Some(data))
    }

    pub fn success_with_message(message: impl Into<String>, data: T) -> Self {
        Self::new(true, 200, message, Some(data))
    }

    pub fn success_with_code(code: u16, message: impl Into<String>, data: Option<T>) -> Self {
        Self::new(true, code, message, data)
    }

    /// Generic failure; defaults to code 400.
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(false, 400, message, None)
    }

    pub fn error_with_code(code: u16, message: impl Into<String>) -> Self {
        Self::new(false, code, message, None)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(false, 404, message, None)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(false, 400, message, None)
    }

    pub fn server_error(message: impl Into<String>) -> Self {
        Self::new(false, 500, message, None)
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// `Json<T>` whose rejection is a 400 envelope instead of axum's plain-text error.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvelopeJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for EnvelopeJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => {
                tracing::debug!(error = %rejection, "rejected request body");
                Err(ApiResponse::<()>::bad_request(rejection.body_text()).into_response())
            }
        }
    }
}
