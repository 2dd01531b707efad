/// Error responses for the HTTP API
///
/// Engine failures and unreadable request bodies become `400` with
/// `{"error": "...", "code": "..."}`. Plain lookups of a missing definition or
/// instance become a bare `404`.

use crate::error::EngineError;
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

#[derive(Debug)]
pub enum ApiError {
    /// Requested resource does not exist
    NotFound,
    /// Body is not valid JSON or does not have the expected shape
    InvalidBody(JsonRejection),
    /// Rejected by the engine
    Engine(EngineError),
}

impl From<EngineError> for ApiError {
    fn from(e: EngineError) -> Self {
        ApiError::Engine(e)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidBody(rejection)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (error, code) = match self {
            ApiError::NotFound => return StatusCode::NOT_FOUND.into_response(),
            ApiError::InvalidBody(rejection) => {
                tracing::warn!("Rejected request body: {}", rejection.body_text());
                (rejection.body_text(), "invalid_body")
            }
            ApiError::Engine(e) => (e.to_string(), e.code()),
        };

        let body = Json(json!({ "error": error, "code": code }));
        (StatusCode::BAD_REQUEST, body).into_response()
    }
}
