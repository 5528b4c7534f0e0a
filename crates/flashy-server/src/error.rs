use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use flashy_shared::protocol::ErrorResponse;
use flashy_store::StoreError;
use thiserror::Error;

/// Errors returned by HTTP handlers.
///
/// There is deliberately no "forbidden" variant: a deck the caller may not
/// access is reported exactly like one that does not exist.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Missing device id")]
    MissingDeviceId,

    #[error("{0}")]
    BadRequest(String),

    #[error("Not found")]
    NotFound,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => ApiError::NotFound,
            StoreError::Validation(v) => ApiError::BadRequest(v.to_string()),
            other => {
                tracing::error!(error = %other, "store operation failed");
                ApiError::Internal(other.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::MissingDeviceId => (StatusCode::BAD_REQUEST, self.to_string()),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            ApiError::NotFound => (StatusCode::NOT_FOUND, self.to_string()),
            ApiError::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Database error".to_string())
            }
        };

        (status, axum::Json(ErrorResponse { error: message })).into_response()
    }
}
