use crate::store::StoreError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::{error, warn};

/// Errors that end a request early.
#[derive(Error, Debug)]
pub enum ApiError {
    /// No live store connection could be obtained.
    #[error("Store unreachable: {0}")]
    StoreUnreachable(StoreError),

    /// A statement failed. Only surfaced in strict mode.
    #[error("Store operation failed: {0}")]
    StoreOperation(StoreError),

    /// An unparseable identifier or request body.
    #[error("Malformed input: {0}")]
    MalformedInput(&'static str),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Method not allowed")]
    MethodNotAllowed,
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unreachable(_) => ApiError::StoreUnreachable(err),
            StoreError::NotFound(id) => ApiError::NotFound(format!("No user account with id {}", id)),
            StoreError::OperationFailed { .. } => ApiError::StoreOperation(err),
        }
    }
}

/// Plain-text error bodies, matching the plain-text success bodies of the
/// write endpoints.
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::StoreUnreachable(err) => {
                error!(error = ?err, "Store unreachable.");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Error connecting to the database".to_string(),
                )
            }
            ApiError::StoreOperation(err) => {
                error!(error = ?err, "Store operation failed.");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal database error occurred".to_string(),
                )
            }
            ApiError::MalformedInput(message) => {
                warn!("Rejected malformed input: {}", message);
                (StatusCode::BAD_REQUEST, message.to_string())
            }
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, message),
            ApiError::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                "Only POST requests are allowed on this route".to_string(),
            ),
        };

        (status, message).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::DbErr;

    #[test]
    fn test_store_errors_map_to_statuses() {
        let cases = [
            (
                ApiError::from(StoreError::Unreachable(DbErr::Custom("down".into()))),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                ApiError::from(StoreError::OperationFailed {
                    operation: "list_all",
                    source: DbErr::Custom("boom".into()),
                }),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                ApiError::from(StoreError::NotFound(7)),
                StatusCode::NOT_FOUND,
            ),
            (ApiError::MalformedInput("Incorrect ID"), StatusCode::BAD_REQUEST),
            (ApiError::MethodNotAllowed, StatusCode::METHOD_NOT_ALLOWED),
        ];

        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }
}
