//! Translation of domain failures into HTTP responses.

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use tracing::error;

use crate::domain::DomainError;
use shared::{ErrorResponse, ViolationDto};

/// Error returned by every REST handler
#[derive(Debug)]
pub enum ApiError {
    Domain(DomainError),
    /// The request body could not be decoded
    MalformedBody(String),
    /// The id in the URL does not name any resource
    UnknownId(String),
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        ApiError::Domain(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::MalformedBody(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::UnknownId(rejection.body_text())
    }
}

fn error_body(title: &str, detail: String, violations: Vec<ViolationDto>) -> Json<ErrorResponse> {
    Json(ErrorResponse {
        title: title.to_string(),
        detail,
        violations,
    })
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Domain(DomainError::Validation(errors)) => {
                let violations = errors
                    .violations()
                    .iter()
                    .map(|v| ViolationDto {
                        property_path: v.property_path.to_string(),
                        message: v.message.to_string(),
                    })
                    .collect();
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    error_body("An error occurred", errors.to_string(), violations),
                )
                    .into_response()
            }
            ApiError::Domain(err @ DomainError::NotFound { .. }) => (
                StatusCode::NOT_FOUND,
                error_body("Not Found", err.to_string(), vec![]),
            )
                .into_response(),
            ApiError::Domain(DomainError::Storage(err)) => {
                error!("Storage failure: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    error_body("Internal Server Error", "Storage failure".to_string(), vec![]),
                )
                    .into_response()
            }
            ApiError::MalformedBody(detail) => (
                StatusCode::BAD_REQUEST,
                error_body("Bad Request", detail, vec![]),
            )
                .into_response(),
            ApiError::UnknownId(detail) => (
                StatusCode::NOT_FOUND,
                error_body("Not Found", detail, vec![]),
            )
                .into_response(),
        }
    }
}
