//! Error responses.
//!
//! Every failure leaves the API as a JSON [`ApiError`] body so clients see
//! one shape regardless of which layer rejected the request.

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::db::repository::RepositoryError;
use crate::services::ServiceError;

/// JSON body of a failed request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// `BAD_REQUEST`, `NOT_FOUND` or `REPOSITORY_ERROR`
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

#[derive(Debug)]
pub enum AppError {
    /// 400, including extractor rejections
    BadRequest(String),
    /// 404
    NotFound(String),
    /// 404 for a missing row, 500 otherwise
    Repository(RepositoryError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Repository(e) if e.is_not_found() => StatusCode::NOT_FOUND,
            Self::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn into_body(self) -> ApiError {
        match self {
            Self::BadRequest(message) => ApiError::new("BAD_REQUEST", message),
            Self::NotFound(message) => ApiError::new("NOT_FOUND", message),
            Self::Repository(e) if e.is_not_found() => ApiError::new("NOT_FOUND", e.to_string()),
            Self::Repository(e) => {
                tracing::error!("Repository error: {}", e);
                ApiError::new("REPOSITORY_ERROR", "The data store failed to handle the request")
                    .with_details(e.to_string())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(self.into_body())).into_response()
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Validation(errors) => Self::BadRequest(errors.to_string()),
            e @ ServiceError::NotFound { .. } => Self::NotFound(e.to_string()),
            ServiceError::Repository(e) => Self::Repository(e),
        }
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        Self::Repository(err)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EmployeeId;

    #[test]
    fn test_repository_not_found_maps_to_404() {
        let err = AppError::from(RepositoryError::employee_not_found(EmployeeId(4), "save"));
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.into_body().code, "NOT_FOUND");
    }

    #[test]
    fn test_store_failure_keeps_cause_in_details() {
        let err = AppError::from(RepositoryError::configuration("no backend"));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = err.into_body();
        assert_eq!(body.code, "REPOSITORY_ERROR");
        assert_eq!(body.details.as_deref(), Some("Configuration error: no backend"));
    }
}
