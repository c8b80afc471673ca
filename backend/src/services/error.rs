//! Error types for the employee service layer.

use super::validation::ValidationErrors;
use crate::db::repository::RepositoryError;

/// Result type for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Failure of an employee service operation.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Input was malformed or incomplete; no store call was made.
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    /// The referenced employee does not exist.
    #[error("No employee was found with id {id}")]
    NotFound { id: i32 },

    /// Any other failure reported by the repository.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl ServiceError {
    pub fn not_found(id: impl Into<i32>) -> Self {
        Self::NotFound { id: id.into() }
    }
}
