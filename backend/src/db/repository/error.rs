//! Errors raised by employee repositories.

use std::fmt;

use crate::models::EmployeeId;

/// Result type for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Where a repository failure happened.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorContext {
    /// Repository operation, e.g. `find_by_id`
    pub operation: Option<&'static str>,
    /// Employee the operation was acting on
    pub employee_id: Option<EmployeeId>,
    pub details: Option<String>,
}

impl ErrorContext {
    pub fn new(operation: &'static str) -> Self {
        Self {
            operation: Some(operation),
            ..Self::default()
        }
    }

    pub fn for_employee(mut self, id: EmployeeId) -> Self {
        self.employee_id = Some(id);
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(operation) = self.operation {
            write!(f, " during {}", operation)?;
        }
        if let Some(id) = self.employee_id {
            write!(f, " for employee {}", id)?;
        }
        if let Some(details) = &self.details {
            write!(f, " ({})", details)?;
        }
        Ok(())
    }
}

/// Failure reported by an [`EmployeeRepository`](super::EmployeeRepository).
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// The store could not be reached.
    #[error("Connection error: {message}{context}")]
    Connection { message: String, context: ErrorContext },

    /// The store rejected or failed a statement.
    #[error("Query error: {message}{context}")]
    Query { message: String, context: ErrorContext },

    /// No employee row matched.
    #[error("Not found: {message}{context}")]
    NotFound { message: String, context: ErrorContext },

    /// The backend could not be selected or configured.
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Internal error: {message}{context}")]
    Internal { message: String, context: ErrorContext },
}

impl RepositoryError {
    pub fn connection(message: impl Into<String>, context: ErrorContext) -> Self {
        Self::Connection {
            message: message.into(),
            context,
        }
    }

    pub fn query(message: impl Into<String>, context: ErrorContext) -> Self {
        Self::Query {
            message: message.into(),
            context,
        }
    }

    /// No employee with `id` exists.
    pub fn employee_not_found(id: EmployeeId, operation: &'static str) -> Self {
        Self::NotFound {
            message: "employee does not exist".to_string(),
            context: ErrorContext::new(operation).for_employee(id),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn internal(message: impl Into<String>, context: ErrorContext) -> Self {
        Self::Internal {
            message: message.into(),
            context,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            Self::Connection { context, .. }
            | Self::Query { context, .. }
            | Self::NotFound { context, .. }
            | Self::Internal { context, .. } => Some(context),
            Self::Configuration(_) => None,
        }
    }

    /// Record `operation` unless the error already names one.
    pub fn in_operation(mut self, operation: &'static str) -> Self {
        if let Self::Connection { context, .. }
        | Self::Query { context, .. }
        | Self::NotFound { context, .. }
        | Self::Internal { context, .. } = &mut self
        {
            context.operation.get_or_insert(operation);
        }
        self
    }
}

#[cfg(feature = "postgres-repo")]
impl From<diesel::result::Error> for RepositoryError {
    fn from(err: diesel::result::Error) -> Self {
        use diesel::result::Error;

        match err {
            Error::NotFound => Self::NotFound {
                message: "no matching row".to_string(),
                context: ErrorContext::default(),
            },
            Error::DatabaseError(kind, info) => Self::query(
                info.message(),
                ErrorContext::default().with_details(format!("{:?}", kind)),
            ),
            Error::DeserializationError(e) | Error::SerializationError(e) => {
                Self::internal(e.to_string(), ErrorContext::default())
            }
            other => Self::query(other.to_string(), ErrorContext::default()),
        }
    }
}

#[cfg(feature = "postgres-repo")]
impl From<diesel::r2d2::PoolError> for RepositoryError {
    fn from(err: diesel::r2d2::PoolError) -> Self {
        Self::connection(err.to_string(), ErrorContext::default())
    }
}
