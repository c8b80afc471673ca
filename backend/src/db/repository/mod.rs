//! Repository trait definitions for database operations.
//!
//! - [`error`]: Error types for repository operations
//! - [`employee`]: The employee data access port

pub mod employee;
pub mod error;

pub use employee::EmployeeRepository;
pub use error::{ErrorContext, RepositoryError, RepositoryResult};
