//! Service layer for the employee API.
//!
//! - [`employees`]: list, get, create and update operations
//! - [`validation`]: request validation run before any store access
//! - [`error`]: service error taxonomy

pub mod employees;
pub mod error;
pub mod validation;


pub use employees::{create_employee, get_employee, list_employees, update_employee};
pub use error::{ServiceError, ServiceResult};
pub use validation::{EmployeeNames, FieldError, ValidationErrors};
