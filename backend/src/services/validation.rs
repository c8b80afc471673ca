//! Input validation for employee requests.
//!
//! Every check runs before the repository is touched. Validators return the
//! validated values on success so callers never handle unchecked input.

use std::fmt;

use crate::api::{EmployeeCreateRequest, EmployeeUpdateRequest};
use crate::models::EmployeeId;

/// A single rejected field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// All problems found in one request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a result holding a single field error.
    pub fn single(field: &'static str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// `Ok(value)` when no error was recorded, otherwise `Err(self)`.
    pub fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.errors.iter().map(|e| e.message.as_str()).collect();
        write!(f, "{}", messages.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// First and last name that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeNames {
    pub first_name: String,
    pub last_name: String,
}

fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}

fn validate_names(
    first_name: Option<String>,
    last_name: Option<String>,
) -> Result<EmployeeNames, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    if is_blank(first_name.as_deref()) {
        errors.add("firstName", "The first name must be specified");
    }
    if is_blank(last_name.as_deref()) {
        errors.add("lastName", "The last name must be specified");
    }

    errors.into_result(EmployeeNames {
        first_name: first_name.unwrap_or_default(),
        last_name: last_name.unwrap_or_default(),
    })
}

/// Check that an id from the request path is a positive integer.
pub fn validate_employee_id(id: i32) -> Result<EmployeeId, ValidationErrors> {
    if id <= 0 {
        return Err(ValidationErrors::single(
            "id",
            format!("Employee id must be a positive integer, got {}", id),
        ));
    }
    Ok(EmployeeId(id))
}

/// Validate a create request.
///
/// Only a missing body or a body with neither name is rejected. A single
/// absent name is stored as an empty string.
pub fn validate_create_request(
    request: Option<EmployeeCreateRequest>,
) -> Result<EmployeeNames, ValidationErrors> {
    let request = request
        .ok_or_else(|| ValidationErrors::single("body", "The employee details must be provided"))?;

    match (request.first_name, request.last_name) {
        (None, None) => Err(ValidationErrors::single(
            "body",
            "A first name or a last name must be specified",
        )),
        (first_name, last_name) => Ok(EmployeeNames {
            first_name: first_name.unwrap_or_default(),
            last_name: last_name.unwrap_or_default(),
        }),
    }
}

/// Validate an update request. A missing body is rejected.
pub fn validate_update_request(
    request: Option<EmployeeUpdateRequest>,
) -> Result<EmployeeNames, ValidationErrors> {
    let request = request
        .ok_or_else(|| ValidationErrors::single("body", "The employee details must be provided"))?;
    validate_names(request.first_name, request.last_name)
}
