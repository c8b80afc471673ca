//! Employee request and response DTOs.

use serde::{Deserialize, Serialize};

use crate::models::Employee;

/// Details of a new employee to create.
///
/// Both names are optional on the wire so that a missing field is reported
/// as a validation failure rather than a deserialization error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeCreateRequest {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

impl EmployeeCreateRequest {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            first_name: Some(first_name.into()),
            last_name: Some(last_name.into()),
        }
    }
}

/// New details for an existing employee.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeUpdateRequest {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

impl EmployeeUpdateRequest {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            first_name: Some(first_name.into()),
            last_name: Some(last_name.into()),
        }
    }
}

/// Details of a retrieved employee record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeResponse {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
}

impl EmployeeResponse {
    /// Project a persisted employee into its response shape.
    ///
    /// Returns `None` for an employee that has not been assigned an id yet.
    pub fn from_employee(employee: &Employee) -> Option<Self> {
        employee.id.map(|id| Self {
            id: id.value(),
            first_name: employee.first_name.clone(),
            last_name: employee.last_name.clone(),
        })
    }
}
