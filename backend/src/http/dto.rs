//! Data Transfer Objects for the HTTP API.
//!
//! Employee DTOs live in [`crate::api`] and are re-exported here.

use serde::{Deserialize, Serialize};

pub use crate::api::{EmployeeCreateRequest, EmployeeResponse, EmployeeUpdateRequest};

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status of the service
    pub status: String,
    /// Version of the API
    pub version: String,
    /// Database connection status
    pub database: String,
}
