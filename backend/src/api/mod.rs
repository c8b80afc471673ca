//! Data Transfer Objects exchanged with API clients.
//!
//! Request and response shapes are kept apart from the [`crate::models`]
//! entity so that the wire format can evolve independently of storage.

pub mod employee;

pub use employee::{EmployeeCreateRequest, EmployeeResponse, EmployeeUpdateRequest};
