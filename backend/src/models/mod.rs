//! Domain entities stored behind the repository layer.

pub mod employee;

pub use employee::{Employee, EmployeeId};
