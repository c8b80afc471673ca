//! # Employee API
//!
//! A small CRUD REST service for employee records.
//!
//! ## Architecture
//!
//! - [`models`]: The `Employee` entity and its id type
//! - [`api`]: Request and response DTOs
//! - [`db`]: Repository trait, in-memory and Postgres backends, factory
//! - [`services`]: Validation and the list/get/create/update operations
//! - [`http`]: Axum router, handlers and error mapping
//!
//! ## Endpoints
//!
//! | Method | Path                  |
//! |--------|-----------------------|
//! | GET    | `/api/employee`       |
//! | GET    | `/api/employee/{id}`  |
//! | POST   | `/api/employee`       |
//! | PUT    | `/api/employee/{id}`  |
//! | GET    | `/health`             |

pub mod api;
pub mod db;
pub mod models;
pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
