//! Database module for employee storage.
//!
//! Persistence is reached through the [`EmployeeRepository`] trait so the
//! backing store can be swapped without touching the service layer.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Service Layer (crate::services) - validation, mapping  │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Repository Trait (repository/) - data access port      │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//!     ┌───────────────┴────────────────┐
//!     │                                 │
//! ┌───▼──────────────┐     ┌───────────▼─────────────┐
//! │ Postgres         │     │ Local Repository        │
//! │ (Diesel + r2d2)  │     │ (in-memory)             │
//! └──────────────────┘     └─────────────────────────┘
//! ```
//!
//! - `repository`: Trait definition and error types
//! - `repositories::postgres`: Postgres implementation with Diesel ORM
//! - `repositories::local`: In-memory implementation
//! - `factory`: Backend selection from environment or config file
//! - `repo_config`: `repository.toml` parsing

#[cfg(not(any(feature = "postgres-repo", feature = "local-repo")))]
compile_error!("Enable at least one repository backend feature.");

pub mod factory;
pub mod repo_config;
pub mod repositories;
pub mod repository;

// Postgres config is colocated with the repository implementation.
#[cfg(feature = "postgres-repo")]
pub use repositories::postgres::{PoolStats, PostgresConfig};
#[cfg(not(feature = "postgres-repo"))]
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    _private: (),
}

pub use factory::{RepositoryFactory, RepositoryType};
pub use repo_config::RepositoryConfig;
pub use repositories::LocalRepository;
#[cfg(feature = "postgres-repo")]
pub use repositories::PostgresRepository;
pub use repository::{EmployeeRepository, ErrorContext, RepositoryError, RepositoryResult};
