//! Employee repository trait.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::models::{Employee, EmployeeId};

/// Data access port for employee records.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to be shared across request handlers.
#[async_trait]
pub trait EmployeeRepository: Send + Sync {
    /// Check if the backing store is reachable.
    ///
    /// # Returns
    /// - `Ok(true)` if the store is healthy
    /// - `Ok(false)` if the store is unhealthy but no error occurred
    /// - `Err(RepositoryError)` if the check itself failed
    async fn health_check(&self) -> RepositoryResult<bool>;

    /// List every stored employee in ascending id order.
    ///
    /// An empty store yields an empty vector.
    async fn find_all(&self) -> RepositoryResult<Vec<Employee>>;

    /// Look up a single employee.
    ///
    /// # Returns
    /// * `Ok(Some(Employee))` - The matching record
    /// * `Ok(None)` - If no record has this id
    /// * `Err(RepositoryError)` - If the store failed
    async fn find_by_id(&self, id: EmployeeId) -> RepositoryResult<Option<Employee>>;

    /// Persist an employee.
    ///
    /// An employee without an id is inserted and returned with its newly
    /// assigned id. An employee with an id overwrites the names of the
    /// existing record; `Err(RepositoryError::NotFound)` is returned when no
    /// record has that id.
    async fn save(&self, employee: Employee) -> RepositoryResult<Employee>;
}
