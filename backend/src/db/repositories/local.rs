//! In-memory local repository implementation.
//!
//! Employees live in a `BTreeMap` keyed by id, which gives the ascending-id
//! ordering the repository contract requires for `find_all`. Suitable for
//! unit testing and local development.

use async_trait::async_trait;
use log::warn;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::db::repository::{EmployeeRepository, ErrorContext, RepositoryError, RepositoryResult};
use crate::models::{Employee, EmployeeId};

/// In-memory local repository.
///
/// Cloning is cheap and clones share the same underlying data.
///
/// # Example
/// ```
/// use employee_api::db::repositories::LocalRepository;
/// use employee_api::db::EmployeeRepository;
/// use employee_api::models::Employee;
///
/// let runtime = tokio::runtime::Runtime::new().unwrap();
/// let repo = LocalRepository::new();
///
/// let saved = runtime.block_on(repo.save(Employee::new("Ada", "Lovelace"))).unwrap();
/// assert_eq!(saved.id.map(|id| id.value()), Some(1));
/// ```
#[derive(Clone)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
    calls: Arc<CallCounters>,
}

#[derive(Default)]
struct CallCounters {
    find_all: AtomicUsize,
    find_by_id: AtomicUsize,
    save: AtomicUsize,
}

/// Number of times each port operation has been invoked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallCounts {
    pub find_all: usize,
    pub find_by_id: usize,
    pub save: usize,
}

struct LocalData {
    employees: BTreeMap<EmployeeId, Employee>,
    /// `None` once `i32::MAX` has been handed out.
    next_employee_id: Option<i32>,
    is_healthy: bool,
}

impl Default for LocalData {
    fn default() -> Self {
        Self {
            employees: BTreeMap::new(),
            next_employee_id: Some(1),
            is_healthy: true,
        }
    }
}

impl LocalRepository {
    /// Create a new empty local repository.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(LocalData::default())),
            calls: Arc::new(CallCounters::default()),
        }
    }

    /// Create a repository pre-populated with `employees`.
    ///
    /// Employees that already carry an id keep it; the rest are assigned ids
    /// in iteration order. An employee that cannot be given an id is skipped.
    pub fn with_employees(employees: impl IntoIterator<Item = Employee>) -> Self {
        let repo = Self::new();
        for employee in employees {
            if let Err(e) = repo.insert_employee(employee) {
                warn!("Skipping seeded employee: {}", e);
            }
        }
        repo
    }

    /// Add an employee directly, bypassing health checks and call counting.
    ///
    /// Fails only when the employee has no id and every id up to `i32::MAX`
    /// has already been assigned.
    pub fn insert_employee(&self, mut employee: Employee) -> RepositoryResult<EmployeeId> {
        let mut data = self.data.write();
        let id = match employee.id {
            Some(id) => id,
            None => data.next_employee_id.map(EmployeeId).ok_or_else(|| {
                RepositoryError::internal("employee id space exhausted", ErrorContext::new("save"))
            })?,
        };
        data.next_employee_id = data.next_employee_id.and_then(|next| {
            if next > id.value() {
                Some(next)
            } else {
                id.value().checked_add(1)
            }
        });
        employee.id = Some(id);
        data.employees.insert(id, employee);
        Ok(id)
    }

    /// Set the health status for testing connection failures.
    pub fn set_healthy(&self, healthy: bool) {
        self.data.write().is_healthy = healthy;
    }

    /// Clear all data from the repository. Id assignment restarts at 1.
    pub fn clear(&self) {
        let mut data = self.data.write();
        *data = LocalData {
            is_healthy: data.is_healthy,
            ..Default::default()
        };
    }

    /// Get the number of employees stored.
    pub fn employee_count(&self) -> usize {
        self.data.read().employees.len()
    }

    /// Snapshot of how often `find_all`, `find_by_id` and `save` were called.
    ///
    /// Seeding through [`Self::insert_employee`] is not counted.
    pub fn call_counts(&self) -> CallCounts {
        CallCounts {
            find_all: self.calls.find_all.load(Ordering::SeqCst),
            find_by_id: self.calls.find_by_id.load(Ordering::SeqCst),
            save: self.calls.save.load(Ordering::SeqCst),
        }
    }

    fn check_health(&self, operation: &'static str) -> RepositoryResult<()> {
        if !self.data.read().is_healthy {
            return Err(RepositoryError::connection(
                "Database is not healthy",
                ErrorContext::new(operation),
            ));
        }
        Ok(())
    }
}

impl Default for LocalRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EmployeeRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(self.data.read().is_healthy)
    }

    async fn find_all(&self) -> RepositoryResult<Vec<Employee>> {
        self.calls.find_all.fetch_add(1, Ordering::SeqCst);
        self.check_health("find_all")?;
        Ok(self.data.read().employees.values().cloned().collect())
    }

    async fn find_by_id(&self, id: EmployeeId) -> RepositoryResult<Option<Employee>> {
        self.calls.find_by_id.fetch_add(1, Ordering::SeqCst);
        self.check_health("find_by_id")?;
        Ok(self.data.read().employees.get(&id).cloned())
    }

    async fn save(&self, employee: Employee) -> RepositoryResult<Employee> {
        self.calls.save.fetch_add(1, Ordering::SeqCst);
        self.check_health("save")?;

        match employee.id {
            None => {
                let id = self.insert_employee(employee.clone())?;
                Ok(Employee {
                    id: Some(id),
                    ..employee
                })
            }
            Some(id) => {
                let mut data = self.data.write();
                let stored = data
                    .employees
                    .get_mut(&id)
                    .ok_or_else(|| RepositoryError::employee_not_found(id, "save"))?;
                stored.first_name = employee.first_name;
                stored.last_name = employee.last_name;
                Ok(stored.clone())
            }
        }
    }
}
