//! Employee entity and its identifier.

use serde::{Deserialize, Serialize};

/// Strongly-typed identifier for an employee record.
///
/// Ids are assigned by the store when an employee is first saved and never
/// change afterwards.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmployeeId(pub i32);

impl EmployeeId {
    pub fn new(value: i32) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i32 {
        self.0
    }
}

impl std::fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for EmployeeId {
    fn from(v: i32) -> Self {
        EmployeeId(v)
    }
}

impl From<EmployeeId> for i32 {
    fn from(id: EmployeeId) -> Self {
        id.0
    }
}

/// An employee record as held by the store.
///
/// `id` is `None` until the record has been persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: Option<EmployeeId>,
    pub first_name: String,
    pub last_name: String,
}

impl Employee {
    /// Build an employee that has not been saved yet.
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            id: None,
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }

    /// Build an employee that already carries a store-assigned id.
    pub fn with_id(
        id: impl Into<EmployeeId>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Self {
            id: Some(id.into()),
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }

    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }
}
