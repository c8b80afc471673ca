use diesel::prelude::*;

use super::schema::employees;
use crate::models::{Employee, EmployeeId};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = employees)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct EmployeeRow {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
}

impl From<EmployeeRow> for Employee {
    fn from(row: EmployeeRow) -> Self {
        Employee {
            id: Some(EmployeeId(row.id)),
            first_name: row.first_name,
            last_name: row.last_name,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = employees)]
pub struct NewEmployeeRow {
    pub first_name: String,
    pub last_name: String,
}

/// Mutable columns written by an update.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = employees)]
pub struct EmployeeNamesChangeset {
    pub first_name: String,
    pub last_name: String,
}
