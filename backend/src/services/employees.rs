//! Employee service operations.
//!
//! Each function validates its input, performs at most one lookup and one
//! save against the repository, and maps the stored entity to its response
//! shape. Functions are generic over the repository so they work with any
//! backend, including `dyn EmployeeRepository`.

use log::{debug, info, warn};

use super::error::{ServiceError, ServiceResult};
use super::validation::{validate_create_request, validate_employee_id, validate_update_request};
use crate::api::{EmployeeCreateRequest, EmployeeResponse, EmployeeUpdateRequest};
use crate::db::repository::{EmployeeRepository, ErrorContext, RepositoryError};
use crate::models::{Employee, EmployeeId};

fn to_response(employee: &Employee, operation: &'static str) -> ServiceResult<EmployeeResponse> {
    EmployeeResponse::from_employee(employee).ok_or_else(|| {
        ServiceError::Repository(RepositoryError::internal(
            "stored employee has no id",
            ErrorContext::new(operation),
        ))
    })
}

async fn find_existing<R>(repo: &R, id: EmployeeId) -> ServiceResult<Employee>
where
    R: EmployeeRepository + ?Sized,
{
    match repo.find_by_id(id).await? {
        Some(employee) => Ok(employee),
        None => {
            warn!("No employee was found with id {}", id);
            Err(ServiceError::not_found(id))
        }
    }
}

/// List every employee in store order.
pub async fn list_employees<R>(repo: &R) -> ServiceResult<Vec<EmployeeResponse>>
where
    R: EmployeeRepository + ?Sized,
{
    let employees = repo.find_all().await?;
    debug!("Listing {} employees", employees.len());

    employees
        .iter()
        .map(|employee| to_response(employee, "list_employees"))
        .collect()
}

/// Fetch a single employee.
///
/// # Errors
/// * `ServiceError::Validation` - if `id` is not positive
/// * `ServiceError::NotFound` - if no employee has this id
pub async fn get_employee<R>(repo: &R, id: i32) -> ServiceResult<EmployeeResponse>
where
    R: EmployeeRepository + ?Sized,
{
    let id = validate_employee_id(id).inspect_err(|e| warn!("Rejected get employee: {}", e))?;
    debug!("Fetching employee {}", id);

    let employee = find_existing(repo, id).await?;
    to_response(&employee, "get_employee")
}

/// Create a new employee. The id is always assigned by the store.
pub async fn create_employee<R>(
    repo: &R,
    request: Option<EmployeeCreateRequest>,
) -> ServiceResult<EmployeeResponse>
where
    R: EmployeeRepository + ?Sized,
{
    let names =
        validate_create_request(request).inspect_err(|e| warn!("Rejected create employee: {}", e))?;

    let saved = repo
        .save(Employee::new(names.first_name, names.last_name))
        .await?;
    let response = to_response(&saved, "create_employee")?;
    info!("Created employee {}", response.id);

    Ok(response)
}

/// Overwrite the names of an existing employee.
///
/// Both the id and the body are validated before the lookup, so an invalid
/// request never reaches the repository.
pub async fn update_employee<R>(
    repo: &R,
    id: i32,
    request: Option<EmployeeUpdateRequest>,
) -> ServiceResult<EmployeeResponse>
where
    R: EmployeeRepository + ?Sized,
{
    let id = validate_employee_id(id).inspect_err(|e| warn!("Rejected update employee: {}", e))?;
    let names =
        validate_update_request(request).inspect_err(|e| warn!("Rejected update employee: {}", e))?;

    let mut employee = find_existing(repo, id).await?;
    employee.last_name = names.last_name;
    employee.first_name = names.first_name;

    let saved = repo.save(employee).await?;
    let response = to_response(&saved, "update_employee")?;
    info!("Updated employee {}", response.id);

    Ok(response)
}
