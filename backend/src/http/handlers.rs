//! HTTP handlers for the REST API.
//!
//! Each handler extracts its inputs, delegates to [`crate::services`] and
//! lets [`AppError`] pick the status code. Extractor rejections are turned
//! into `400 Bad Request` so every error body has the same shape.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    Json,
};

use super::dto::{EmployeeCreateRequest, EmployeeResponse, EmployeeUpdateRequest, HealthResponse};
use super::error::AppError;
use super::state::AppState;
use crate::services;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Health check endpoint to verify the service is running and the store is reachable.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let db_status = match state.repository.health_check().await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: db_status,
    }))
}

// =============================================================================
// Employees
// =============================================================================

/// GET /api/employee
pub async fn list_employees(State(state): State<AppState>) -> HandlerResult<Vec<EmployeeResponse>> {
    let employees = services::list_employees(state.repository.as_ref()).await?;
    Ok(Json(employees))
}

/// GET /api/employee/{id}
pub async fn get_employee(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> HandlerResult<EmployeeResponse> {
    let Path(id) = id?;
    let employee = services::get_employee(state.repository.as_ref(), id).await?;
    Ok(Json(employee))
}

/// POST /api/employee
///
/// A JSON `null` body reaches the service as `None` and is rejected there.
pub async fn create_employee(
    State(state): State<AppState>,
    payload: Result<Json<Option<EmployeeCreateRequest>>, JsonRejection>,
) -> HandlerResult<EmployeeResponse> {
    let Json(request) = payload?;
    let employee = services::create_employee(state.repository.as_ref(), request).await?;
    Ok(Json(employee))
}

/// PUT /api/employee/{id}
pub async fn update_employee(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
    payload: Result<Json<Option<EmployeeUpdateRequest>>, JsonRejection>,
) -> HandlerResult<EmployeeResponse> {
    let Path(id) = id?;
    let Json(request) = payload?;
    let employee = services::update_employee(state.repository.as_ref(), id, request).await?;
    Ok(Json(employee))
}
