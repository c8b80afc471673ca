//! End-to-end tests for the employee endpoints.
//!
//! Every test drives the real router over an in-memory repository and then
//! inspects the repository to confirm which store calls were made.

#![cfg(feature = "http-server")]

mod support;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use employee_api::db::repositories::LocalRepository;
use employee_api::db::repository::EmployeeRepository;
use employee_api::http::error::ApiError;
use employee_api::models::{Employee, EmployeeId};
use support::{app, json_body, seeded, send};

fn two_employees() -> LocalRepository {
    seeded(&[(1, "TestFirst1", "TestLast1"), (2, "TestFirst2", "TestLast2")])
}

// =========================================================
// GET /api/employee
// =========================================================

#[tokio::test]
async fn test_list_empty_store_returns_empty_array() {
    let repo = LocalRepository::new();

    let response = send(app(&repo), Method::GET, "/api/employee", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = json_body(response).await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_list_single_employee() {
    let repo = seeded(&[(1, "TestFirst1", "TestLast1")]);

    let response = send(app(&repo), Method::GET, "/api/employee", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = json_body(response).await;
    assert_eq!(
        body,
        json!([{ "id": 1, "firstName": "TestFirst1", "lastName": "TestLast1" }])
    );
}

#[tokio::test]
async fn test_list_returns_employees_in_id_order() {
    let repo = seeded(&[(2, "TestFirst2", "TestLast2"), (1, "TestFirst1", "TestLast1")]);

    let response = send(app(&repo), Method::GET, "/api/employee", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = json_body(response).await;
    assert_eq!(
        body,
        json!([
            { "id": 1, "firstName": "TestFirst1", "lastName": "TestLast1" },
            { "id": 2, "firstName": "TestFirst2", "lastName": "TestLast2" }
        ])
    );
}

#[tokio::test]
async fn test_list_store_failure_is_internal_error() {
    let repo = two_employees();
    repo.set_healthy(false);

    let response = send(app(&repo), Method::GET, "/api/employee", None).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let error: ApiError = json_body(response).await;
    assert_eq!(error.code, "REPOSITORY_ERROR");
}

// =========================================================
// GET /api/employee/{id}
// =========================================================

#[tokio::test]
async fn test_get_existing_employee() {
    let repo = two_employees();

    let response = send(app(&repo), Method::GET, "/api/employee/2", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = json_body(response).await;
    assert_eq!(
        body,
        json!({ "id": 2, "firstName": "TestFirst2", "lastName": "TestLast2" })
    );
}

#[tokio::test]
async fn test_get_missing_employee_is_not_found() {
    let repo = LocalRepository::new();

    let response = send(app(&repo), Method::GET, "/api/employee/1", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let error: ApiError = json_body(response).await;
    assert_eq!(error.code, "NOT_FOUND");
    assert_eq!(error.message, "No employee was found with id 1");
    assert_eq!(repo.call_counts().find_by_id, 1);
}

#[tokio::test]
async fn test_get_non_positive_id_is_bad_request_without_lookup() {
    let repo = two_employees();

    for uri in ["/api/employee/0", "/api/employee/-1"] {
        let response = send(app(&repo), Method::GET, uri, None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");

        let error: ApiError = json_body(response).await;
        assert_eq!(error.code, "BAD_REQUEST");
    }

    assert_eq!(repo.call_counts().find_by_id, 0);
}

#[tokio::test]
async fn test_get_non_numeric_id_is_bad_request() {
    let repo = two_employees();

    let response = send(app(&repo), Method::GET, "/api/employee/abc", None).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(repo.call_counts().find_by_id, 0);
}

// =========================================================
// POST /api/employee
// =========================================================

#[tokio::test]
async fn test_create_returns_assigned_id() {
    let repo = LocalRepository::new();

    let response = send(
        app(&repo),
        Method::POST,
        "/api/employee",
        Some(r#"{"firstName":"TestFirst1","lastName":"TestLast1"}"#),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = json_body(response).await;
    assert_eq!(
        body,
        json!({ "id": 1, "firstName": "TestFirst1", "lastName": "TestLast1" })
    );

    assert_eq!(
        repo.find_by_id(EmployeeId(1)).await.unwrap(),
        Some(Employee::with_id(1, "TestFirst1", "TestLast1"))
    );
}

#[tokio::test]
async fn test_create_ignores_client_supplied_id() {
    let repo = two_employees();

    let response = send(
        app(&repo),
        Method::POST,
        "/api/employee",
        Some(r#"{"id":1,"firstName":"TestFirst3","lastName":"TestLast3"}"#),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = json_body(response).await;
    assert_eq!(body["id"], json!(3));
    assert_eq!(repo.employee_count(), 3);
    assert_eq!(
        repo.find_by_id(EmployeeId(1)).await.unwrap(),
        Some(Employee::with_id(1, "TestFirst1", "TestLast1"))
    );
}

#[tokio::test]
async fn test_create_invalid_bodies_never_save() {
    let repo = LocalRepository::new();
    let bodies = [
        "null",
        "{}",
        r#"{"firstName":null,"lastName":null}"#,
        r#"{"firstName":"TestFirst1","#,
        r#"{"firstName":1,"lastName":2}"#,
        "",
    ];

    for body in bodies {
        let response = send(app(&repo), Method::POST, "/api/employee", Some(body)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {body:?}");

        let error: ApiError = json_body(response).await;
        assert_eq!(error.code, "BAD_REQUEST");
    }

    assert_eq!(repo.call_counts().save, 0);
    assert_eq!(repo.employee_count(), 0);
}

#[tokio::test]
async fn test_create_with_single_name_succeeds() {
    let repo = LocalRepository::new();

    let response = send(
        app(&repo),
        Method::POST,
        "/api/employee",
        Some(r#"{"firstName":"Ada"}"#),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = json_body(response).await;
    assert_eq!(body, json!({ "id": 1, "firstName": "Ada", "lastName": "" }));

    let response = send(
        app(&repo),
        Method::POST,
        "/api/employee",
        Some(r#"{"firstName":"","lastName":"Lovelace"}"#),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = json_body(response).await;
    assert_eq!(body, json!({ "id": 2, "firstName": "", "lastName": "Lovelace" }));

    assert_eq!(repo.employee_count(), 2);
}

#[tokio::test]
async fn test_create_without_json_content_type_is_bad_request() {
    let repo = LocalRepository::new();

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/employee")
        .body(Body::from(r#"{"firstName":"TestFirst1","lastName":"TestLast1"}"#))
        .unwrap();
    let response = app(&repo).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(repo.call_counts().save, 0);
}

#[tokio::test]
async fn test_update_missing_names_reports_each_field() {
    let repo = two_employees();

    let response = send(app(&repo), Method::PUT, "/api/employee/1", Some("{}")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let error: ApiError = json_body(response).await;
    assert!(error.message.contains("The first name must be specified"));
    assert!(error.message.contains("The last name must be specified"));
}

// =========================================================
// PUT /api/employee/{id}
// =========================================================

#[tokio::test]
async fn test_update_existing_employee() {
    let repo = two_employees();

    let response = send(
        app(&repo),
        Method::PUT,
        "/api/employee/1",
        Some(r#"{"firstName":"TestFirst1Updated","lastName":"TestLast1Updated"}"#),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = json_body(response).await;
    assert_eq!(
        body,
        json!({ "id": 1, "firstName": "TestFirst1Updated", "lastName": "TestLast1Updated" })
    );

    let stored = repo.find_all().await.unwrap();
    assert_eq!(
        stored,
        vec![
            Employee::with_id(1, "TestFirst1Updated", "TestLast1Updated"),
            Employee::with_id(2, "TestFirst2", "TestLast2"),
        ]
    );
}

#[tokio::test]
async fn test_update_missing_employee_is_not_found_without_save() {
    let repo = LocalRepository::new();

    let response = send(
        app(&repo),
        Method::PUT,
        "/api/employee/2",
        Some(r#"{"firstName":"TestFirst1Updated","lastName":"TestLast1Updated"}"#),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let error: ApiError = json_body(response).await;
    assert_eq!(error.message, "No employee was found with id 2");
    assert_eq!(repo.call_counts().save, 0);
}

#[tokio::test]
async fn test_update_invalid_bodies_never_save() {
    let repo = two_employees();
    let bodies = [
        "null",
        r#"{"lastName":"TestLast1Updated"}"#,
        r#"{"firstName":"TestFirst1Updated"}"#,
        r#"{"firstName":"","lastName":"TestLast1Updated"}"#,
        r#"{"firstName":"TestFirst1Updated","lastName":"\t "}"#,
        "not json",
    ];

    for body in bodies {
        let response = send(app(&repo), Method::PUT, "/api/employee/1", Some(body)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {body:?}");
    }

    let counts = repo.call_counts();
    assert_eq!(counts.find_by_id, 0);
    assert_eq!(counts.save, 0);
    assert_eq!(
        repo.find_by_id(EmployeeId(1)).await.unwrap(),
        Some(Employee::with_id(1, "TestFirst1", "TestLast1"))
    );
}

#[tokio::test]
async fn test_update_non_positive_id_is_bad_request() {
    let repo = two_employees();

    let response = send(
        app(&repo),
        Method::PUT,
        "/api/employee/0",
        Some(r#"{"firstName":"A","lastName":"B"}"#),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(repo.call_counts().find_by_id, 0);
}

#[tokio::test]
async fn test_update_is_idempotent() {
    let repo = two_employees();
    let body = r#"{"firstName":"Same","lastName":"Name"}"#;

    let first = send(app(&repo), Method::PUT, "/api/employee/2", Some(body)).await;
    assert_eq!(first.status(), StatusCode::OK);
    let first: Value = json_body(first).await;
    let state_after_first = repo.find_all().await.unwrap();

    let second = send(app(&repo), Method::PUT, "/api/employee/2", Some(body)).await;
    assert_eq!(second.status(), StatusCode::OK);
    let second: Value = json_body(second).await;

    assert_eq!(first, second);
    assert_eq!(repo.find_all().await.unwrap(), state_after_first);
}

// =========================================================
// Health
// =========================================================

#[tokio::test]
async fn test_health_reports_store_status() {
    let repo = LocalRepository::new();

    let response = send(app(&repo), Method::GET, "/health", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = json_body(response).await;
    assert_eq!(body["status"], json!("ok"));
    assert_eq!(body["database"], json!("connected"));
    assert_eq!(body["version"], json!(env!("CARGO_PKG_VERSION")));

    repo.set_healthy(false);
    let response = send(app(&repo), Method::GET, "/health", None).await;
    let body: Value = json_body(response).await;
    assert_eq!(body["database"], json!("disconnected"));
}
