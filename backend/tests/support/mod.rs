#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Mutex;

use employee_api::db::repositories::LocalRepository;
use employee_api::models::Employee;

#[cfg(feature = "http-server")]
pub use router_client::*;

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Runs `f` with environment variables temporarily modified.
///
/// Restores variables on unwind and serializes access to process-global env
/// vars so parallel tests do not interfere.
///
/// `changes` is a list of `(key, value)` pairs:
/// - `Some(v)` sets the variable to `v`
/// - `None` removes the variable
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let _guard = ScopedEnv::new(changes);
    f()
}

struct ScopedEnv {
    snapshot: Vec<(String, Option<String>)>,
}

impl ScopedEnv {
    fn new(changes: &[(&str, Option<&str>)]) -> Self {
        let keys: HashSet<&str> = changes.iter().map(|(k, _)| *k).collect();
        let snapshot = keys
            .into_iter()
            .map(|k| (k.to_string(), std::env::var(k).ok()))
            .collect::<Vec<_>>();

        for (k, v) in changes {
            match v {
                Some(val) => std::env::set_var(k, val),
                None => std::env::remove_var(k),
            }
        }

        Self { snapshot }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (k, v) in self.snapshot.drain(..) {
            match v {
                Some(val) => std::env::set_var(&k, val),
                None => std::env::remove_var(&k),
            }
        }
    }
}

/// Repository seeded with `(id, first, last)` rows.
pub fn seeded(rows: &[(i32, &str, &str)]) -> LocalRepository {
    LocalRepository::with_employees(
        rows.iter()
            .map(|(id, first, last)| Employee::with_id(*id, *first, *last)),
    )
}

#[cfg(feature = "http-server")]
mod router_client {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{header, Method, Request, Response};
    use axum::Router;
    use http_body_util::BodyExt;
    use serde::de::DeserializeOwned;
    use tower::ServiceExt;

    use employee_api::db::repositories::LocalRepository;
    use employee_api::db::repository::EmployeeRepository;
    use employee_api::http::{create_router, AppState};

    /// Build the full application router over `repo`.
    ///
    /// The router shares storage with `repo`, so call counts and stored rows
    /// can be inspected after a request.
    pub fn app(repo: &LocalRepository) -> Router {
        let repository = Arc::new(repo.clone()) as Arc<dyn EmployeeRepository>;
        create_router(AppState::new(repository))
    }

    /// Send a request with an optional raw JSON body through the router.
    pub async fn send(app: Router, method: Method, uri: &str, json: Option<&str>) -> Response<Body> {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::ACCEPT, "application/json");

        let request = match json {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        app.oneshot(request).await.unwrap()
    }

    /// Read the response body and deserialize it as JSON.
    pub async fn json_body<T: DeserializeOwned>(response: Response<Body>) -> T {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }
}
