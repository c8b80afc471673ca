//! Postgres-backed employee repository.
//!
//! Diesel runs synchronously, so every query is executed on the blocking
//! thread pool with a connection checked out of an r2d2 pool. Pending
//! migrations under `migrations/` are applied when the repository is built.
//!
//! Environment variables read by [`PostgresConfig::from_env`]:
//! - `DATABASE_URL` or `PG_DATABASE_URL` (required)
//! - `PG_POOL_MAX`, `PG_POOL_MIN`
//! - `PG_CONN_TIMEOUT_SEC`, `PG_IDLE_TIMEOUT_SEC`

use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::db::repository::{EmployeeRepository, ErrorContext, RepositoryError, RepositoryResult};
use crate::models::{Employee, EmployeeId};

mod models;
mod schema;

use models::{EmployeeNamesChangeset, EmployeeRow, NewEmployeeRow};
use schema::employees;

type PgPool = Pool<ConnectionManager<PgConnection>>;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("src/db/repositories/postgres/migrations");

/// Connection and pool settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostgresConfig {
    pub database_url: String,
    pub pool_max: u32,
    pub pool_min: u32,
    pub connect_timeout: Duration,
    pub idle_timeout: Duration,
}

impl PostgresConfig {
    pub fn with_url(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            pool_max: 10,
            pool_min: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
        }
    }

    /// Read settings from the environment. Unparseable numbers fall back to
    /// the defaults of [`Self::with_url`].
    pub fn from_env() -> RepositoryResult<Self> {
        let url = std::env::var("DATABASE_URL")
            .or_else(|_| std::env::var("PG_DATABASE_URL"))
            .map_err(|_| {
                RepositoryError::configuration("DATABASE_URL or PG_DATABASE_URL must be set")
            })?;

        fn parsed<T: std::str::FromStr>(key: &str) -> Option<T> {
            std::env::var(key).ok()?.parse().ok()
        }

        let mut config = Self::with_url(url);
        config.pool_max = parsed("PG_POOL_MAX").unwrap_or(config.pool_max);
        config.pool_min = parsed("PG_POOL_MIN").unwrap_or(config.pool_min);
        if let Some(secs) = parsed("PG_CONN_TIMEOUT_SEC") {
            config.connect_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = parsed("PG_IDLE_TIMEOUT_SEC") {
            config.idle_timeout = Duration::from_secs(secs);
        }
        Ok(config)
    }
}

/// Snapshot of pool occupancy and query counters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PoolStats {
    pub connections: u32,
    pub idle_connections: u32,
    pub max_size: u32,
    pub total_queries: u64,
    pub failed_queries: u64,
}

#[derive(Debug, Default)]
struct QueryCounters {
    total: AtomicU64,
    failed: AtomicU64,
}

#[derive(Clone, Debug)]
pub struct PostgresRepository {
    pool: PgPool,
    max_size: u32,
    counters: Arc<QueryCounters>,
}

impl PostgresRepository {
    /// Build the pool and apply pending migrations. Blocks the calling thread.
    pub fn new(config: PostgresConfig) -> RepositoryResult<Self> {
        let pool = Pool::builder()
            .max_size(config.pool_max)
            .min_idle(Some(config.pool_min))
            .connection_timeout(config.connect_timeout)
            .idle_timeout(Some(config.idle_timeout))
            .test_on_check_out(true)
            .build(ConnectionManager::<PgConnection>::new(&config.database_url))
            .map_err(|e| RepositoryError::connection(e.to_string(), ErrorContext::new("connect")))?;

        let mut conn = pool
            .get()
            .map_err(|e| RepositoryError::from(e).in_operation("migrate"))?;
        conn.run_pending_migrations(MIGRATIONS).map_err(|e| {
            RepositoryError::internal(e.to_string(), ErrorContext::new("migrate"))
        })?;

        Ok(Self {
            pool,
            max_size: config.pool_max,
            counters: Arc::new(QueryCounters::default()),
        })
    }

    pub fn get_pool_stats(&self) -> PoolStats {
        let state = self.pool.state();
        PoolStats {
            connections: state.connections,
            idle_connections: state.idle_connections,
            max_size: self.max_size,
            total_queries: self.counters.total.load(Ordering::Relaxed),
            failed_queries: self.counters.failed.load(Ordering::Relaxed),
        }
    }

    /// Run `query` once on a pooled connection. Failures are not retried.
    async fn run<T, F>(&self, operation: &'static str, query: F) -> RepositoryResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut PgConnection) -> RepositoryResult<T> + Send + 'static,
    {
        let pool = self.pool.clone();
        let counters = self.counters.clone();

        let outcome = tokio::task::spawn_blocking(move || {
            counters.total.fetch_add(1, Ordering::Relaxed);
            let result = pool
                .get()
                .map_err(RepositoryError::from)
                .and_then(|mut conn| query(&mut *conn));
            if result.is_err() {
                counters.failed.fetch_add(1, Ordering::Relaxed);
            }
            result
        })
        .await
        .map_err(|e| RepositoryError::internal(e.to_string(), ErrorContext::new(operation)))?;

        outcome.map_err(|e| e.in_operation(operation))
    }
}

#[async_trait]
impl EmployeeRepository for PostgresRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        self.run("health_check", |conn| {
            diesel::sql_query("SELECT 1").execute(conn)?;
            Ok(true)
        })
        .await
    }

    async fn find_all(&self) -> RepositoryResult<Vec<Employee>> {
        self.run("find_all", |conn| {
            let rows: Vec<EmployeeRow> = employees::table
                .select(EmployeeRow::as_select())
                .order(employees::id.asc())
                .load(conn)?;
            Ok(rows.into_iter().map(Employee::from).collect())
        })
        .await
    }

    async fn find_by_id(&self, id: EmployeeId) -> RepositoryResult<Option<Employee>> {
        self.run("find_by_id", move |conn| {
            let row: Option<EmployeeRow> = employees::table
                .find(id.value())
                .select(EmployeeRow::as_select())
                .first(conn)
                .optional()?;
            Ok(row.map(Employee::from))
        })
        .await
    }

    async fn save(&self, employee: Employee) -> RepositoryResult<Employee> {
        self.run("save", move |conn| {
            let Employee {
                id,
                first_name,
                last_name,
            } = employee;

            let row: EmployeeRow = match id {
                None => diesel::insert_into(employees::table)
                    .values(NewEmployeeRow {
                        first_name,
                        last_name,
                    })
                    .returning(EmployeeRow::as_returning())
                    .get_result(conn)?,
                Some(id) => diesel::update(employees::table.find(id.value()))
                    .set(EmployeeNamesChangeset {
                        first_name,
                        last_name,
                    })
                    .returning(EmployeeRow::as_returning())
                    .get_result(conn)
                    .optional()?
                    .ok_or_else(|| RepositoryError::employee_not_found(id, "save"))?,
            };
            Ok(Employee::from(row))
        })
        .await
    }
}
