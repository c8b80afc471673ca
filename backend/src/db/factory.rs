//! Backend selection.
//!
//! [`RepositoryFactory::from_env`] resolves the backend in this order:
//! 1. `REPOSITORY_CONFIG`, an explicit `repository.toml` path
//! 2. `REPOSITORY_TYPE`, or a Postgres URL in `DATABASE_URL`/`PG_DATABASE_URL`
//! 3. a `repository.toml` found in the default search paths
//! 4. the in-memory repository

use log::info;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use super::repo_config::{default_search_paths, RepositoryConfig};
use super::repositories::LocalRepository;
#[cfg(feature = "postgres-repo")]
use super::repositories::PostgresRepository;
#[cfg(feature = "postgres-repo")]
use super::repository::ErrorContext;
use super::repository::{EmployeeRepository, RepositoryError, RepositoryResult};
use super::PostgresConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryType {
    /// Diesel over a Postgres pool
    Postgres,
    /// In-memory store
    Local,
}

impl FromStr for RepositoryType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "pg" => Ok(Self::Postgres),
            "local" => Ok(Self::Local),
            other => Err(format!("Unknown repository type '{}'", other)),
        }
    }
}

impl RepositoryType {
    /// Backend requested by the environment, if any.
    ///
    /// An unparseable `REPOSITORY_TYPE` selects the in-memory store.
    pub fn from_env() -> Option<Self> {
        if let Ok(value) = std::env::var("REPOSITORY_TYPE") {
            return Some(value.parse().unwrap_or(Self::Local));
        }

        ["DATABASE_URL", "PG_DATABASE_URL"]
            .iter()
            .any(|key| std::env::var(key).is_ok())
            .then_some(Self::Postgres)
    }
}

pub struct RepositoryFactory;

impl RepositoryFactory {
    /// `postgres` must be provided for [`RepositoryType::Postgres`].
    pub async fn create(
        kind: RepositoryType,
        postgres: Option<&PostgresConfig>,
    ) -> RepositoryResult<Arc<dyn EmployeeRepository>> {
        match (kind, postgres) {
            (RepositoryType::Local, _) => Ok(Self::create_local()),
            (RepositoryType::Postgres, None) => Err(RepositoryError::configuration(
                "the postgres repository needs connection settings",
            )),
            #[cfg(feature = "postgres-repo")]
            (RepositoryType::Postgres, Some(config)) => {
                Ok(Self::create_postgres(config).await? as Arc<dyn EmployeeRepository>)
            }
            #[cfg(not(feature = "postgres-repo"))]
            (RepositoryType::Postgres, Some(_)) => Err(RepositoryError::configuration(
                "built without the postgres-repo feature",
            )),
        }
    }

    /// Connect and migrate on the blocking pool.
    #[cfg(feature = "postgres-repo")]
    pub async fn create_postgres(config: &PostgresConfig) -> RepositoryResult<Arc<PostgresRepository>> {
        let config = config.clone();
        let repo = tokio::task::spawn_blocking(move || PostgresRepository::new(config))
            .await
            .map_err(|e| RepositoryError::internal(e.to_string(), ErrorContext::new("connect")))??;
        Ok(Arc::new(repo))
    }

    pub fn create_local() -> Arc<dyn EmployeeRepository> {
        Arc::new(LocalRepository::new())
    }

    /// Build the backend described by the environment, falling back to a
    /// `repository.toml` in the default search paths.
    pub async fn from_env() -> RepositoryResult<Arc<dyn EmployeeRepository>> {
        Self::from_env_or_files(&default_search_paths()).await
    }

    /// Like [`Self::from_env`], searching `search_paths` for a config file.
    pub async fn from_env_or_files<P: AsRef<Path>>(
        search_paths: &[P],
    ) -> RepositoryResult<Arc<dyn EmployeeRepository>> {
        if let Ok(path) = std::env::var("REPOSITORY_CONFIG") {
            info!("Loading repository config from REPOSITORY_CONFIG={}", path);
            return Self::from_config_file(path).await;
        }

        if let Some(kind) = RepositoryType::from_env() {
            info!("Using {:?} repository from environment", kind);
            return match kind {
                RepositoryType::Local => Ok(Self::create_local()),
                RepositoryType::Postgres => {
                    Self::create(kind, Some(&Self::postgres_config_from_env()?)).await
                }
            };
        }

        match RepositoryConfig::locate(search_paths) {
            Some(path) => {
                info!("Loading repository config from {}", path.display());
                Self::from_config_file(path).await
            }
            None => Ok(Self::create_local()),
        }
    }

    pub async fn from_config_file<P: AsRef<Path>>(
        path: P,
    ) -> RepositoryResult<Arc<dyn EmployeeRepository>> {
        let config = RepositoryConfig::from_file(path)?;
        let kind = config.repository_type()?;
        Self::create(kind, config.postgres_config()?.as_ref()).await
    }

    #[cfg(feature = "postgres-repo")]
    fn postgres_config_from_env() -> RepositoryResult<PostgresConfig> {
        PostgresConfig::from_env()
    }

    #[cfg(not(feature = "postgres-repo"))]
    fn postgres_config_from_env() -> RepositoryResult<PostgresConfig> {
        Err(RepositoryError::configuration(
            "built without the postgres-repo feature",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_type_from_str() {
        assert_eq!("local".parse(), Ok(RepositoryType::Local));
        assert_eq!(" Postgres ".parse(), Ok(RepositoryType::Postgres));
        assert_eq!("PG".parse(), Ok(RepositoryType::Postgres));
        assert_eq!(
            "sqlite".parse::<RepositoryType>(),
            Err("Unknown repository type 'sqlite'".to_string())
        );
    }

    #[tokio::test]
    async fn test_create_local() {
        let repo = RepositoryFactory::create(RepositoryType::Local, None)
            .await
            .unwrap();
        assert!(repo.health_check().await.unwrap());
        assert!(repo.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_postgres_without_settings_is_configuration_error() {
        let result = RepositoryFactory::create(RepositoryType::Postgres, None).await;
        assert!(matches!(result, Err(RepositoryError::Configuration(_))));
    }
}
