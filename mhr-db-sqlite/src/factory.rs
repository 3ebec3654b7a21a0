use async_trait::async_trait;
use mhr_core::db::{DbConfig, RepositoryFactory};
use mhr_core::{MachineRepository, RepositoryError};

use crate::repository::SqliteRepository;

/// Maps a user-facing connection string to a sqlx SQLite URL.
///
/// * `:memory:` becomes `sqlite::memory:`.
/// * Anything already starting with `sqlite:` is passed through.
/// * Anything else is treated as a file path.
///
/// ```
/// use mhr_db_sqlite::connection_url;
///
/// assert_eq!(connection_url(":memory:"), "sqlite::memory:");
/// assert_eq!(connection_url("machines.db"), "sqlite://machines.db");
/// assert_eq!(connection_url("sqlite://data/mhr.db"), "sqlite://data/mhr.db");
/// ```
pub fn connection_url(connection_string: &str) -> String {
    let trimmed = connection_string.trim();
    if trimmed == ":memory:" {
        "sqlite::memory:".to_string()
    } else if trimmed.starts_with("sqlite:") {
        trimmed.to_string()
    } else {
        format!("sqlite://{trimmed}")
    }
}

/// [`RepositoryFactory`] for SQLite.
///
/// ```rust,no_run
/// use mhr_core::db::RepositoryRegistry;
/// use mhr_db_sqlite::SqliteRepositoryFactory;
///
/// let mut registry = RepositoryRegistry::new();
/// registry.register(Box::new(SqliteRepositoryFactory));
/// ```
pub struct SqliteRepositoryFactory;

#[async_trait]
impl RepositoryFactory for SqliteRepositoryFactory {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    /// Opens the database named by `config.connection_string` (see
    /// [`connection_url`]) and brings its schema up to date.
    async fn create(
        &self,
        config: &DbConfig,
    ) -> Result<Box<dyn MachineRepository>, RepositoryError> {
        let url = connection_url(&config.connection_string);
        let repo = SqliteRepository::new(&url)
            .await
            .map_err(|e| RepositoryError::Connection(format!("{e:#}")))?;
        repo.run_migrations()
            .await
            .map_err(|e| RepositoryError::Database(format!("{e:#}")))?;
        Ok(Box::new(repo))
    }
}
