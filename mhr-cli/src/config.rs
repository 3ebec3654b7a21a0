//! Application configuration.
//!
//! Settings come from a TOML file with three optional tables:
//!
//! ```toml
//! [database]
//! backend = "sqlite"
//! connection = "machines.db"
//!
//! [costing]
//! days_per_month = 30
//! days_per_year = 365
//!
//! [logging]
//! level = "info"
//! file = "mhr.log"
//! ```
//!
//! The file is looked up at the path passed with `--config`, then at
//! `./mhr.toml`. When neither exists the built-in defaults apply. The database
//! connection can be overridden by `MHR_DATABASE` and then by `--db`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use mhr_core::calculations::{CostBasisConfig, CostBasisConfigError};
use mhr_core::db::DbConfig;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_CONFIG_FILE: &str = "mhr.toml";
pub const DATABASE_ENV_VAR: &str = "MHR_DATABASE";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid [costing] table: {0}")]
    Costing(#[from] CostBasisConfigError),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub backend: String,
    /// File path, `:memory:` or a backend URL.
    pub connection: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            backend: "sqlite".to_string(),
            connection: "machines.db".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Any `EnvFilter` directive. `RUST_LOG` takes precedence when set.
    pub level: String,
    /// Log records are appended here in addition to stderr.
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            file: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub costing: CostBasisConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(
        text: &str,
        path: &Path,
    ) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.costing.validate()?;
        Ok(config)
    }

    /// Loads `explicit` if given, else `./mhr.toml` if present, else defaults.
    ///
    /// An explicit path that cannot be read is an error; a missing default
    /// file is not.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !default_path.is_file() {
                    debug!("No {DEFAULT_CONFIG_FILE} found; using defaults");
                    return Ok(Self::default());
                }
                default_path
            }
        };

        let text = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        debug!(path = %path.display(), "Loaded config file");
        Self::from_toml_str(&text, &path)
    }

    /// Applies connection overrides; the command-line value wins.
    pub fn with_database_override(
        mut self,
        from_env: Option<String>,
        from_cli: Option<String>,
    ) -> Self {
        if let Some(connection) = from_cli.or(from_env).filter(|c| !c.trim().is_empty()) {
            self.database.connection = connection;
        }
        self
    }

    pub fn db_config(&self) -> DbConfig {
        DbConfig {
            backend: self.database.backend.clone(),
            connection_string: self.database.connection.clone(),
        }
    }
}
