//! Command implementations, kept free of argument parsing so they can be
//! driven from tests.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use mhr_core::calculations::MachineHourRateCalculator;
use mhr_core::db::RepositoryRegistry;
pub use mhr_core::db::{SaveAction, save_machine};
use mhr_core::{MachineInput, MachineRecord, MachineRepository, RepositoryError};
use mhr_db_sqlite::SqliteRepositoryFactory;
use tracing::{debug, info};

use crate::config::AppConfig;

/// Builds the registry of every compiled-in storage backend.
pub fn build_registry() -> RepositoryRegistry {
    let mut registry = RepositoryRegistry::new();
    registry.register(Box::new(SqliteRepositoryFactory));
    registry
}

pub fn build_calculator(config: &AppConfig) -> Result<MachineHourRateCalculator> {
    MachineHourRateCalculator::new(config.costing).context("invalid [costing] settings")
}

pub async fn open_repository(config: &AppConfig) -> Result<Box<dyn MachineRepository>> {
    let db_config = config.db_config();
    debug!(
        backend = %db_config.backend,
        connection = %db_config.connection_string,
        "Opening repository"
    );
    build_registry()
        .create(&db_config)
        .await
        .with_context(|| format!("cannot open database '{}'", db_config.connection_string))
}

/// Parses a machine input document. Missing sections and fields read as zero.
pub fn parse_input(text: &str) -> Result<MachineInput, toml::de::Error> {
    toml::from_str(text)
}

pub fn read_input_file(path: &Path) -> Result<MachineInput> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("cannot read input file '{}'", path.display()))?;
    parse_input(&text).with_context(|| format!("invalid input file '{}'", path.display()))
}

/// Resolves a machine by numeric id, falling back to its name.
pub async fn find_machine(
    repo: &dyn MachineRepository,
    key: &str,
) -> Result<MachineRecord, RepositoryError> {
    let key = key.trim();
    if let Ok(id) = key.parse::<i64>() {
        match repo.get_machine(id).await {
            Err(RepositoryError::NotFound) => {}
            found => return found,
        }
    }
    repo.get_machine_by_name(key).await
}

/// Recomputes the stored output of every machine, e.g. after the costing
/// basis changed. Returns the number of machines updated.
pub async fn recalculate_all(
    repo: &dyn MachineRepository,
    calculator: &MachineHourRateCalculator,
) -> Result<usize, RepositoryError> {
    let machines = repo.list_machines().await?;
    let count = machines.len();

    for mut machine in machines {
        machine.output = Some(calculator.output(&machine.input));
        repo.update_machine(&machine).await?;
    }

    info!(count, "Recalculated machines");
    Ok(count)
}
