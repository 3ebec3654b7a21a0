use async_trait::async_trait;
use thiserror::Error;

use crate::models::{MachineRecord, NewMachineRecord};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("Record not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Storage for machine records.
///
/// Records are keyed by a backend-assigned id; machine names are unique, so
/// callers can also look a machine up by name to update it in place.
#[async_trait]
pub trait MachineRepository: Send + Sync {
    async fn create_machine(
        &self,
        machine: NewMachineRecord,
    ) -> Result<MachineRecord, RepositoryError>;

    async fn get_machine(
        &self,
        id: i64,
    ) -> Result<MachineRecord, RepositoryError>;

    async fn get_machine_by_name(
        &self,
        machine_name: &str,
    ) -> Result<MachineRecord, RepositoryError>;

    /// Replaces the input and output of an existing record and bumps its
    /// `updated_at`.
    async fn update_machine(
        &self,
        machine: &MachineRecord,
    ) -> Result<(), RepositoryError>;

    async fn delete_machine(
        &self,
        id: i64,
    ) -> Result<(), RepositoryError>;

    /// All machines, most recently updated first.
    async fn list_machines(&self) -> Result<Vec<MachineRecord>, RepositoryError>;
}
