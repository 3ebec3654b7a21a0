pub mod calculations;
pub mod db;
pub mod models;

pub use db::repository::{MachineRepository, RepositoryError};
pub use models::*;
