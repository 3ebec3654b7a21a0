pub mod factory;
pub mod repository;
pub mod save;

pub use factory::{DbConfig, RepositoryFactory, RepositoryRegistry};
pub use repository::{MachineRepository, RepositoryError};
pub use save::{SaveAction, save_machine};
