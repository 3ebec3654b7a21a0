//! SQLite storage backend for machine records.

pub mod decimal;
mod factory;
mod repository;

pub use factory::{SqliteRepositoryFactory, connection_url};
pub use repository::SqliteRepository;
