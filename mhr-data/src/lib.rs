//! Bulk import of machine records from CSV.

mod loader;

pub use loader::{LoadSummary, MachineCsvLoader, MachineCsvLoaderError, MachineCsvRecord};
