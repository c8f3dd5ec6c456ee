pub mod csv_backend;

use std::path::Path;

use crate::{domain::Expense, errors::Result};

/// Result of exporting the ledger to a new file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportOutcome {
    Written { records: usize },
    AlreadyExists,
}

/// Abstraction over persistence backends holding the full expense collection.
pub trait RecordStore: Send + Sync {
    /// Creates an empty store (header only) when none exists yet.
    fn ensure_initialized(&self) -> Result<()>;
    /// Loads every record in file order.
    fn read_all(&self) -> Result<Vec<Expense>>;
    /// Replaces the persisted collection with exactly `records`.
    fn rewrite_all(&self, records: &[Expense]) -> Result<()>;
    /// Writes `records` to a new file at `path`, never touching an existing one.
    fn export_to(&self, path: &Path, records: &[Expense]) -> Result<ExportOutcome>;
    fn location(&self) -> &Path;
}

pub use csv_backend::CsvStore;
