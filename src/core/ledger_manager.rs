use std::{
    path::Path,
    sync::{Mutex, MutexGuard},
};

use serde::{Deserialize, Serialize};

use crate::core::clock::Clock;
use crate::core::services::{ExpenseService, Summary, SummaryService};
use crate::domain::{Amount, Expense, MonthFilter};
use crate::errors::{LedgerError, Result};
use crate::storage::{ExportOutcome, RecordStore};

/// What happens to an expense's date when it is updated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateOnUpdate {
    /// `date` is the creation date and never changes.
    #[default]
    Preserve,
    /// `date` tracks the last modification.
    Restamp,
}

/// Facade that runs every ledger operation as read, compute, and (for
/// mutations) rewrite against the record store.
pub struct LedgerManager {
    storage: Box<dyn RecordStore>,
    clock: Box<dyn Clock>,
    date_on_update: DateOnUpdate,
    write_guard: Mutex<()>,
}

impl LedgerManager {
    pub fn new(storage: Box<dyn RecordStore>, clock: Box<dyn Clock>) -> Self {
        Self {
            storage,
            clock,
            date_on_update: DateOnUpdate::default(),
            write_guard: Mutex::new(()),
        }
    }

    pub fn with_date_on_update(mut self, policy: DateOnUpdate) -> Self {
        self.date_on_update = policy;
        self
    }

    pub fn storage(&self) -> &dyn RecordStore {
        self.storage.as_ref()
    }

    pub fn date_on_update(&self) -> DateOnUpdate {
        self.date_on_update
    }

    pub fn initialize(&self) -> Result<()> {
        let _guard = self.guard()?;
        self.storage.ensure_initialized()
    }

    pub fn add(&self, description: &str, amount: Amount) -> Result<Expense> {
        let today = self.clock.today();
        let expense = self.mutate(|records| {
            ExpenseService::add(records, description, amount, today)
        })?;
        tracing::info!(id = expense.id, amount = %amount, "expense added");
        Ok(expense)
    }

    pub fn update(&self, id: u64, description: &str, amount: Amount) -> Result<Expense> {
        let date = match self.date_on_update {
            DateOnUpdate::Preserve => None,
            DateOnUpdate::Restamp => Some(self.clock.today()),
        };
        let expense = self.mutate(|records| {
            ExpenseService::update(records, id, description, amount, date)
        })?;
        tracing::info!(id, amount = %amount, "expense updated");
        Ok(expense)
    }

    pub fn delete(&self, id: u64) -> Result<u64> {
        let removed = self.mutate(|records| ExpenseService::remove(records, id))?;
        tracing::info!(id = removed.id, "expense deleted");
        Ok(removed.id)
    }

    pub fn list(&self) -> Result<Vec<Expense>> {
        let _guard = self.guard()?;
        self.storage.read_all()
    }

    pub fn find(&self, id: u64) -> Result<Expense> {
        let records = self.list()?;
        ExpenseService::find(&records, id)
            .cloned()
            .ok_or(LedgerError::NotFound(id))
    }

    pub fn summary(&self, month: Option<MonthFilter>) -> Result<Summary> {
        let records = self.list()?;
        SummaryService::summarize(&records, month)
    }

    pub fn export(&self, path: &Path) -> Result<ExportOutcome> {
        let _guard = self.guard()?;
        let records = self.storage.read_all()?;
        self.storage.export_to(path, &records)
    }

    /// Holds the write guard across read-modify-write. The store is only
    /// rewritten when `f` succeeds.
    fn mutate<T>(&self, f: impl FnOnce(&mut Vec<Expense>) -> Result<T>) -> Result<T> {
        let _guard = self.guard()?;
        let mut records = self.storage.read_all()?;
        let value = f(&mut records)?;
        self.storage.rewrite_all(&records)?;
        Ok(value)
    }

    fn guard(&self) -> Result<MutexGuard<'_, ()>> {
        self.write_guard
            .lock()
            .map_err(|_| LedgerError::storage("ledger lock poisoned"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::FixedClock;
    use crate::storage::CsvStore;
    use chrono::NaiveDate;
    use tempfile::{tempdir, TempDir};

    fn manager_on(date: NaiveDate) -> (TempDir, LedgerManager) {
        let dir = tempdir().unwrap();
        let store = CsvStore::new(dir.path().join("expenses.csv"));
        let manager = LedgerManager::new(Box::new(store), Box::new(FixedClock::new(date)));
        manager.initialize().unwrap();
        (dir, manager)
    }

    fn day(month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, month, day).unwrap()
    }

    #[test]
    fn add_stamps_clock_date() {
        let (_dir, manager) = manager_on(day(3, 14));
        let expense = manager.add("coffee", Amount::from_cents(300)).unwrap();
        assert_eq!(expense.date, day(3, 14));
        assert_eq!(manager.list().unwrap(), vec![expense]);
    }

    #[test]
    fn update_preserves_date_by_default() {
        let (dir, manager) = manager_on(day(3, 14));
        manager.add("coffee", Amount::from_cents(300)).unwrap();

        let store = CsvStore::new(dir.path().join("expenses.csv"));
        let later = LedgerManager::new(Box::new(store), Box::new(FixedClock::new(day(6, 1))));
        let updated = later.update(1, "tea", Amount::from_cents(250)).unwrap();
        assert_eq!(updated.date, day(3, 14));
        assert_eq!(updated.description, "tea");
    }

    #[test]
    fn update_restamps_when_configured() {
        let (dir, manager) = manager_on(day(3, 14));
        manager.add("coffee", Amount::from_cents(300)).unwrap();

        let store = CsvStore::new(dir.path().join("expenses.csv"));
        let later = LedgerManager::new(Box::new(store), Box::new(FixedClock::new(day(6, 1))))
            .with_date_on_update(DateOnUpdate::Restamp);
        let updated = later.update(1, "tea", Amount::from_cents(250)).unwrap();
        assert_eq!(updated.date, day(6, 1));
    }

    #[test]
    fn failed_mutation_does_not_rewrite() {
        let (_dir, manager) = manager_on(day(3, 14));
        manager.add("coffee", Amount::from_cents(300)).unwrap();
        let before = std::fs::read(manager.storage().location()).unwrap();

        assert!(matches!(manager.delete(42), Err(LedgerError::NotFound(42))));
        assert!(matches!(
            manager.update(42, "x", Amount::ZERO),
            Err(LedgerError::NotFound(42))
        ));

        let after = std::fs::read(manager.storage().location()).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn find_looks_up_by_numeric_id() {
        let (_dir, manager) = manager_on(day(3, 14));
        manager.add("coffee", Amount::from_cents(300)).unwrap();
        assert_eq!(manager.find(1).unwrap().description, "coffee");
        assert!(matches!(manager.find(2), Err(LedgerError::NotFound(2))));
    }
}
