#![allow(dead_code)]

use std::path::PathBuf;

use chrono::NaiveDate;
use expense_ledger::{
    core::{FixedClock, LedgerManager},
    storage::CsvStore,
};
use tempfile::TempDir;

pub fn march(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, day).expect("valid date")
}

/// A ledger on a fresh temp dir with its clock pinned to `date`.
pub fn ledger_on(date: NaiveDate) -> (TempDir, LedgerManager) {
    let temp = TempDir::new().expect("create temp dir");
    let ledger = ledger_at(temp.path().join("expenses.csv"), date);
    (temp, ledger)
}

/// Opens (and initializes) the ledger stored at `path`.
pub fn ledger_at(path: PathBuf, date: NaiveDate) -> LedgerManager {
    let ledger = LedgerManager::new(Box::new(CsvStore::new(path)), Box::new(FixedClock::new(date)));
    ledger.initialize().expect("initialize ledger");
    ledger
}

pub fn file_bytes(ledger: &LedgerManager) -> Vec<u8> {
    std::fs::read(ledger.storage().location()).expect("read ledger file")
}
