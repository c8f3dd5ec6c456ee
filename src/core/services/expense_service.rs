//! Business logic helpers for mutating an in-memory expense collection.

use chrono::NaiveDate;

use crate::core::ids::next_id;
use crate::domain::{Amount, Expense};
use crate::errors::{LedgerError, Result};

/// Provides validated CRUD helpers over a fully materialized ledger.
pub struct ExpenseService;

impl ExpenseService {
    /// Appends a new expense with a freshly allocated id and returns it.
    pub fn add(
        records: &mut Vec<Expense>,
        description: &str,
        amount: Amount,
        date: NaiveDate,
    ) -> Result<Expense> {
        let id = next_id(records);
        if Self::find(records, id).is_some() {
            return Err(LedgerError::validation("no identifiers left to allocate"));
        }
        let expense = Expense::new(id, date, description, amount);
        records.push(expense.clone());
        Ok(expense)
    }

    /// Replaces description and amount in place; `date` re-stamps when given.
    pub fn update(
        records: &mut [Expense],
        id: u64,
        description: &str,
        amount: Amount,
        date: Option<NaiveDate>,
    ) -> Result<Expense> {
        let expense = records
            .iter_mut()
            .find(|expense| expense.id == id)
            .ok_or(LedgerError::NotFound(id))?;
        expense.description = description.to_string();
        expense.amount = amount;
        if let Some(date) = date {
            expense.date = date;
        }
        Ok(expense.clone())
    }

    /// Removes the expense identified by `id`, returning the removed record.
    pub fn remove(records: &mut Vec<Expense>, id: u64) -> Result<Expense> {
        let index = records
            .iter()
            .position(|expense| expense.id == id)
            .ok_or(LedgerError::NotFound(id))?;
        Ok(records.remove(index))
    }

    pub fn find(records: &[Expense], id: u64) -> Option<&Expense> {
        records.iter().find(|expense| expense.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, month, day).unwrap()
    }

    #[test]
    fn add_assigns_increasing_ids() {
        let mut records = Vec::new();
        let first = ExpenseService::add(&mut records, "coffee", Amount::from_cents(300), day(1, 2))
            .unwrap();
        let second =
            ExpenseService::add(&mut records, "book", Amount::from_cents(2000), day(1, 2)).unwrap();
        assert_eq!((first.id, second.id), (1, 2));
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn ids_are_not_reused_after_deleting_the_first_record() {
        let mut records = Vec::new();
        for name in ["a", "b", "c"] {
            ExpenseService::add(&mut records, name, Amount::ZERO, day(1, 1)).unwrap();
        }
        ExpenseService::remove(&mut records, 1).unwrap();
        let added = ExpenseService::add(&mut records, "d", Amount::ZERO, day(1, 1)).unwrap();
        assert_eq!(added.id, 4);
    }

    #[test]
    fn update_keeps_position_and_optionally_restamps() {
        let mut records = Vec::new();
        ExpenseService::add(&mut records, "a", Amount::ZERO, day(1, 1)).unwrap();
        ExpenseService::add(&mut records, "b", Amount::ZERO, day(1, 1)).unwrap();

        let kept =
            ExpenseService::update(&mut records, 1, "a2", Amount::from_cents(500), None).unwrap();
        assert_eq!(kept.date, day(1, 1));
        assert_eq!(records[0].description, "a2");

        let restamped =
            ExpenseService::update(&mut records, 1, "a3", Amount::ZERO, Some(day(5, 5))).unwrap();
        assert_eq!(restamped.date, day(5, 5));
        assert_eq!(records[0].id, 1);
    }

    #[test]
    fn update_and_remove_fail_for_missing_id() {
        let mut records = Vec::new();
        ExpenseService::add(&mut records, "a", Amount::ZERO, day(1, 1)).unwrap();

        let err = ExpenseService::update(&mut records, 7, "x", Amount::ZERO, None).unwrap_err();
        assert!(matches!(err, LedgerError::NotFound(7)), "unexpected error: {err:?}");

        let err = ExpenseService::remove(&mut records, 7).unwrap_err();
        assert!(matches!(err, LedgerError::NotFound(7)), "unexpected error: {err:?}");
        assert_eq!(records.len(), 1);
    }
}
