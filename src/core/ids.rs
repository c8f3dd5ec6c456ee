//! Identifier allocation for new expenses.

use crate::domain::Expense;

/// Returns `max(id) + 1`, or `1` for an empty ledger.
///
/// Callers must hold the ledger write guard between this call and the rewrite
/// that persists the new record.
pub fn next_id(records: &[Expense]) -> u64 {
    records
        .iter()
        .map(|expense| expense.id)
        .max()
        .map_or(1, |max| max.saturating_add(1))
}
