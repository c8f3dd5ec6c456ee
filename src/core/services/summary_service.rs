use crate::domain::{Amount, Expense, MonthFilter};
use crate::errors::{LedgerError, Result};

/// Aggregated spending over the whole ledger or a single month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub month: Option<MonthFilter>,
    pub total: Amount,
    pub count: usize,
}

pub struct SummaryService;

impl SummaryService {
    pub fn summarize(records: &[Expense], month: Option<MonthFilter>) -> Result<Summary> {
        let mut total = Amount::ZERO;
        let mut count = 0;
        for expense in records
            .iter()
            .filter(|expense| month.map_or(true, |month| month.matches(expense.date)))
        {
            total = total
                .checked_add(expense.amount)
                .ok_or_else(|| LedgerError::validation("total exceeds the supported range"))?;
            count += 1;
        }
        Ok(Summary {
            month,
            total,
            count,
        })
    }
}
