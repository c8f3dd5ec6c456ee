use chrono::NaiveDate;

use super::amount::Amount;

/// Column layout shared by the ledger file and every export.
pub const FIELD_NAMES: [&str; 4] = ["id", "date", "description", "amount"];

/// Fixed-width calendar format used for the `date` column.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A single recorded expense.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expense {
    pub id: u64,
    pub date: NaiveDate,
    pub description: String,
    pub amount: Amount,
}

impl Expense {
    pub fn new(id: u64, date: NaiveDate, description: impl Into<String>, amount: Amount) -> Self {
        Self {
            id,
            date,
            description: description.into(),
            amount,
        }
    }

    pub fn formatted_date(&self) -> String {
        self.date.format(DATE_FORMAT).to_string()
    }

    /// Renders the record in column order, ready to be written as a row.
    pub fn to_row(&self) -> [String; 4] {
        [
            self.id.to_string(),
            self.formatted_date(),
            self.description.clone(),
            self.amount.to_stored(),
        ]
    }
}
