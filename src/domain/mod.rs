//! Expense domain model shared by storage, services, and the shell.

pub mod amount;
pub mod expense;
pub mod month;

pub use amount::{Amount, CURRENCY_PREFIX, NEGATIVE_AMOUNT_MESSAGE};
pub use expense::{Expense, DATE_FORMAT, FIELD_NAMES};
pub use month::MonthFilter;
