//! Ledger engine: id allocation, validated operations, and the store facade.

pub mod clock;
pub mod ids;
pub mod ledger_manager;
pub mod services;

pub use clock::{Clock, FixedClock, SystemClock};
pub use ledger_manager::{DateOnUpdate, LedgerManager};
