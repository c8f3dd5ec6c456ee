use dirs::home_dir;
use std::{env, path::PathBuf};

const DEFAULT_DIR_NAME: &str = ".expense_ledger";

/// Overrides the application data directory.
pub const HOME_ENV: &str = "EXPENSE_LEDGER_HOME";
/// Overrides the configured ledger file.
pub const LEDGER_FILE_ENV: &str = "EXPENSE_LEDGER_FILE";
/// Selects script mode (plain stdin, no line editor).
pub const SCRIPT_ENV: &str = "EXPENSE_LEDGER_CLI_SCRIPT";

/// Returns the application-specific data directory, defaulting to `~/.expense_ledger`.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os(HOME_ENV) {
        return PathBuf::from(custom);
    }
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}
