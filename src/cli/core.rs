//! Shell context: runs dispatched intents against the ledger and reports results.

use std::{io, path::PathBuf};

use rustyline::error::ReadlineError;

use crate::cli::dispatcher::{Dispatch, Dispatcher, Intent};
use crate::cli::help;
use crate::cli::output;
use crate::cli::table::expense_table;
use crate::config::{Config, ConfigError};
use crate::core::{Clock, LedgerManager, SystemClock};
use crate::core::services::Summary;
use crate::domain::Expense;
use crate::errors::LedgerError;
use crate::storage::{CsvStore, ExportOutcome};

pub const END_OF_PROGRAM: &str = "End of program";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

/// Errors that end the session before or outside a single command.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Readline(#[from] ReadlineError),
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Errors reported for one command; the session continues afterwards.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type CommandResult = Result<Outcome, CommandError>;

/// What a successfully executed intent produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Added(Expense),
    Updated(Expense),
    Deleted(u64),
    Listed(Vec<Expense>),
    Summarized(Summary),
    Exported {
        path: PathBuf,
        result: ExportOutcome,
    },
    Help(Option<String>),
}

pub struct ShellContext {
    pub mode: CliMode,
    pub dispatcher: Dispatcher,
    pub ledger: LedgerManager,
    pub last_command: Option<String>,
    pub running: bool,
}

impl ShellContext {
    pub fn new(mode: CliMode, ledger: LedgerManager) -> Self {
        Self {
            mode,
            dispatcher: Dispatcher::new(),
            ledger,
            last_command: None,
            running: true,
        }
    }

    /// Builds a context over the CSV ledger named by `config`, or `ledger_file`.
    pub fn from_config(mode: CliMode, config: &Config, ledger_file: Option<PathBuf>) -> Self {
        Self::with_clock(mode, config, ledger_file, Box::new(SystemClock))
    }

    pub fn with_clock(
        mode: CliMode,
        config: &Config,
        ledger_file: Option<PathBuf>,
        clock: Box<dyn Clock>,
    ) -> Self {
        let path = ledger_file.unwrap_or_else(|| config.resolved_ledger_file());
        let ledger = LedgerManager::new(Box::new(CsvStore::new(path)), clock)
            .with_date_on_update(config.date_on_update);
        Self::new(mode, ledger)
    }

    /// Prepares the ledger file; must run once before the first command.
    pub fn start(&self) -> Result<(), CliError> {
        self.ledger.initialize()?;
        tracing::debug!(
            path = %self.ledger.storage().location().display(),
            mode = ?self.mode,
            "session started"
        );
        Ok(())
    }

    pub(crate) fn process_line(&mut self, line: &str) -> LoopControl {
        let trimmed = line.trim();
        match self.dispatcher.dispatch(trimmed) {
            Dispatch::Empty => LoopControl::Continue,
            Dispatch::EndSession => {
                self.end_session();
                LoopControl::Exit
            }
            Dispatch::Rejected(message) => {
                self.last_command = Some(trimmed.to_string());
                tracing::warn!(command = trimmed, %message, "command rejected");
                output::error(&message);
                output::hint("Type `help` to see available commands.");
                LoopControl::Continue
            }
            Dispatch::Intent(intent) => {
                self.last_command = Some(trimmed.to_string());
                match self.execute(intent) {
                    Ok(outcome) => self.report(&outcome),
                    Err(err) => self.report_error(err),
                }
                LoopControl::Continue
            }
        }
    }

    pub fn execute(&self, intent: Intent) -> CommandResult {
        let outcome = match intent {
            Intent::Add {
                description,
                amount,
            } => Outcome::Added(self.ledger.add(&description, amount)?),
            Intent::Update {
                id,
                description,
                amount,
            } => Outcome::Updated(self.ledger.update(id, &description, amount)?),
            Intent::Delete { id } => Outcome::Deleted(self.ledger.delete(id)?),
            Intent::List => Outcome::Listed(self.ledger.list()?),
            Intent::Summary { month } => Outcome::Summarized(self.ledger.summary(month)?),
            Intent::Export { filename } => {
                if filename.as_os_str().is_empty() {
                    return Err(CommandError::InvalidArguments(
                        "export needs a file name".into(),
                    ));
                }
                let result = self.ledger.export(&filename)?;
                Outcome::Exported {
                    path: filename,
                    result,
                }
            }
            Intent::Help { topic } => Outcome::Help(topic),
        };
        Ok(outcome)
    }

    pub fn report(&self, outcome: &Outcome) {
        match outcome {
            Outcome::Added(expense) => {
                output::success(format!("Expense added successfully (ID: {})", expense.id))
            }
            Outcome::Updated(expense) => {
                output::success(format!("Expense updated successfully (ID: {})", expense.id))
            }
            Outcome::Deleted(id) => {
                output::success(format!("Expense deleted successfully (ID: {})", id))
            }
            Outcome::Listed(expenses) if expenses.is_empty() => {
                output::info("No expenses recorded.")
            }
            Outcome::Listed(expenses) => {
                println!("\n{}\n", expense_table(expenses).render());
            }
            Outcome::Summarized(summary) => match summary.month {
                Some(month) => output::info(format!(
                    "Total expenses for {}: {}$",
                    month.name(),
                    summary.total
                )),
                None => output::info(format!("Total expenses: {}$", summary.total)),
            },
            Outcome::Exported {
                result: ExportOutcome::Written { .. },
                ..
            } => output::success("Data exported successfully"),
            Outcome::Exported {
                path,
                result: ExportOutcome::AlreadyExists,
            } => {
                output::warning("File already exists");
                output::hint(format!(
                    "`{}` was left untouched; choose another file name.",
                    path.display()
                ));
            }
            Outcome::Help(None) => help::print_overview(&self.dispatcher),
            Outcome::Help(Some(topic)) => {
                if !help::print_topic(&self.dispatcher, topic) {
                    output::error(format!("No help for `{}`", topic));
                }
            }
        }
    }

    pub fn report_error(&self, err: CommandError) {
        match err {
            CommandError::Ledger(err @ LedgerError::Storage(_)) => {
                tracing::warn!(error = %err, "command aborted");
                output::error(&err);
                output::hint("The ledger file was left unchanged.");
            }
            CommandError::Ledger(err) => output::error(err),
            CommandError::InvalidArguments(message) => output::error(message),
            CommandError::Io(err) => {
                tracing::warn!(error = %err, "command aborted");
                output::error(err);
            }
        }
    }

    /// Moves the session to its final state and prints the termination notice.
    pub fn end_session(&mut self) {
        if self.running {
            self.running = false;
            output::info(END_OF_PROGRAM);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::FixedClock;
    use crate::domain::{Amount, MonthFilter};
    use chrono::NaiveDate;
    use tempfile::{tempdir, TempDir};

    fn context() -> (TempDir, ShellContext) {
        let dir = tempdir().unwrap();
        let config = Config::default();
        let clock = FixedClock::new(NaiveDate::from_ymd_opt(2024, 3, 14).unwrap());
        let context = ShellContext::with_clock(
            CliMode::Script,
            &config,
            Some(dir.path().join("expenses.csv")),
            Box::new(clock),
        );
        context.start().unwrap();
        (dir, context)
    }

    fn run(context: &ShellContext, line: &str) -> CommandResult {
        match context.dispatcher.dispatch(line) {
            Dispatch::Intent(intent) => context.execute(intent),
            other => panic!("`{line}` did not dispatch to an intent: {other:?}"),
        }
    }

    #[test]
    fn coffee_and_book_scenario() {
        let (_dir, context) = context();

        run(&context, "ledger add --description coffee --amount 3").unwrap();
        let Outcome::Listed(listed) = run(&context, "ledger list").unwrap() else {
            panic!("expected a listing");
        };
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, 1);
        assert_eq!(listed[0].description, "coffee");
        assert_eq!(listed[0].amount.to_stored(), "$3");

        let Outcome::Added(book) = run(&context, "ledger add --description book --amount 20").unwrap()
        else {
            panic!("expected an add");
        };
        assert_eq!(book.id, 2);

        let Outcome::Summarized(summary) = run(&context, "ledger summary").unwrap() else {
            panic!("expected a summary");
        };
        assert_eq!(summary.total.to_string(), "23");

        assert_eq!(
            run(&context, "ledger delete 1").unwrap(),
            Outcome::Deleted(1)
        );
        let Outcome::Summarized(summary) = run(&context, "ledger summary").unwrap() else {
            panic!("expected a summary");
        };
        assert_eq!(summary.total, Amount::from_cents(2000));
    }

    #[test]
    fn monthly_summary_carries_month() {
        let (_dir, context) = context();
        run(&context, "ledger add --description coffee --amount 3").unwrap();

        let Outcome::Summarized(summary) = run(&context, "ledger summary --month 03").unwrap()
        else {
            panic!("expected a summary");
        };
        assert_eq!(summary.month, Some(MonthFilter::parse("03").unwrap()));
        assert_eq!(summary.total, Amount::from_cents(300));
    }

    #[test]
    fn missing_ids_surface_as_ledger_errors() {
        let (_dir, context) = context();
        let err = run(&context, "ledger delete 9").unwrap_err();
        assert!(matches!(err, CommandError::Ledger(LedgerError::NotFound(9))));
    }

    #[test]
    fn end_stops_the_session_once() {
        let (_dir, mut context) = context();
        assert_eq!(context.process_line("ledger list"), LoopControl::Continue);
        assert_eq!(context.process_line("no-such"), LoopControl::Continue);
        assert!(context.running);
        assert_eq!(context.process_line("end"), LoopControl::Exit);
        assert!(!context.running);
        assert_eq!(context.last_command.as_deref(), Some("no-such"));
    }

    #[test]
    fn export_reports_existing_target() {
        let (dir, context) = context();
        let target = dir.path().join("copy.csv");
        std::fs::write(&target, "keep me").unwrap();

        let outcome = context
            .execute(Intent::Export {
                filename: target.clone(),
            })
            .unwrap();
        assert!(matches!(
            outcome,
            Outcome::Exported {
                result: ExportOutcome::AlreadyExists,
                ..
            }
        ));
        assert_eq!(std::fs::read_to_string(&target).unwrap(), "keep me");
    }
}
