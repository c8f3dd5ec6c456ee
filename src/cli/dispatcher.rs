//! Maps a typed command line onto a structured intent.
//!
//! Dispatching is pure: nothing here touches the ledger. The shell consumes
//! the returned [`Dispatch`] and decides what to run or print.

use std::{collections::HashMap, path::PathBuf};

use shell_words::split;
use strsim::levenshtein;

use crate::cli::registry::{CommandEntry, CommandRegistry};
use crate::domain::{Amount, MonthFilter};

pub const END_COMMAND: &str = "end";
pub const LEDGER_COMMAND: &str = "ledger";
pub const HELP_COMMAND: &str = "help";

/// Top-level commands as `(name, description, usage)`.
pub const TOP_LEVEL: [(&str, &str, &str); 3] = [
    (
        LEDGER_COMMAND,
        "Expense ledger operations",
        "ledger <add|update|delete|list|summary|export> ...",
    ),
    (HELP_COMMAND, "Show available commands", "help [ledger|<subcommand>]"),
    (END_COMMAND, "End the session", "end"),
];

const SUGGESTION_DISTANCE: usize = 3;

/// A validated request for one ledger operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Add {
        description: String,
        amount: Amount,
    },
    Update {
        id: u64,
        description: String,
        amount: Amount,
    },
    Delete {
        id: u64,
    },
    List,
    Summary {
        month: Option<MonthFilter>,
    },
    Export {
        filename: PathBuf,
    },
    Help {
        topic: Option<String>,
    },
}

/// Outcome of dispatching a single line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    Empty,
    Intent(Intent),
    Rejected(String),
    EndSession,
}

pub struct Dispatcher {
    registry: CommandRegistry,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Dispatcher {
    pub fn new() -> Self {
        let mut registry = CommandRegistry::new();
        for entry in definitions() {
            registry.register(entry);
        }
        Self { registry }
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub fn dispatch(&self, line: &str) -> Dispatch {
        let tokens = match split(line) {
            Ok(tokens) => tokens,
            Err(err) => return Dispatch::Rejected(format!("cannot parse command: {}", err)),
        };
        let args: Vec<&str> = tokens.iter().map(String::as_str).collect();
        self.dispatch_tokens(&args)
    }

    pub fn dispatch_tokens(&self, tokens: &[&str]) -> Dispatch {
        let Some((command, rest)) = tokens.split_first() else {
            return Dispatch::Empty;
        };

        match command.to_ascii_lowercase().as_str() {
            END_COMMAND => {
                if let Some(extra) = rest.first() {
                    return Dispatch::Rejected(format!("unexpected argument `{}`", extra));
                }
                Dispatch::EndSession
            }
            HELP_COMMAND => Dispatch::Intent(Intent::Help {
                topic: rest.last().map(|topic| topic.to_ascii_lowercase()),
            }),
            LEDGER_COMMAND => self.dispatch_ledger(rest),
            _ => {
                let names = TOP_LEVEL.iter().map(|(name, _, _)| *name);
                Dispatch::Rejected(with_suggestion(
                    format!("No such command `{}`", command),
                    command,
                    names,
                ))
            }
        }
    }

    fn dispatch_ledger(&self, args: &[&str]) -> Dispatch {
        let Some((subcommand, rest)) = args.split_first() else {
            return Dispatch::Rejected(format!("usage: {}", TOP_LEVEL[0].2));
        };
        let name = subcommand.to_ascii_lowercase();
        let Some(entry) = self.registry.get(&name) else {
            return Dispatch::Rejected(with_suggestion(
                format!("No such command `ledger {}`", subcommand),
                subcommand,
                self.registry.names(),
            ));
        };
        match (entry.parser)(rest) {
            Ok(intent) => Dispatch::Intent(intent),
            Err(message) => Dispatch::Rejected(message),
        }
    }
}

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "add",
            "Record a new expense",
            "ledger add --description <text> --amount <number>",
            parse_add,
        ),
        CommandEntry::new(
            "update",
            "Change the description and amount of an expense",
            "ledger update <id> --description <text> --amount <number>",
            parse_update,
        ),
        CommandEntry::new(
            "delete",
            "Delete an expense",
            "ledger delete <id>",
            parse_delete,
        ),
        CommandEntry::new("list", "List all expenses", "ledger list", parse_list),
        CommandEntry::new(
            "summary",
            "Total expenses, optionally for one month",
            "ledger summary [--month <01-12>]",
            parse_summary,
        ),
        CommandEntry::new(
            "export",
            "Copy the ledger to a new CSV file",
            "ledger export <filename>",
            parse_export,
        ),
    ]
}

fn parse_add(args: &[&str]) -> Result<Intent, String> {
    let mut parsed = ParsedArgs::parse(args, &["description", "amount"])?;
    parsed.expect_positionals(0)?;
    Ok(Intent::Add {
        description: parsed.required("description")?,
        amount: parse_amount(&parsed.required("amount")?)?,
    })
}

fn parse_update(args: &[&str]) -> Result<Intent, String> {
    let mut parsed = ParsedArgs::parse(args, &["description", "amount"])?;
    let id = parse_id(parsed.expect_positionals(1)?[0])?;
    Ok(Intent::Update {
        id,
        description: parsed.required("description")?,
        amount: parse_amount(&parsed.required("amount")?)?,
    })
}

fn parse_delete(args: &[&str]) -> Result<Intent, String> {
    let parsed = ParsedArgs::parse(args, &[])?;
    let id = parse_id(parsed.expect_positionals(1)?[0])?;
    Ok(Intent::Delete { id })
}

fn parse_list(args: &[&str]) -> Result<Intent, String> {
    let parsed = ParsedArgs::parse(args, &[])?;
    parsed.expect_positionals(0)?;
    Ok(Intent::List)
}

fn parse_summary(args: &[&str]) -> Result<Intent, String> {
    let mut parsed = ParsedArgs::parse(args, &["month"])?;
    parsed.expect_positionals(0)?;
    let month = parsed
        .take("month")
        .map(|token| MonthFilter::parse(&token).map_err(|err| err.to_string()))
        .transpose()?;
    Ok(Intent::Summary { month })
}

fn parse_export(args: &[&str]) -> Result<Intent, String> {
    let parsed = ParsedArgs::parse(args, &[])?;
    let filename = parsed.expect_positionals(1)?[0];
    Ok(Intent::Export {
        filename: PathBuf::from(filename),
    })
}

fn parse_amount(raw: &str) -> Result<Amount, String> {
    Amount::parse_input(raw).map_err(|err| err.to_string())
}

fn parse_id(raw: &str) -> Result<u64, String> {
    raw.trim()
        .parse::<u64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| format!("invalid id `{}` (expected a positive number)", raw))
}

fn with_suggestion<'a>(
    message: String,
    input: &str,
    candidates: impl Iterator<Item = &'a str>,
) -> String {
    let needle = input.to_ascii_lowercase();
    let best = candidates
        .map(|name| (levenshtein(name, &needle), name))
        .min_by_key(|(distance, _)| *distance);
    match best {
        Some((distance, name)) if distance <= SUGGESTION_DISTANCE => {
            format!("{}. Did you mean `{}`?", message, name)
        }
        _ => message,
    }
}

/// Positional arguments plus `--name value` / `--name=value` options.
struct ParsedArgs<'a> {
    positionals: Vec<&'a str>,
    options: HashMap<&'static str, String>,
}

impl<'a> ParsedArgs<'a> {
    fn parse(args: &[&'a str], allowed: &[&'static str]) -> Result<Self, String> {
        let mut positionals = Vec::new();
        let mut options = HashMap::new();
        let mut iter = args.iter();

        while let Some(&arg) = iter.next() {
            let Some(flag) = arg.strip_prefix("--") else {
                positionals.push(arg);
                continue;
            };
            let (name, inline) = match flag.split_once('=') {
                Some((name, value)) => (name, Some(value.to_string())),
                None => (flag, None),
            };
            let Some(&known) = allowed.iter().find(|candidate| **candidate == name) else {
                return Err(format!("unknown option `--{}`", name));
            };
            let value = match inline {
                Some(value) => value,
                None => iter
                    .next()
                    .map(|value| value.to_string())
                    .ok_or_else(|| format!("option `--{}` requires a value", known))?,
            };
            if options.insert(known, value).is_some() {
                return Err(format!("option `--{}` given more than once", known));
            }
        }

        Ok(Self {
            positionals,
            options,
        })
    }

    fn expect_positionals(&self, count: usize) -> Result<&[&'a str], String> {
        if let Some(extra) = self.positionals.get(count) {
            return Err(format!("unexpected argument `{}`", extra));
        }
        if self.positionals.len() < count {
            return Err("missing required argument".into());
        }
        Ok(&self.positionals)
    }

    fn take(&mut self, name: &str) -> Option<String> {
        self.options.remove(name)
    }

    fn required(&mut self, name: &str) -> Result<String, String> {
        self.take(name)
            .ok_or_else(|| format!("missing required option `--{}`", name))
    }
}
