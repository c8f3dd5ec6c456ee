use std::{
    borrow::Cow,
    io::{self, BufRead},
    path::PathBuf,
};

use rustyline::{
    completion::{Completer, Pair},
    error::ReadlineError,
    highlight::Highlighter,
    hint::Hinter,
    history::DefaultHistory,
    validate::{ValidationContext, ValidationResult, Validator},
    Context as ReadlineContext, Editor, Helper,
};

use crate::cli::core::{CliError, CliMode, LoopControl, ShellContext};
use crate::cli::dispatcher::{LEDGER_COMMAND, TOP_LEVEL};
use crate::cli::output::{self, OutputPreferences};
use crate::config::ConfigManager;
use crate::utils::paths::SCRIPT_ENV;

const PROMPT: &str = ">> ";

/// Runs the shell until `end`, interrupt, or end of input.
///
/// `ledger_file` overrides the configured ledger location.
pub fn run_cli(ledger_file: Option<PathBuf>) -> Result<(), CliError> {
    let mode = if std::env::var_os(SCRIPT_ENV).is_some() {
        CliMode::Script
    } else {
        CliMode::Interactive
    };

    let config = ConfigManager::new().load()?;
    let color = config.color && mode == CliMode::Interactive;
    output::set_preferences(OutputPreferences { color });
    if !color {
        colored::control::set_override(false);
    }

    let mut context = ShellContext::from_config(mode, &config, ledger_file);
    context.start()?;

    match mode {
        CliMode::Interactive => run_interactive(&mut context),
        CliMode::Script => run_script(&mut context),
    }
}

fn run_interactive(context: &mut ShellContext) -> Result<(), CliError> {
    let mut editor = Editor::<CommandHelper, DefaultHistory>::new()?;
    let helper = CommandHelper::new(context.dispatcher.registry().names().collect());
    editor.set_helper(Some(helper));

    while context.running {
        match editor.readline(PROMPT) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                editor.add_history_entry(trimmed).ok();
                if context.process_line(trimmed) == LoopControl::Exit {
                    break;
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                context.end_session();
            }
            Err(err) => return Err(err.into()),
        }
    }

    Ok(())
}

fn run_script(context: &mut ShellContext) -> Result<(), CliError> {
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        if context.process_line(&line) == LoopControl::Exit {
            break;
        }
    }
    context.end_session();
    Ok(())
}

/// Completes top-level commands, and `ledger` subcommands after `ledger `.
struct CommandHelper {
    commands: Vec<String>,
    subcommands: Vec<String>,
}

impl CommandHelper {
    fn new(subcommands: Vec<&'static str>) -> Self {
        let mut commands: Vec<String> = TOP_LEVEL
            .iter()
            .map(|(name, _, _)| name.to_string())
            .collect();
        commands.sort();
        let mut subcommands: Vec<String> = subcommands.into_iter().map(String::from).collect();
        subcommands.sort();
        Self {
            commands,
            subcommands,
        }
    }

    fn candidates(&self, words: &[&str]) -> Option<&[String]> {
        match words {
            [] => Some(self.commands.as_slice()),
            [first] if first.eq_ignore_ascii_case(LEDGER_COMMAND) => {
                Some(self.subcommands.as_slice())
            }
            _ => None,
        }
    }
}

impl Helper for CommandHelper {}

impl Completer for CommandHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &ReadlineContext<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let prefix = &line[..pos];
        let start = prefix
            .rfind(char::is_whitespace)
            .map(|idx| idx + 1)
            .unwrap_or(0);
        let preceding: Vec<&str> = prefix[..start].split_whitespace().collect();

        let Some(names) = self.candidates(&preceding) else {
            return Ok((start, Vec::new()));
        };

        let needle = prefix[start..].to_ascii_lowercase();
        let candidates = names
            .iter()
            .filter(|name| name.starts_with(&needle))
            .map(|name| Pair {
                display: name.clone(),
                replacement: name.clone(),
            })
            .collect();
        Ok((start, candidates))
    }
}

impl Hinter for CommandHelper {
    type Hint = String;
}

impl Highlighter for CommandHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        Cow::Borrowed(line)
    }
}

impl Validator for CommandHelper {
    fn validate(&self, _ctx: &mut ValidationContext) -> rustyline::Result<ValidationResult> {
        Ok(ValidationResult::Valid(None))
    }
}
