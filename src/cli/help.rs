use crate::cli::dispatcher::{Dispatcher, LEDGER_COMMAND, TOP_LEVEL};
use crate::cli::output;
use crate::cli::registry::CommandEntry;

pub fn print_overview(dispatcher: &Dispatcher) {
    output::section("Available commands");
    for (name, description, _) in TOP_LEVEL {
        output::info(format!("  {:<16} {}", name, description));
    }
    print_ledger_commands(dispatcher);
    output::info("Use `help <subcommand>` for details.");
}

pub fn print_ledger_commands(dispatcher: &Dispatcher) {
    output::section("Ledger subcommands");
    for entry in dispatcher.registry().list() {
        output::info(format!("  {:<16} {}", entry.name, entry.description));
    }
}

pub fn print_command(entry: &CommandEntry) {
    output::section(format!("Help: {} {}", LEDGER_COMMAND, entry.name));
    output::info(format!("  Description: {}", entry.description));
    output::info(format!("  Usage: {}", entry.usage));
}

/// Prints help for `topic`; returns `false` when the topic is unknown.
pub fn print_topic(dispatcher: &Dispatcher, topic: &str) -> bool {
    if topic == LEDGER_COMMAND {
        print_ledger_commands(dispatcher);
        return true;
    }
    if let Some(entry) = dispatcher.registry().get(topic) {
        print_command(entry);
        return true;
    }
    if let Some((name, description, usage)) = TOP_LEVEL.iter().find(|(name, _, _)| *name == topic)
    {
        output::section(format!("Help: {}", name));
        output::info(format!("  Description: {}", description));
        output::info(format!("  Usage: {}", usage));
        return true;
    }
    false
}
