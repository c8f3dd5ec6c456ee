use std::{env, path::PathBuf};

use expense_ledger::{cli::run_cli, init};

fn main() {
    init();

    let ledger_file = env::args_os().nth(1).map(PathBuf::from);
    if let Err(err) = run_cli(ledger_file) {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}
