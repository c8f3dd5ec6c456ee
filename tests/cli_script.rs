use assert_cmd::Command;
use assert_fs::{prelude::*, TempDir};
use predicates::prelude::*;
use predicates::str::contains;

fn shell(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("expense_ledger").unwrap();
    cmd.env("EXPENSE_LEDGER_CLI_SCRIPT", "1")
        .env("EXPENSE_LEDGER_HOME", home.path())
        .env_remove("EXPENSE_LEDGER_FILE")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn script_mode_runs_basic_flow() {
    let home = TempDir::new().unwrap();
    let ledger = home.child("expenses.csv");
    let input = "ledger add --description coffee --amount 3\n\
                 ledger add --description=book --amount=20\n\
                 ledger list\n\
                 ledger summary\n\
                 ledger delete 1\n\
                 ledger summary\n\
                 end\n\
                 ledger list\n";

    shell(&home)
        .arg(ledger.path())
        .write_stdin(input)
        .assert()
        .success()
        .stdout(contains("Expense added successfully (ID: 1)"))
        .stdout(contains("Expense added successfully (ID: 2)"))
        .stdout(contains("coffee"))
        .stdout(contains("Total expenses: 23$"))
        .stdout(contains("Expense deleted successfully (ID: 1)"))
        .stdout(contains("Total expenses: 20$"))
        .stdout(contains("End of program").count(1));

    ledger.assert(predicate::str::starts_with("id,date,description,amount\n"));
    ledger.assert(contains(",book,$20\n"));
}

#[test]
fn errors_do_not_end_the_session() {
    let home = TempDir::new().unwrap();
    let ledger = home.child("expenses.csv");
    let input = "ledger delete 5\n\
                 ledger add --description coffee --amount -3\n\
                 ledgr list\n\
                 ledger update 1 --description tea --amount 2\n\
                 ledger add --description coffee --amount 3\n";

    shell(&home)
        .arg(ledger.path())
        .write_stdin(input)
        .assert()
        .success()
        .stdout(contains("Expense not found (ID: 5)"))
        .stdout(contains("Number should not be negative"))
        .stdout(contains("No such command `ledgr`. Did you mean `ledger`?"))
        .stdout(contains("Expense not found (ID: 1)"))
        .stdout(contains("Expense added successfully (ID: 1)"))
        .stdout(contains("End of program"));
}

#[test]
fn export_refuses_existing_file() {
    let home = TempDir::new().unwrap();
    let ledger = home.child("expenses.csv");
    let existing = home.child("taken.csv");
    existing.write_str("keep\n").unwrap();
    let fresh = home.child("fresh.csv");
    let input = format!(
        "ledger add --description coffee --amount 3.50\n\
         ledger export {}\n\
         ledger export {}\n\
         ledger summary --month 0\n",
        existing.path().display(),
        fresh.path().display()
    );

    shell(&home)
        .arg(ledger.path())
        .write_stdin(input)
        .assert()
        .success()
        .stdout(contains("File already exists"))
        .stdout(contains("Data exported successfully"))
        .stdout(contains("invalid month `0`"));

    existing.assert("keep\n");
    fresh.assert(contains(",coffee,$3.50\n"));
}

#[test]
fn ledger_file_comes_from_config_when_no_argument() {
    let home = TempDir::new().unwrap();
    let configured = home.child("configured.csv");
    home.child("config.json")
        .write_str(&format!(
            "{{\"ledger_file\": {:?}, \"color\": false}}",
            configured.path().display().to_string()
        ))
        .unwrap();

    shell(&home)
        .write_stdin("ledger add --description coffee --amount 3\n")
        .assert()
        .success()
        .stdout(contains("Expense added successfully (ID: 1)"));

    configured.assert(contains(",coffee,$3\n"));
}

#[test]
fn unusable_ledger_path_is_fatal() {
    let home = TempDir::new().unwrap();

    shell(&home)
        .arg(home.path())
        .write_stdin("ledger list\n")
        .assert()
        .failure()
        .code(1)
        .stderr(contains("Error:"));
}
