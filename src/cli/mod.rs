pub mod core;
pub mod dispatcher;
pub mod help;
pub mod output;
pub mod registry;
mod shell;
pub mod table;

pub use shell::run_cli;
