pub mod commands;
pub mod context;
pub mod help;
pub mod io;
pub mod output;
pub mod registry;
pub mod shell;

pub use context::{CliMode, CommandError, CommandResult, ShellContext};
pub use shell::run_cli;
