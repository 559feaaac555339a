//! CLI module for sqlemu
//!
//! Provides:
//! - Process arguments and configuration
//! - The session holding registry, current database and case file path
//! - The shell command table
//! - Interactive and script front ends

mod args;
mod commands;
mod config;
mod errors;
mod session;
mod shell;

pub use args::{Cli, Command, DEFAULT_CONFIG_PATH};
pub use commands::{run, run_command, ArgMode, Arity, CommandSpec, CommandTable, Handler, Outcome};
pub use config::Config;
pub use errors::{CliError, CliErrorCode, CliResult};
pub use session::{parse_create_table, CreateTable, Session};
pub use shell::{run_interactive, run_script, run_script_file};
