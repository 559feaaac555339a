//! CLI argument definitions using clap
//!
//! Commands:
//! - sqlemu [--config <path>] [shell]
//! - sqlemu [--config <path>] script <file>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Default config file location
pub const DEFAULT_CONFIG_PATH: &str = "./sqlemu.json";

/// sqlemu - prototype SQL table schemas and engine cases interactively
#[derive(Parser, Debug)]
#[command(name = "sqlemu")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Start the interactive shell (default)
    Shell,

    /// Run shell commands from a file, stopping at the first failure
    Script {
        /// Script file, one command per line, `#` starts a comment line
        path: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }

    /// The command to run, defaulting to the interactive shell
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Shell)
    }
}
