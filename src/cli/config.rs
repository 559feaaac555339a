//! Shell configuration
//!
//! Loaded from a JSON file; every field has a default so an absent file at
//! the default location is equivalent to `{}`.
//!
//! ```json
//! {
//!   "default_db": "emudb",
//!   "case_path": "/tmp/emu-case.yaml",
//!   "engine_path": "/tmp/toydb_run_engine",
//!   "validator_command": ["openmldb-validate", "--json"],
//!   "history_file": "/home/me/.sqlemu_history",
//!   "log_level": "warn"
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::observability::Severity;

use super::args::DEFAULT_CONFIG_PATH;
use super::errors::{CliError, CliResult};

/// Configuration file structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Database that exists at start and is selected first
    #[serde(default = "default_db")]
    pub default_db: String,

    /// Initial case file path
    #[serde(default = "default_case_path")]
    pub case_path: PathBuf,

    /// Reference engine binary
    #[serde(default = "default_engine_path")]
    pub engine_path: PathBuf,

    /// Helper command (program + args) speaking the validation bridge protocol
    #[serde(default)]
    pub validator_command: Vec<String>,

    /// Line history file for the interactive shell
    #[serde(default)]
    pub history_file: Option<PathBuf>,

    /// Lowest log severity written to stderr
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_db() -> String {
    "emudb".to_string()
}
fn default_case_path() -> PathBuf {
    PathBuf::from("/tmp/emu-case.yaml")
}
fn default_engine_path() -> PathBuf {
    PathBuf::from("/tmp/toydb_run_engine")
}
fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_db: default_db(),
            case_path: default_case_path(),
            engine_path: default_engine_path(),
            validator_command: Vec::new(),
            history_file: None,
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        let config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Load `path`, or defaults if `path` is the default location and absent
    pub fn load_or_default(path: &Path) -> CliResult<Self> {
        if path == Path::new(DEFAULT_CONFIG_PATH) && !path.exists() {
            return Ok(Self::default());
        }
        Self::load(path)
    }

    fn validate(&self) -> CliResult<()> {
        if self.default_db.trim().is_empty() {
            return Err(CliError::config_error("default_db must not be empty"));
        }

        if self.case_path.as_os_str().is_empty() {
            return Err(CliError::config_error("case_path must not be empty"));
        }

        if self.validator_command.iter().any(|arg| arg.is_empty()) {
            return Err(CliError::config_error(
                "validator_command must not contain empty arguments",
            ));
        }

        self.severity()?;

        Ok(())
    }

    /// Parsed log level
    pub fn severity(&self) -> CliResult<Severity> {
        self.log_level
            .parse()
            .map_err(|e: String| CliError::config_error(format!("Invalid log_level: {}", e)))
    }
}
