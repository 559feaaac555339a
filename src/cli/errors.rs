//! CLI-specific error types
//!
//! Every command failure ends that command and is shown to the user as
//! `CODE: message`. The shell keeps running; scripts stop.

use std::fmt;
use std::io;

use rustyline::error::ReadlineError;

use crate::bridge::BridgeError;
use crate::case::CaseError;
use crate::schema::SchemaError;

/// CLI error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Malformed column spec segment
    InvalidColumnSpec,
    /// Unrecognized column type
    UnknownType,
    /// Case document structure violation
    MalformedCaseFile,
    /// Case file copy/read/write failure
    IoFailure,
    /// External engine failed or reported diagnostics
    ExternalProcessFailure,
    /// Statement the `sql` shorthand cannot handle
    UnsupportedCommand,
    /// No such shell command
    UnknownCommand,
    /// Command called with the wrong number of arguments
    WrongArity,
    /// Configuration file error
    ConfigError,
    /// Terminal or script I/O error
    IoError,
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidColumnSpec => "EMU_INVALID_COLUMN_SPEC",
            Self::UnknownType => "EMU_UNKNOWN_TYPE",
            Self::MalformedCaseFile => "EMU_MALFORMED_CASE_FILE",
            Self::IoFailure => "EMU_IO_FAILURE",
            Self::ExternalProcessFailure => "EMU_EXTERNAL_PROCESS_FAILURE",
            Self::UnsupportedCommand => "EMU_UNSUPPORTED_COMMAND",
            Self::UnknownCommand => "EMU_UNKNOWN_COMMAND",
            Self::WrongArity => "EMU_WRONG_ARITY",
            Self::ConfigError => "EMU_CONFIG_ERROR",
            Self::IoError => "EMU_IO_ERROR",
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    /// Create a new CLI error
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Config error
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    /// I/O error
    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    /// Statement not handled by the `sql` shorthand
    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::UnsupportedCommand, msg)
    }

    /// Unknown command name
    pub fn unknown_command(name: &str) -> Self {
        Self::new(
            CliErrorCode::UnknownCommand,
            format!("unknown command '{}', type 'help' for the command list", name),
        )
    }

    /// Wrong argument count
    pub fn wrong_arity(command: &str, expected: impl fmt::Display, got: usize) -> Self {
        Self::new(
            CliErrorCode::WrongArity,
            format!("{} expects {} argument(s), got {}", command, expected, got),
        )
    }

    /// Get the error code
    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    /// Get the error code string
    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<SchemaError> for CliError {
    fn from(e: SchemaError) -> Self {
        let code = match e {
            SchemaError::InvalidColumnSpec(_) => CliErrorCode::InvalidColumnSpec,
            SchemaError::UnknownType(_) => CliErrorCode::UnknownType,
        };
        Self::new(code, e.to_string())
    }
}

impl From<CaseError> for CliError {
    fn from(e: CaseError) -> Self {
        match e {
            CaseError::Schema(inner) => inner.into(),
            CaseError::MalformedCaseFile { .. } => {
                Self::new(CliErrorCode::MalformedCaseFile, e.to_string())
            }
            CaseError::IoFailure { .. } => Self::new(CliErrorCode::IoFailure, e.to_string()),
        }
    }
}

impl From<BridgeError> for CliError {
    fn from(e: BridgeError) -> Self {
        Self::new(CliErrorCode::ExternalProcessFailure, e.to_string())
    }
}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<ReadlineError> for CliError {
    fn from(e: ReadlineError) -> Self {
        Self::io_error(format!("input error: {}", e))
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_display_has_code_prefix() {
        let err = CliError::unsupported("not support sql: drop table t1");
        assert_eq!(
            err.to_string(),
            "EMU_UNSUPPORTED_COMMAND: not support sql: drop table t1"
        );
    }

    #[test]
    fn test_schema_errors_keep_their_code() {
        let err: CliError = SchemaError::InvalidColumnSpec("".into()).into();
        assert_eq!(err.code(), &CliErrorCode::InvalidColumnSpec);
        assert!(err.message().contains("invalid column in schema"));

        let err: CliError = CaseError::Schema(SchemaError::UnknownType("x".into())).into();
        assert_eq!(err.code(), &CliErrorCode::UnknownType);
    }

    #[test]
    fn test_case_and_bridge_codes() {
        let err: CliError = CaseError::malformed(Path::new("c.yaml"), "missing `cases`").into();
        assert_eq!(err.code_str(), "EMU_MALFORMED_CASE_FILE");

        let err: CliError = BridgeError::Unavailable("no engine".into()).into();
        assert_eq!(err.code(), &CliErrorCode::ExternalProcessFailure);
        assert_eq!(err.message(), "no engine");
    }
}
