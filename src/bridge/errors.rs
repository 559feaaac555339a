//! Bridge error types
//!
//! Everything that goes wrong in or around an external collaborator maps to
//! EMU_EXTERNAL_PROCESS_FAILURE; the variant keeps what the user needs to see.

use thiserror::Error;

/// Result type for bridge calls
pub type BridgeResult<T> = Result<T, BridgeError>;

#[derive(Debug, Error)]
pub enum BridgeError {
    /// The engine reported diagnostics for the statement
    #[error("{mode} failed: {diagnostics:?}")]
    Diagnostics {
        mode: &'static str,
        diagnostics: Vec<String>,
    },

    /// The external process exited with a non-zero status
    #[error("{program} failed with exit code {code}")]
    NonZeroExit { program: String, code: i32 },

    /// The external program is not installed or configured
    #[error("{0}")]
    Unavailable(String),

    /// Spawning or talking to the external program failed
    #[error("{program}: {reason}")]
    Process { program: String, reason: String },
}

impl BridgeError {
    pub fn process(program: impl Into<String>, reason: impl ToString) -> Self {
        BridgeError::Process {
            program: program.into(),
            reason: reason.to_string(),
        }
    }

    /// Returns the stable error code string
    pub fn code(&self) -> &'static str {
        "EMU_EXTERNAL_PROCESS_FAILURE"
    }
}
