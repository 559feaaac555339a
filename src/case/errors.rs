//! Case-file error types
//!
//! Error codes:
//! - EMU_MALFORMED_CASE_FILE
//! - EMU_IO_FAILURE
//! - schema codes, for column specs rejected while loading

use std::path::Path;

use thiserror::Error;

use crate::schema::SchemaError;

/// Result type for case-file operations
pub type CaseResult<T> = Result<T, CaseError>;

/// Errors raised while reading, writing or loading case documents
#[derive(Debug, Error)]
pub enum CaseError {
    /// The document violates the one-case structure
    #[error("malformed case file {path}: {reason}")]
    MalformedCaseFile { path: String, reason: String },

    /// Reading, writing or copying a case file failed
    #[error("case file I/O on {path} failed: {reason}")]
    IoFailure { path: String, reason: String },

    /// A table descriptor's columns were rejected
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

impl CaseError {
    pub fn malformed(path: &Path, reason: impl Into<String>) -> Self {
        CaseError::MalformedCaseFile {
            path: path.display().to_string(),
            reason: reason.into(),
        }
    }

    pub fn io(path: &Path, reason: impl ToString) -> Self {
        CaseError::IoFailure {
            path: path.display().to_string(),
            reason: reason.to_string(),
        }
    }

    /// Returns the stable error code string
    pub fn code(&self) -> &'static str {
        match self {
            CaseError::MalformedCaseFile { .. } => "EMU_MALFORMED_CASE_FILE",
            CaseError::IoFailure { .. } => "EMU_IO_FAILURE",
            CaseError::Schema(e) => e.code(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        let path = Path::new("/tmp/case.yaml");
        assert_eq!(
            CaseError::malformed(path, "no cases").code(),
            "EMU_MALFORMED_CASE_FILE"
        );
        assert_eq!(CaseError::io(path, "denied").code(), "EMU_IO_FAILURE");
        assert_eq!(
            CaseError::from(SchemaError::UnknownType("x".into())).code(),
            "EMU_UNKNOWN_TYPE"
        );
    }

    #[test]
    fn test_message_names_path() {
        let err = CaseError::malformed(Path::new("/tmp/case.yaml"), "expected exactly one case");
        assert_eq!(
            err.to_string(),
            "malformed case file /tmp/case.yaml: expected exactly one case"
        );
    }
}
