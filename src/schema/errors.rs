//! Schema error types
//!
//! Error codes:
//! - EMU_INVALID_COLUMN_SPEC
//! - EMU_UNKNOWN_TYPE

use thiserror::Error;

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Errors raised while parsing column specs or resolving types
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// A comma-delimited segment is not exactly `<name> <type>`
    #[error("invalid column in schema: {0}")]
    InvalidColumnSpec(String),

    /// The type token does not resolve to a canonical SQL type
    #[error("unknown column type: {0}")]
    UnknownType(String),
}

impl SchemaError {
    /// Returns the stable error code string
    pub fn code(&self) -> &'static str {
        match self {
            SchemaError::InvalidColumnSpec(_) => "EMU_INVALID_COLUMN_SPEC",
            SchemaError::UnknownType(_) => "EMU_UNKNOWN_TYPE",
        }
    }
}
