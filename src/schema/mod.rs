//! Schema subsystem
//!
//! Holds the table definitions a shell session builds up:
//! - Type mapping from user-facing names to canonical SQL types
//! - Column spec parsing (`"a int, b timestamp"`)
//! - The database/table registry
//!
//! # Design Principles
//!
//! - Registry updates are all-or-nothing
//! - Listing order is insertion order
//! - No deletion, no ALTER

mod errors;
mod parser;
mod registry;
mod types;

pub use errors::{SchemaError, SchemaResult};
pub use parser::parse_columns;
pub use registry::{DatabaseTables, SchemaRegistry};
pub use types::{resolve, Column, SqlType, TableSchema};
