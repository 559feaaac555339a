//! Case-file subsystem
//!
//! Reads and rewrites the single-case YAML documents consumed by the
//! reference engine, and feeds their input tables into the schema registry.

mod document;
mod errors;
mod manager;

pub use document::{CaseDocument, CaseSpec, ExtraKeys, TableDescriptor};
pub use errors::{CaseError, CaseResult};
pub use manager::{CaseFileManager, LoadedTable, CASE_TEMPLATE, DEFAULT_INDEX_NAME};
