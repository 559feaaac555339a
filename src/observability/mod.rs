//! Observability subsystem
//!
//! Provides:
//! - Structured JSON logging to stderr
//! - Begin/complete scopes around blocking steps
//!
//! # Principles
//!
//! 1. Observability is read-only
//! 2. No side effects on command results
//! 3. No background threads
//!
//! # Usage
//!
//! ```ignore
//! use sqlemu::observability::{Logger, ObservationScope, Severity};
//!
//! Logger::set_min_severity(Severity::Info);
//! Logger::info("TABLE_ADDED", &[("db", "emudb"), ("table", "t1")]);
//!
//! let scope = ObservationScope::new("LOAD_CASE");
//! scope.complete();
//! ```

mod logger;
mod scope;

pub use logger::{Logger, Severity};
pub use scope::ObservationScope;
