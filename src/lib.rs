//! sqlemu - an interactive shell for prototyping SQL table schemas
//!
//! Builds table schemas in memory, hands them to an external SQL engine for
//! validation and DDL generation, and prepares YAML cases for the reference
//! engine.

pub mod bridge;
pub mod case;
pub mod cli;
pub mod observability;
pub mod schema;
