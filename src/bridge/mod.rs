//! Bridges to the external collaborators
//!
//! - `SqlBridge`: SQL validation and DDL generation by the SQL engine
//! - `CaseRunner`: case execution by the reference binary
//!
//! Both are traits so the shell can run against fakes.

mod engine;
mod errors;
mod validator;

pub use engine::{CaseOutput, CaseRunner, EngineRunner};
pub use errors::{BridgeError, BridgeResult};
pub use validator::{Diagnostic, ProcessBridge, RegistrySnapshot, SqlBridge};
