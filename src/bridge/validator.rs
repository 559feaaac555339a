//! SQL validation and DDL generation bridge
//!
//! The SQL engine itself is external. `ProcessBridge` talks to it through a
//! configured helper command using one JSON request on stdin and one JSON
//! response on stdout:
//!
//! ```text
//! -> {"op":"validate_batch","sql":"select ...","db":"emudb","schemas":{"emudb":{"t1":[{"name":"c1","type":"INTEGER","type_code":4}]}}}
//! <- {"status":"ok","data":[]}
//! <- {"status":"error","message":"..."}
//! ```
//!
//! For validation ops `data` holds diagnostics (empty = valid); for
//! `gen_ddl` it holds one CREATE TABLE statement per entry.

use std::io::{ErrorKind, Write};
use std::process::{Command, Stdio};

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::json;

use crate::observability::Logger;
use crate::schema::DatabaseTables;

use super::errors::{BridgeError, BridgeResult};

/// Engine message describing why a statement is invalid
pub type Diagnostic = String;

/// Registry contents as handed to the engine
pub type RegistrySnapshot<'a> = &'a IndexMap<String, DatabaseTables>;

/// Operations delegated to the external SQL engine
pub trait SqlBridge {
    /// Validates `sql` for offline (batch) execution
    fn validate_batch(
        &self,
        sql: &str,
        current_db: &str,
        schemas: RegistrySnapshot<'_>,
    ) -> BridgeResult<Vec<Diagnostic>>;

    /// Validates `sql` for online (request) execution
    fn validate_request(
        &self,
        sql: &str,
        current_db: &str,
        schemas: RegistrySnapshot<'_>,
    ) -> BridgeResult<Vec<Diagnostic>>;

    /// Generates the CREATE TABLE statements a deployment of `sql` needs
    fn generate_ddl(&self, sql: &str, schemas: RegistrySnapshot<'_>) -> BridgeResult<Vec<String>>;
}

#[derive(Debug, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
enum BridgeResponse {
    Ok {
        #[serde(default)]
        data: Vec<String>,
    },
    Error {
        message: String,
    },
}

/// Bridge backed by an external helper command
#[derive(Debug, Clone, Default)]
pub struct ProcessBridge {
    /// Program followed by its fixed arguments; empty when unconfigured
    argv: Vec<String>,
}

impl ProcessBridge {
    pub fn new(argv: Vec<String>) -> Self {
        Self { argv }
    }

    fn call(
        &self,
        op: &str,
        sql: &str,
        current_db: Option<&str>,
        schemas: RegistrySnapshot<'_>,
    ) -> BridgeResult<Vec<String>> {
        let (program, args) = self.argv.split_first().ok_or_else(|| {
            BridgeError::Unavailable(
                "no SQL validator configured, set `validator_command` in the config file".into(),
            )
        })?;

        let request = json!({
            "op": op,
            "sql": sql,
            "db": current_db,
            "schemas": schemas,
        });
        Logger::trace("BRIDGE_REQUEST", &[("op", op), ("program", program.as_str())]);

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| BridgeError::process(program.as_str(), e))?;

        if let Some(mut stdin) = child.stdin.take() {
            // A helper that exits without reading is judged by its exit status
            if let Err(e) = writeln!(stdin, "{}", request) {
                if e.kind() != ErrorKind::BrokenPipe {
                    return Err(BridgeError::process(program.as_str(), e));
                }
            }
        }

        let output = child
            .wait_with_output()
            .map_err(|e| BridgeError::process(program.as_str(), e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Logger::warn(
                "BRIDGE_EXIT_NONZERO",
                &[("program", program.as_str()), ("stderr", stderr.trim())],
            );
            return Err(BridgeError::NonZeroExit {
                program: program.clone(),
                code: output.status.code().unwrap_or(-1),
            });
        }

        let response: BridgeResponse = serde_json::from_slice(&output.stdout).map_err(|e| {
            BridgeError::process(program.as_str(), format!("invalid response: {}", e))
        })?;

        match response {
            BridgeResponse::Ok { data } => Ok(data),
            BridgeResponse::Error { message } => Err(BridgeError::process(program.as_str(), message)),
        }
    }
}

impl SqlBridge for ProcessBridge {
    fn validate_batch(
        &self,
        sql: &str,
        current_db: &str,
        schemas: RegistrySnapshot<'_>,
    ) -> BridgeResult<Vec<Diagnostic>> {
        self.call("validate_batch", sql, Some(current_db), schemas)
    }

    fn validate_request(
        &self,
        sql: &str,
        current_db: &str,
        schemas: RegistrySnapshot<'_>,
    ) -> BridgeResult<Vec<Diagnostic>> {
        self.call("validate_request", sql, Some(current_db), schemas)
    }

    fn generate_ddl(&self, sql: &str, schemas: RegistrySnapshot<'_>) -> BridgeResult<Vec<String>> {
        self.call("gen_ddl", sql, None, schemas)
    }
}
