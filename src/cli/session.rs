//! Shell session state and command semantics
//!
//! A `Session` owns everything a command may read or change: the schema
//! registry, the current database, the case file manager, and the bridges to
//! the external engine. Each method implements one shell command and
//! returns the text to show the user.

use std::path::Path;

use regex::Regex;

use crate::bridge::{BridgeError, CaseRunner, EngineRunner, ProcessBridge, SqlBridge};
use crate::case::CaseFileManager;
use crate::observability::Logger;
use crate::schema::SchemaRegistry;

use super::config::Config;
use super::errors::{CliError, CliErrorCode, CliResult};

const CREATE_TABLE_PATTERN: &str = r"(?is)^\s*create\s+table\s+([^(]*)\((.*)\)\s*;?\s*$";

/// Target and columns of a `CREATE TABLE` shorthand
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTable {
    pub db: Option<String>,
    pub table: String,
    pub columns: String,
}

/// Parses `CREATE TABLE [db.]name (<columns>)`.
///
/// The name ends at the first `(`; the column list ends at the last `)`.
pub fn parse_create_table(sql: &str) -> CliResult<CreateTable> {
    let sql = sql.trim();
    let lowered = sql.to_lowercase();
    if !lowered.starts_with("create table ") {
        return Err(CliError::unsupported(format!("not support sql: {}", sql)));
    }

    let pattern = Regex::new(CREATE_TABLE_PATTERN)
        .map_err(|e| CliError::unsupported(format!("create table pattern: {}", e)))?;
    let caps = pattern.captures(sql).ok_or_else(|| {
        CliError::unsupported(format!(
            "invalid schema in: {}, should be `create table <name> (<columns>)`",
            sql
        ))
    })?;

    let name = caps.get(1).map_or("", |m| m.as_str()).trim();
    let columns = caps.get(2).map_or("", |m| m.as_str()).trim().to_string();
    if name.is_empty() || name.contains(char::is_whitespace) {
        return Err(CliError::unsupported(format!("invalid table name: '{}'", name)));
    }

    let (db, table) = match name.split_once('.') {
        Some((db, table)) if !db.is_empty() && !table.is_empty() => {
            (Some(db.to_string()), table.to_string())
        }
        Some(_) => {
            return Err(CliError::unsupported(format!("invalid table name: '{}'", name)));
        }
        None => (None, name.to_string()),
    };

    Ok(CreateTable { db, table, columns })
}

fn require_name(kind: &str, name: &str) -> CliResult<()> {
    if name.trim().is_empty() {
        return Err(CliError::unsupported(format!("{} name must not be empty", kind)));
    }
    Ok(())
}

/// One interactive shell session
pub struct Session {
    registry: SchemaRegistry,
    current_db: String,
    cases: CaseFileManager,
    bridge: Box<dyn SqlBridge>,
    runner: Box<dyn CaseRunner>,
}

impl Session {
    /// Session wired to the configured external programs
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            &config.default_db,
            &config.case_path,
            Box::new(ProcessBridge::new(config.validator_command.clone())),
            Box::new(EngineRunner::new(&config.engine_path)),
        )
    }

    pub fn new(
        default_db: &str,
        case_path: &Path,
        bridge: Box<dyn SqlBridge>,
        runner: Box<dyn CaseRunner>,
    ) -> Self {
        Self {
            registry: SchemaRegistry::new(default_db),
            current_db: default_db.to_string(),
            cases: CaseFileManager::new(case_path),
            bridge,
            runner,
        }
    }

    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    pub fn current_db(&self) -> &str {
        &self.current_db
    }

    /// Current case file path
    pub fn case_path(&self) -> &Path {
        self.cases.path()
    }

    /// Prompt text, naming the current database
    pub fn prompt(&self) -> String {
        format!("{}> ", self.current_db)
    }

    pub fn hello(&self) -> String {
        "Hello, World!".to_string()
    }

    /// Selects `db`, creating it if needed
    pub fn use_database(&mut self, db: &str) -> CliResult<String> {
        require_name("database", db)?;
        let created = if self.registry.contains_database(db) { "false" } else { "true" };
        self.registry.create_database(db);
        self.current_db = db.to_string();
        Logger::info("USE_DATABASE", &[("created", created), ("db", db)]);
        Ok(String::new())
    }

    /// Adds a table to the current database
    pub fn add_table(&mut self, table: &str, spec: &str) -> CliResult<String> {
        let db = self.current_db.clone();
        self.add_db_table(&db, table, spec)
    }

    /// Adds a table to `db`, creating the database if needed
    pub fn add_db_table(&mut self, db: &str, table: &str, spec: &str) -> CliResult<String> {
        require_name("database", db)?;
        require_name("table", table)?;
        Logger::info("ADD_TABLE", &[("db", db), ("schema", spec), ("table", table)]);
        self.registry.add_table(db, table, spec)?;
        Logger::trace(
            "REGISTRY",
            &[
                ("count", self.registry.table_count().to_string().as_str()),
                ("tables", self.registry.show().as_str()),
            ],
        );
        Ok(String::new())
    }

    /// `CREATE TABLE` shorthand for `addtable`/`adddbtable`
    pub fn create_table(&mut self, sql: &str) -> CliResult<String> {
        let create = parse_create_table(sql)?;
        match create.db {
            Some(db) => self.add_db_table(&db, &create.table, &create.columns),
            None => self.add_table(&create.table, &create.columns),
        }
    }

    pub fn show_tables(&self) -> CliResult<String> {
        Ok(self.registry.show())
    }

    pub fn validate_batch(&self, sql: &str) -> CliResult<String> {
        let diagnostics =
            self.bridge
                .validate_batch(sql, &self.current_db, self.registry.snapshot())?;
        if !diagnostics.is_empty() {
            return Err(BridgeError::Diagnostics {
                mode: "validate batch",
                diagnostics,
            }
            .into());
        }
        Ok("validate batch success".to_string())
    }

    pub fn validate_request(&self, sql: &str) -> CliResult<String> {
        let diagnostics =
            self.bridge
                .validate_request(sql, &self.current_db, self.registry.snapshot())?;
        if !diagnostics.is_empty() {
            return Err(BridgeError::Diagnostics {
                mode: "validate request",
                diagnostics,
            }
            .into());
        }
        Ok("validate request success".to_string())
    }

    /// CREATE TABLE statements needed to deploy `sql`
    pub fn generate_ddl(&self, sql: &str) -> CliResult<String> {
        Logger::info("GEN_DDL", &[("sql", sql)]);
        let ddl = self.bridge.generate_ddl(sql, self.registry.snapshot())?;
        Ok(ddl.join("\n"))
    }

    /// Runs a case file (or the current one) through the reference engine.
    ///
    /// Engine output is returned as-is; on a non-zero exit it is carried in
    /// the error message instead.
    pub fn run_case(&self, path: Option<&Path>) -> CliResult<String> {
        let path = match path {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => self.cases.path(),
        };

        let output = self.runner.execute_case_file(path)?;
        let mut echoed = output.stdout.clone();
        echoed.push_str(&output.stderr);
        let echoed = echoed.trim_end().to_string();

        if !output.success() {
            let mut message = format!(
                "run case {} failed with exit code {}",
                path.display(),
                output.exit_code
            );
            if !echoed.is_empty() {
                message.push('\n');
                message.push_str(&echoed);
            }
            return Err(CliError::new(CliErrorCode::ExternalProcessFailure, message));
        }
        Ok(echoed)
    }

    /// Writes the case template and makes it the current case file
    pub fn generate_case(&mut self, output: Option<&Path>) -> CliResult<String> {
        let written = self.cases.generate_template(output)?;
        Ok(format!(
            "copy case template to {}, and set it to yaml cache path",
            written.display()
        ))
    }

    /// Registers a case file's input tables and makes it the current case file
    pub fn load_case(&mut self, input: Option<&Path>) -> CliResult<String> {
        let fallback = self.current_db.clone();
        let loaded = self.cases.load(input, &mut self.registry, &fallback)?;

        let mut reply = format!(
            "load case from {}, and set it to yaml cache path",
            self.cases.path().display()
        );
        for table in &loaded {
            reply.push_str(&format!("\n  {}.{}", table.db, table.name));
        }
        Ok(reply)
    }

    /// Stores `sql` into the current case file
    pub fn dump_case(&mut self, sql: &str) -> CliResult<String> {
        let path = self.cases.dump(sql)?;
        Ok(format!("dump sql to {}", path.display()))
    }
}
