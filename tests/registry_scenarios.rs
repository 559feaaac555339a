//! Registry Scenario Tests
//!
//! Drives the schema registry through the shell command table:
//! - Listing order follows insertion
//! - Failed definitions leave no trace
//! - Redefinition replaces, repeating a definition is a no-op

use std::path::Path;

use sqlemu::bridge::{EngineRunner, ProcessBridge};
use sqlemu::cli::{CliErrorCode, CommandTable, Outcome, Session};
use sqlemu::schema::SqlType;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_session() -> Session {
    Session::new(
        "emudb",
        Path::new("/tmp/sqlemu-registry-scenarios.yaml"),
        Box::new(ProcessBridge::default()),
        Box::new(EngineRunner::new("/nonexistent/toydb_run_engine")),
    )
}

fn exec(table: &CommandTable, session: &mut Session, line: &str) -> String {
    match table.execute(session, line).unwrap() {
        Outcome::Reply(text) => text,
        Outcome::Exit => panic!("unexpected exit on '{}'", line),
    }
}

// =============================================================================
// Listing Tests
// =============================================================================

/// Databases and tables list in the order they were first created.
#[test]
fn test_showtables_lists_in_creation_order() {
    let table = CommandTable::standard();
    let mut s = setup_session();

    exec(&table, &mut s, "adddbtable d1 t1 c1 int");
    exec(&table, &mut s, "adddbtable d1 t2 c1 int");
    exec(&table, &mut s, "adddbtable d2 t1 c1 int");

    assert_eq!(
        exec(&table, &mut s, "showtables"),
        "emudb={},d1={t1=c1:int32, t2=c1:int32},d2={t1=c1:int32}"
    );
}

/// Aliases resolve to the canonical types.
#[test]
fn test_type_aliases_resolve() {
    let table = CommandTable::standard();
    let mut s = setup_session();

    exec(
        &table,
        &mut s,
        "addtable t1 a smallint, b integer, c bigint, d varchar, e boolean, f timestamp",
    );

    let schema = s.registry().get("emudb", "t1").unwrap();
    let types: Vec<SqlType> = schema.columns().iter().map(|c| c.sql_type).collect();
    assert_eq!(
        types,
        vec![
            SqlType::SmallInt,
            SqlType::Integer,
            SqlType::BigInt,
            SqlType::Varchar,
            SqlType::Boolean,
            SqlType::Timestamp,
        ]
    );
    assert_eq!(
        schema.to_string(),
        "a:int16,b:int32,c:int64,d:string,e:bool,f:timestamp"
    );
}

// =============================================================================
// Failure Tests
// =============================================================================

/// An empty or one-token segment is rejected and nothing is registered.
#[test]
fn test_malformed_spec_registers_nothing() {
    let table = CommandTable::standard();
    let mut s = setup_session();

    let err = table.execute(&mut s, "adddbtable d9 t1 a int,,b int").unwrap_err();
    assert_eq!(err.code(), &CliErrorCode::InvalidColumnSpec);

    let err = table.execute(&mut s, "sql create table d9.t1 ()").unwrap_err();
    assert_eq!(err.code(), &CliErrorCode::InvalidColumnSpec);

    assert!(!s.registry().contains_database("d9"));
    assert_eq!(s.registry().show(), "emudb={}");
}

/// Unknown types fail with their own code.
#[test]
fn test_unknown_type_is_reported() {
    let table = CommandTable::standard();
    let mut s = setup_session();

    let err = table.execute(&mut s, "addtable t1 a uuid").unwrap_err();
    assert_eq!(err.code(), &CliErrorCode::UnknownType);
    assert!(err.to_string().starts_with("EMU_UNKNOWN_TYPE:"));
    assert!(s.registry().get("emudb", "t1").is_none());
}

// =============================================================================
// Redefinition Tests
// =============================================================================

/// Repeating the same definition leaves the registry unchanged.
#[test]
fn test_repeated_definition_is_idempotent() {
    let table = CommandTable::standard();
    let mut s = setup_session();

    exec(&table, &mut s, "addtable t1 a int, b string");
    let before = s.registry().show();
    exec(&table, &mut s, "addtable t1 a int, b string");
    assert_eq!(s.registry().show(), before);
    assert_eq!(s.registry().table_count(), 1);
}

/// Redefining a table replaces its columns but keeps its listing position.
#[test]
fn test_redefinition_keeps_position() {
    let table = CommandTable::standard();
    let mut s = setup_session();

    exec(&table, &mut s, "addtable t1 a int");
    exec(&table, &mut s, "addtable t2 a int");
    exec(&table, &mut s, "sql create table t1 (z bigint)");

    assert_eq!(
        exec(&table, &mut s, "showtables"),
        "emudb={t1=z:int64, t2=a:int32}"
    );
}

// =============================================================================
// Argument Tests
// =============================================================================

/// Empty database names are refused and the current db is kept.
#[test]
fn test_empty_database_name_is_rejected() {
    let table = CommandTable::standard();
    let mut s = setup_session();

    let err = table.execute(&mut s, "use \"\"").unwrap_err();
    assert_eq!(err.code(), &CliErrorCode::UnsupportedCommand);
    assert_eq!(s.current_db(), "emudb");
    assert_eq!(s.registry().show(), "emudb={}");
}

/// The column list is taken verbatim, so `#` does not cut it short.
#[test]
fn test_column_list_is_not_comment_split() {
    let table = CommandTable::standard();
    let mut s = setup_session();

    let err = table.execute(&mut s, "addtable t2 a int, #b").unwrap_err();
    assert_eq!(err.code(), &CliErrorCode::InvalidColumnSpec);
    assert!(err.message().contains("#b"));

    exec(&table, &mut s, "adddbtable d1 t1 'a int, b string'");
    assert_eq!(s.registry().show(), "emudb={},d1={t1=a:int32,b:string}");
}
