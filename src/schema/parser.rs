//! Column spec parser
//!
//! A column spec is a comma-separated list of `<name> <type>` pairs, e.g.
//! `"a int, b timestamp"`. An empty spec is still one (empty) segment and
//! therefore invalid.

use super::errors::{SchemaError, SchemaResult};
use super::types::{resolve, Column};

/// Parses a column spec into typed columns, preserving segment order.
pub fn parse_columns(spec: &str) -> SchemaResult<Vec<Column>> {
    spec.split(',').map(parse_segment).collect()
}

fn parse_segment(segment: &str) -> SchemaResult<Column> {
    let tokens: Vec<&str> = segment.split_whitespace().collect();
    match tokens.as_slice() {
        [name, type_name] => Ok(Column::new(*name, resolve(type_name)?)),
        _ => Err(SchemaError::InvalidColumnSpec(segment.to_string())),
    }
}
