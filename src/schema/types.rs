//! Column type definitions and the type mapper
//!
//! User-facing type names are case-insensitive. A fixed alias table
//! redirects engine shorthands before resolving against the canonical
//! SQL type set:
//! - INT, INT32 -> INTEGER
//! - INT16 -> SMALLINT
//! - INT64 -> BIGINT
//! - STRING -> VARCHAR

use std::fmt;
use std::str::FromStr;

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use super::errors::{SchemaError, SchemaResult};

/// Shorthand aliases accepted on top of the canonical names
const TYPE_ALIASES: &[(&str, &str)] = &[
    ("INT", "INTEGER"),
    ("INT32", "INTEGER"),
    ("INT16", "SMALLINT"),
    ("INT64", "BIGINT"),
    ("STRING", "VARCHAR"),
];

/// Canonical SQL types, named and numbered after the JDBC type set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SqlType {
    Bit,
    TinyInt,
    SmallInt,
    Integer,
    BigInt,
    Float,
    Real,
    Double,
    Numeric,
    Decimal,
    Char,
    Varchar,
    LongVarchar,
    Date,
    Time,
    Timestamp,
    Binary,
    VarBinary,
    LongVarBinary,
    Null,
    Other,
    JavaObject,
    Distinct,
    Struct,
    Array,
    Blob,
    Clob,
    Ref,
    DataLink,
    Boolean,
    RowId,
    NChar,
    NVarchar,
    LongNVarchar,
    NClob,
    SqlXml,
    RefCursor,
    TimeWithTimezone,
    TimestampWithTimezone,
}

impl SqlType {
    /// Every canonical type, in vendor code declaration order
    pub const ALL: [SqlType; 39] = [
        SqlType::Bit,
        SqlType::TinyInt,
        SqlType::SmallInt,
        SqlType::Integer,
        SqlType::BigInt,
        SqlType::Float,
        SqlType::Real,
        SqlType::Double,
        SqlType::Numeric,
        SqlType::Decimal,
        SqlType::Char,
        SqlType::Varchar,
        SqlType::LongVarchar,
        SqlType::Date,
        SqlType::Time,
        SqlType::Timestamp,
        SqlType::Binary,
        SqlType::VarBinary,
        SqlType::LongVarBinary,
        SqlType::Null,
        SqlType::Other,
        SqlType::JavaObject,
        SqlType::Distinct,
        SqlType::Struct,
        SqlType::Array,
        SqlType::Blob,
        SqlType::Clob,
        SqlType::Ref,
        SqlType::DataLink,
        SqlType::Boolean,
        SqlType::RowId,
        SqlType::NChar,
        SqlType::NVarchar,
        SqlType::LongNVarchar,
        SqlType::NClob,
        SqlType::SqlXml,
        SqlType::RefCursor,
        SqlType::TimeWithTimezone,
        SqlType::TimestampWithTimezone,
    ];

    /// Returns the canonical upper-case name
    pub fn canonical_name(&self) -> &'static str {
        match self {
            SqlType::Bit => "BIT",
            SqlType::TinyInt => "TINYINT",
            SqlType::SmallInt => "SMALLINT",
            SqlType::Integer => "INTEGER",
            SqlType::BigInt => "BIGINT",
            SqlType::Float => "FLOAT",
            SqlType::Real => "REAL",
            SqlType::Double => "DOUBLE",
            SqlType::Numeric => "NUMERIC",
            SqlType::Decimal => "DECIMAL",
            SqlType::Char => "CHAR",
            SqlType::Varchar => "VARCHAR",
            SqlType::LongVarchar => "LONGVARCHAR",
            SqlType::Date => "DATE",
            SqlType::Time => "TIME",
            SqlType::Timestamp => "TIMESTAMP",
            SqlType::Binary => "BINARY",
            SqlType::VarBinary => "VARBINARY",
            SqlType::LongVarBinary => "LONGVARBINARY",
            SqlType::Null => "NULL",
            SqlType::Other => "OTHER",
            SqlType::JavaObject => "JAVA_OBJECT",
            SqlType::Distinct => "DISTINCT",
            SqlType::Struct => "STRUCT",
            SqlType::Array => "ARRAY",
            SqlType::Blob => "BLOB",
            SqlType::Clob => "CLOB",
            SqlType::Ref => "REF",
            SqlType::DataLink => "DATALINK",
            SqlType::Boolean => "BOOLEAN",
            SqlType::RowId => "ROWID",
            SqlType::NChar => "NCHAR",
            SqlType::NVarchar => "NVARCHAR",
            SqlType::LongNVarchar => "LONGNVARCHAR",
            SqlType::NClob => "NCLOB",
            SqlType::SqlXml => "SQLXML",
            SqlType::RefCursor => "REF_CURSOR",
            SqlType::TimeWithTimezone => "TIME_WITH_TIMEZONE",
            SqlType::TimestampWithTimezone => "TIMESTAMP_WITH_TIMEZONE",
        }
    }

    /// Returns the vendor type number handed to the validation engine
    pub fn vendor_code(&self) -> i32 {
        match self {
            SqlType::Bit => -7,
            SqlType::TinyInt => -6,
            SqlType::SmallInt => 5,
            SqlType::Integer => 4,
            SqlType::BigInt => -5,
            SqlType::Float => 6,
            SqlType::Real => 7,
            SqlType::Double => 8,
            SqlType::Numeric => 2,
            SqlType::Decimal => 3,
            SqlType::Char => 1,
            SqlType::Varchar => 12,
            SqlType::LongVarchar => -1,
            SqlType::Date => 91,
            SqlType::Time => 92,
            SqlType::Timestamp => 93,
            SqlType::Binary => -2,
            SqlType::VarBinary => -3,
            SqlType::LongVarBinary => -4,
            SqlType::Null => 0,
            SqlType::Other => 1111,
            SqlType::JavaObject => 2000,
            SqlType::Distinct => 2001,
            SqlType::Struct => 2002,
            SqlType::Array => 2003,
            SqlType::Blob => 2004,
            SqlType::Clob => 2005,
            SqlType::Ref => 2006,
            SqlType::DataLink => 70,
            SqlType::Boolean => 16,
            SqlType::RowId => -8,
            SqlType::NChar => -15,
            SqlType::NVarchar => -9,
            SqlType::LongNVarchar => -16,
            SqlType::NClob => 2011,
            SqlType::SqlXml => 2009,
            SqlType::RefCursor => 2012,
            SqlType::TimeWithTimezone => 2013,
            SqlType::TimestampWithTimezone => 2014,
        }
    }

    /// Returns the engine-facing name used when listing tables
    pub fn engine_name(&self) -> String {
        match self {
            SqlType::Boolean => "bool".to_string(),
            SqlType::SmallInt => "int16".to_string(),
            SqlType::Integer => "int32".to_string(),
            SqlType::BigInt => "int64".to_string(),
            SqlType::Varchar => "string".to_string(),
            other => other.canonical_name().to_lowercase(),
        }
    }
}

/// Resolves a user-facing type name to its canonical SQL type
pub fn resolve(type_name: &str) -> SchemaResult<SqlType> {
    let upper = type_name.trim().to_uppercase();
    let canonical = TYPE_ALIASES
        .iter()
        .find(|(alias, _)| *alias == upper)
        .map(|(_, target)| *target)
        .unwrap_or(upper.as_str());

    SqlType::ALL
        .iter()
        .copied()
        .find(|t| t.canonical_name() == canonical)
        .ok_or_else(|| SchemaError::UnknownType(type_name.to_string()))
}

impl FromStr for SqlType {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        resolve(s)
    }
}

impl fmt::Display for SqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.engine_name())
    }
}

impl Serialize for SqlType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.canonical_name())
    }
}

/// A single column definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    /// Column name
    pub name: String,
    /// Column type
    pub sql_type: SqlType,
}

/// Serialized as `{"name", "type", "type_code"}` for the validation engine
impl Serialize for Column {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Column", 3)?;
        state.serialize_field("name", &self.name)?;
        state.serialize_field("type", &self.sql_type)?;
        state.serialize_field("type_code", &self.sql_type.vendor_code())?;
        state.end()
    }
}

impl Column {
    pub fn new(name: impl Into<String>, sql_type: SqlType) -> Self {
        Self {
            name: name.into(),
            sql_type,
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.sql_type)
    }
}

/// Ordered column list of one table
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct TableSchema {
    columns: Vec<Column>,
}

impl TableSchema {
    pub fn new(columns: Vec<Column>) -> Self {
        Self { columns }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl fmt::Display for TableSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, column) in self.columns.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", column)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aliases_redirect() {
        assert_eq!(resolve("int").unwrap(), SqlType::Integer);
        assert_eq!(resolve("INT32").unwrap(), SqlType::Integer);
        assert_eq!(resolve("int16").unwrap(), SqlType::SmallInt);
        assert_eq!(resolve("Int64").unwrap(), SqlType::BigInt);
        assert_eq!(resolve("string").unwrap(), SqlType::Varchar);
    }

    #[test]
    fn test_canonical_names_resolve() {
        for t in SqlType::ALL {
            assert_eq!(resolve(t.canonical_name()).unwrap(), t);
        }
        assert_eq!(resolve("timestamp").unwrap(), SqlType::Timestamp);
        assert_eq!(resolve("BigInt").unwrap(), SqlType::BigInt);
    }

    #[test]
    fn test_unknown_type() {
        let err = resolve("uint8").unwrap_err();
        assert_eq!(err, SchemaError::UnknownType("uint8".into()));
    }

    #[test]
    fn test_vendor_codes() {
        assert_eq!(SqlType::Integer.vendor_code(), 4);
        assert_eq!(SqlType::Varchar.vendor_code(), 12);
        assert_eq!(SqlType::Timestamp.vendor_code(), 93);
        assert_eq!(SqlType::BigInt.vendor_code(), -5);
    }

    #[test]
    fn test_engine_names() {
        assert_eq!(SqlType::Integer.to_string(), "int32");
        assert_eq!(SqlType::Varchar.to_string(), "string");
        assert_eq!(SqlType::Timestamp.to_string(), "timestamp");
        assert_eq!(SqlType::Double.to_string(), "double");
    }

    #[test]
    fn test_table_schema_display() {
        let schema = TableSchema::new(vec![
            Column::new("a", SqlType::Integer),
            Column::new("b", SqlType::Timestamp),
        ]);
        assert_eq!(schema.to_string(), "a:int32,b:timestamp");
    }

    #[test]
    fn test_column_serializes_vendor_code() {
        let value = serde_json::to_value(Column::new("ts", SqlType::Timestamp)).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"name": "ts", "type": "TIMESTAMP", "type_code": 93})
        );
    }
}
