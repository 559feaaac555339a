//! In-memory schema registry
//!
//! Maps database name -> table name -> column list. Databases and tables
//! keep insertion order so listings are deterministic. Nothing is ever
//! deleted; redefining a table replaces its columns wholesale.

use indexmap::IndexMap;

use super::errors::SchemaResult;
use super::parser::parse_columns;
use super::types::TableSchema;

/// Tables of one database, in insertion order
pub type DatabaseTables = IndexMap<String, TableSchema>;

/// Registry of every database and table defined during a session.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    databases: IndexMap<String, DatabaseTables>,
}

impl SchemaRegistry {
    /// Creates a registry holding one empty default database.
    pub fn new(default_db: &str) -> Self {
        let mut registry = Self::default();
        registry.create_database(default_db);
        registry
    }

    /// Creates `db` if it does not exist yet. Existing tables are kept.
    pub fn create_database(&mut self, db: &str) {
        self.databases.entry(db.to_string()).or_default();
    }

    /// Parses `spec` and stores it as the schema of `db.table`.
    ///
    /// The registry is only touched once the column list parsed cleanly.
    pub fn add_table(&mut self, db: &str, table: &str, spec: &str) -> SchemaResult<()> {
        let columns = parse_columns(spec)?;
        self.put_table(db, table, TableSchema::new(columns));
        Ok(())
    }

    /// Stores an already parsed schema, replacing any previous definition.
    pub fn put_table(&mut self, db: &str, table: &str, schema: TableSchema) {
        self.databases
            .entry(db.to_string())
            .or_default()
            .insert(table.to_string(), schema);
    }

    pub fn get(&self, db: &str, table: &str) -> Option<&TableSchema> {
        self.databases.get(db).and_then(|tables| tables.get(table))
    }

    pub fn contains_database(&self, db: &str) -> bool {
        self.databases.contains_key(db)
    }

    /// Total number of tables across all databases
    pub fn table_count(&self) -> usize {
        self.databases.values().map(IndexMap::len).sum()
    }

    /// Read-only view handed to the validation bridge
    pub fn snapshot(&self) -> &IndexMap<String, DatabaseTables> {
        &self.databases
    }

    /// Renders `db={table=col:type,..., table=...},db={...}`.
    pub fn show(&self) -> String {
        self.databases
            .iter()
            .map(|(db, tables)| {
                let rendered: Vec<String> = tables
                    .iter()
                    .map(|(name, schema)| format!("{}={}", name, schema))
                    .collect();
                format!("{}={{{}}}", db, rendered.join(", "))
            })
            .collect::<Vec<_>>()
            .join(",")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SqlType;

    #[test]
    fn test_new_has_empty_default_db() {
        let registry = SchemaRegistry::new("emudb");
        assert!(registry.contains_database("emudb"));
        assert_eq!(registry.table_count(), 0);
        assert_eq!(registry.show(), "emudb={}");
    }

    #[test]
    fn test_show_orders_by_insertion() {
        let mut registry = SchemaRegistry::new("emudb");
        registry.add_table("d1", "t1", "c1 int").unwrap();
        registry.add_table("d1", "t2", "c1 int").unwrap();
        registry.add_table("d2", "t1", "c1 int").unwrap();

        assert_eq!(
            registry.show(),
            "emudb={},d1={t1=c1:int32, t2=c1:int32},d2={t1=c1:int32}"
        );
    }

    #[test]
    fn test_failed_add_leaves_registry_untouched() {
        let mut registry = SchemaRegistry::new("emudb");
        let err = registry.add_table("d1", "t1", "").unwrap_err();
        assert!(err.to_string().contains("invalid column in schema"));
        assert!(!registry.contains_database("d1"));

        registry.add_table("d1", "t1", "a int").unwrap();
        assert!(registry.add_table("d1", "t1", "a int, b").is_err());
        let schema = registry.get("d1", "t1").unwrap();
        assert_eq!(schema.len(), 1);
    }

    #[test]
    fn test_redefinition_replaces_columns() {
        let mut registry = SchemaRegistry::new("emudb");
        registry.add_table("emudb", "t1", "a int, b string").unwrap();
        registry.add_table("emudb", "t1", "z bigint").unwrap();

        let schema = registry.get("emudb", "t1").unwrap();
        assert_eq!(schema.len(), 1);
        assert_eq!(schema.columns()[0].sql_type, SqlType::BigInt);
    }

    #[test]
    fn test_repeated_add_is_idempotent() {
        let mut registry = SchemaRegistry::new("emudb");
        registry.add_table("d1", "t1", "a int, b timestamp").unwrap();
        let first = registry.show();
        registry.add_table("d1", "t1", "a int, b timestamp").unwrap();
        assert_eq!(registry.show(), first);
    }

    #[test]
    fn test_create_database_keeps_tables() {
        let mut registry = SchemaRegistry::new("emudb");
        registry.add_table("d1", "t1", "a int").unwrap();
        registry.create_database("d1");
        assert!(registry.get("d1", "t1").is_some());

        registry.create_database("d2");
        assert_eq!(
            registry.snapshot().keys().collect::<Vec<_>>(),
            vec!["emudb", "d1", "d2"]
        );
    }
}
