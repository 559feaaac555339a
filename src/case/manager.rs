//! Case-file manager
//!
//! Owns the current case file path, which every case command falls back to
//! when no explicit path is given:
//! - `generate_template` writes the bundled template and adopts its path
//! - `load` registers the case's input tables and adopts its path
//! - `dump` stores a SQL statement into the current case file

use std::fs;
use std::path::{Path, PathBuf};

use crate::observability::{Logger, ObservationScope};
use crate::schema::{parse_columns, SchemaRegistry, TableSchema};

use super::document::CaseDocument;
use super::errors::{CaseError, CaseResult};

/// Template written by `generate_template`
pub const CASE_TEMPLATE: &str = include_str!("../../resources/case-temp.yaml");

/// Name given to indexes synthesized on dump
pub const DEFAULT_INDEX_NAME: &str = "index0";

/// A table registered by `load`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedTable {
    pub db: String,
    pub name: String,
}

/// Tracks the current case file and performs case-file commands against it
#[derive(Debug, Clone)]
pub struct CaseFileManager {
    path: PathBuf,
}

impl CaseFileManager {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Current case file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Explicit path if given and non-empty, else the current one
    fn target(&self, requested: Option<&Path>) -> PathBuf {
        match requested {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => self.path.clone(),
        }
    }

    /// Writes the case template to `output` (or the current path).
    ///
    /// The written path becomes the current case file.
    pub fn generate_template(&mut self, output: Option<&Path>) -> CaseResult<PathBuf> {
        let target = self.target(output);
        fs::write(&target, CASE_TEMPLATE).map_err(|e| CaseError::io(&target, e))?;
        if !target.exists() {
            return Err(CaseError::io(&target, "template copy not found after write"));
        }

        Logger::info(
            "CASE_TEMPLATE_WRITTEN",
            &[("path", target.display().to_string().as_str())],
        );
        self.path = target.clone();
        Ok(target)
    }

    /// Registers every input table of the case at `input` (or the current path).
    ///
    /// All descriptors are parsed before any is registered, so a bad
    /// descriptor leaves the registry as it was. Tables without any db
    /// setting go to `fallback_db`.
    pub fn load(
        &mut self,
        input: Option<&Path>,
        registry: &mut SchemaRegistry,
        fallback_db: &str,
    ) -> CaseResult<Vec<LoadedTable>> {
        let source = self.target(input);
        let path_str = source.display().to_string();
        let scope = ObservationScope::with_fields("LOAD_CASE", &[("path", path_str.as_str())]);

        let parsed = match Self::parse_inputs(&source, fallback_db) {
            Ok(parsed) => parsed,
            Err(e) => {
                scope.fail(&e.to_string());
                return Err(e);
            }
        };

        let mut loaded = Vec::with_capacity(parsed.len());
        for (table, schema) in parsed {
            registry.put_table(&table.db, &table.name, schema);
            loaded.push(table);
        }

        scope.complete_with_fields(&[("tables", loaded.len().to_string().as_str())]);
        self.path = source;
        Ok(loaded)
    }

    fn parse_inputs(
        source: &Path,
        fallback_db: &str,
    ) -> CaseResult<Vec<(LoadedTable, TableSchema)>> {
        let doc = CaseDocument::read(source)?;
        let case = doc.single_case(source)?;

        case.inputs
            .iter()
            .map(|table| {
                let db = doc.effective_db(case, table, fallback_db).to_string();
                let columns = parse_columns(&table.column_spec())?;
                Ok((
                    LoadedTable {
                        db,
                        name: table.name.clone(),
                    },
                    TableSchema::new(columns),
                ))
            })
            .collect()
    }

    /// Sets the case's SQL in the current case file and fills in missing indexes.
    ///
    /// Each input without indexes gets `index0:<first column>`. The file is
    /// only rewritten once the whole document checked out.
    pub fn dump(&mut self, sql: &str) -> CaseResult<PathBuf> {
        let path = self.path.clone();
        let mut doc = CaseDocument::read(&path)?;
        let case = doc.single_case_mut(&path)?;
        case.sql = Some(sql.to_string());

        for table in case.inputs.iter_mut() {
            if !table.indexs.is_empty() {
                continue;
            }
            let first = table.first_column_name().ok_or_else(|| {
                CaseError::malformed(
                    &path,
                    format!("table '{}' has no columns to index", table.name),
                )
            })?;
            let index = format!("{}:{}", DEFAULT_INDEX_NAME, first);
            table.indexs.push(index);
        }

        doc.write(&path)?;
        Logger::info(
            "CASE_DUMPED",
            &[("path", path.display().to_string().as_str()), ("sql", sql)],
        );
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_case(dir: &TempDir, body: &str) -> PathBuf {
        let path = dir.path().join("case.yaml");
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn test_template_is_single_case_document() {
        let doc: CaseDocument = serde_yaml::from_str(CASE_TEMPLATE).unwrap();
        let case = doc.single_case(Path::new("template")).unwrap();
        assert!(!case.inputs.is_empty());
    }

    #[test]
    fn test_generate_template_adopts_path() {
        let tmp = TempDir::new().unwrap();
        let default = tmp.path().join("default.yaml");
        let mut manager = CaseFileManager::new(&default);

        let written = manager.generate_template(None).unwrap();
        assert_eq!(written, default);
        assert!(default.exists());

        let other = tmp.path().join("other.yaml");
        manager.generate_template(Some(&other)).unwrap();
        assert_eq!(manager.path(), other.as_path());
        assert_eq!(fs::read_to_string(&other).unwrap(), CASE_TEMPLATE);
    }

    #[test]
    fn test_generate_template_into_missing_dir_fails() {
        let tmp = TempDir::new().unwrap();
        let mut manager = CaseFileManager::new(tmp.path().join("a.yaml"));
        let bad = tmp.path().join("no/such/dir/case.yaml");

        let err = manager.generate_template(Some(&bad)).unwrap_err();
        assert_eq!(err.code(), "EMU_IO_FAILURE");
        assert_eq!(manager.path(), tmp.path().join("a.yaml").as_path());
    }

    #[test]
    fn test_load_registers_tables() {
        let tmp = TempDir::new().unwrap();
        let path = write_case(
            &tmp,
            "db: g\ncases:\n  - inputs:\n      - name: t1\n        columns: ['c1 int', 'c2 string']\n      - db: d2\n        name: t2\n        columns: ['x timestamp']\n",
        );
        let mut manager = CaseFileManager::new(tmp.path().join("default.yaml"));
        let mut registry = SchemaRegistry::new("emudb");

        let loaded = manager.load(Some(&path), &mut registry, "emudb").unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(registry.show(), "emudb={},g={t1=c1:int32,c2:string},d2={t2=x:timestamp}");
        assert_eq!(manager.path(), path.as_path());
    }

    #[test]
    fn test_load_rejects_two_cases() {
        let tmp = TempDir::new().unwrap();
        let path = write_case(
            &tmp,
            "cases:\n  - inputs: []\n  - inputs: []\n",
        );
        let mut manager = CaseFileManager::new(tmp.path().join("default.yaml"));
        let mut registry = SchemaRegistry::new("emudb");

        let err = manager.load(Some(&path), &mut registry, "emudb").unwrap_err();
        assert!(matches!(err, CaseError::MalformedCaseFile { .. }));
        assert_ne!(manager.path(), path.as_path());
    }

    #[test]
    fn test_load_is_all_or_nothing() {
        let tmp = TempDir::new().unwrap();
        let path = write_case(
            &tmp,
            "cases:\n  - inputs:\n      - name: good\n        columns: ['a int']\n      - name: bad\n        columns: ['a']\n",
        );
        let mut manager = CaseFileManager::new(&path);
        let mut registry = SchemaRegistry::new("emudb");

        let err = manager.load(None, &mut registry, "emudb").unwrap_err();
        assert_eq!(err.code(), "EMU_INVALID_COLUMN_SPEC");
        assert_eq!(registry.table_count(), 0);
    }

    #[test]
    fn test_dump_sets_sql_and_default_index() {
        let tmp = TempDir::new().unwrap();
        let path = write_case(
            &tmp,
            "cases:\n  - inputs:\n      - name: t1\n        columns: ['c1 int', 'c2 string']\n        indexs: []\n      - name: t2\n        columns: ['k int']\n        indexs: ['mine:k']\n",
        );
        let mut manager = CaseFileManager::new(&path);

        manager.dump("select c1 from t1").unwrap();

        let doc = CaseDocument::read(&path).unwrap();
        let case = doc.single_case(&path).unwrap();
        assert_eq!(case.sql.as_deref(), Some("select c1 from t1"));
        assert_eq!(case.inputs[0].indexs, vec!["index0:c1".to_string()]);
        assert_eq!(case.inputs[1].indexs, vec!["mine:k".to_string()]);
    }

    #[test]
    fn test_dump_without_cases_leaves_file_alone() {
        let tmp = TempDir::new().unwrap();
        let body = "db: d1\n";
        let path = write_case(&tmp, body);
        let mut manager = CaseFileManager::new(&path);

        let err = manager.dump("select 1").unwrap_err();
        assert_eq!(err.code(), "EMU_MALFORMED_CASE_FILE");
        assert_eq!(fs::read_to_string(&path).unwrap(), body);
    }
}
