//! Case document model
//!
//! ```yaml
//! db: emudb                 # optional, document-level default
//! cases:                    # exactly one element
//!   - db: d1                # optional, case-level default
//!     sql: select ...       # optional until dumped
//!     inputs:
//!       - db: d2            # optional
//!         name: t1
//!         columns: ["c1 string", "c2 int"]
//!         indexs: ["index0:c1"]
//! ```
//!
//! Keys not listed above (`id`, `desc`, `rows`, `expect`, ...) belong to the
//! reference engine and are carried through unchanged.

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_yaml::Value;

use super::errors::{CaseError, CaseResult};

/// Keys the shell does not interpret, in document order
pub type ExtraKeys = IndexMap<String, Value>;

/// Top-level case document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub db: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cases: Option<Vec<CaseSpec>>,
    #[serde(flatten)]
    pub extra: ExtraKeys,
}

/// One test case
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub db: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sql: Option<String>,
    pub inputs: Vec<TableDescriptor>,
    #[serde(flatten)]
    pub extra: ExtraKeys,
}

/// One input table of a case
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableDescriptor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub db: Option<String>,
    pub name: String,
    /// `"<name> <type>"` entries
    pub columns: Vec<String>,
    #[serde(default)]
    pub indexs: Vec<String>,
    #[serde(flatten)]
    pub extra: ExtraKeys,
}

impl TableDescriptor {
    /// Joins the column entries into one column spec
    pub fn column_spec(&self) -> String {
        self.columns.join(",")
    }

    /// Name of the first column, i.e. the first token of the first entry
    pub fn first_column_name(&self) -> Option<&str> {
        self.columns
            .first()
            .and_then(|entry| entry.split_whitespace().next())
    }
}

fn non_empty(db: &Option<String>) -> Option<&str> {
    db.as_deref().filter(|s| !s.is_empty())
}

impl CaseDocument {
    /// Reads and parses a case document
    pub fn read(path: &Path) -> CaseResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| CaseError::io(path, e))?;
        serde_yaml::from_str(&content)
            .map_err(|e| CaseError::malformed(path, format!("invalid YAML: {}", e)))
    }

    /// Serializes and writes the document, replacing the file
    pub fn write(&self, path: &Path) -> CaseResult<()> {
        let content = serde_yaml::to_string(self)
            .map_err(|e| CaseError::io(path, format!("failed to serialize: {}", e)))?;
        fs::write(path, content).map_err(|e| CaseError::io(path, e))
    }

    /// Returns the only case, enforcing the single-case structure
    pub fn single_case(&self, path: &Path) -> CaseResult<&CaseSpec> {
        match self.cases.as_deref() {
            None => Err(CaseError::malformed(path, "missing `cases`")),
            Some([case]) => Ok(case),
            Some(cases) => Err(CaseError::malformed(
                path,
                format!("expected exactly one case, found {}", cases.len()),
            )),
        }
    }

    /// Mutable variant of [`CaseDocument::single_case`]
    pub fn single_case_mut(&mut self, path: &Path) -> CaseResult<&mut CaseSpec> {
        match self.cases.as_deref_mut() {
            None => Err(CaseError::malformed(path, "missing `cases`")),
            Some([case]) => Ok(case),
            Some(cases) => Err(CaseError::malformed(
                path,
                format!("expected exactly one case, found {}", cases.len()),
            )),
        }
    }

    /// Database a descriptor's table belongs to
    ///
    /// Descriptor db, else case db, else document db, else `fallback`.
    pub fn effective_db<'a>(
        &'a self,
        case: &'a CaseSpec,
        table: &'a TableDescriptor,
        fallback: &'a str,
    ) -> &'a str {
        non_empty(&table.db)
            .or_else(|| non_empty(&case.db))
            .or_else(|| non_empty(&self.db))
            .unwrap_or(fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const DOC: &str = r#"
db: global
cases:
  - id: 7
    db: casedb
    inputs:
      - name: t1
        columns: ["c1 string", "c2 int"]
        rows:
          - ["a", 1]
      - db: own
        name: t2
        columns: ["x bigint"]
        indexs: ["idx:x"]
"#;

    #[test]
    fn test_parse_and_effective_db() {
        let doc: CaseDocument = serde_yaml::from_str(DOC).unwrap();
        let path = Path::new("doc.yaml");
        let case = doc.single_case(path).unwrap();

        assert_eq!(case.inputs.len(), 2);
        assert_eq!(doc.effective_db(case, &case.inputs[0], "emudb"), "casedb");
        assert_eq!(doc.effective_db(case, &case.inputs[1], "emudb"), "own");
        assert!(case.inputs[0].indexs.is_empty());
        assert_eq!(case.inputs[0].column_spec(), "c1 string,c2 int");
        assert_eq!(case.inputs[0].first_column_name(), Some("c1"));
    }

    #[test]
    fn test_effective_db_fallbacks() {
        let doc: CaseDocument = serde_yaml::from_str(
            "cases:\n  - db: ''\n    inputs:\n      - name: t\n        columns: ['a int']\n",
        )
        .unwrap();
        let case = doc.single_case(Path::new("x")).unwrap();
        assert_eq!(doc.effective_db(case, &case.inputs[0], "emudb"), "emudb");
    }

    #[test]
    fn test_unknown_keys_survive_rewrite() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("case.yaml");
        let doc: CaseDocument = serde_yaml::from_str(DOC).unwrap();
        doc.write(&path).unwrap();

        let reread = CaseDocument::read(&path).unwrap();
        assert_eq!(reread, doc);
        let case = reread.single_case(&path).unwrap();
        assert!(case.extra.contains_key("id"));
        assert!(case.inputs[0].extra.contains_key("rows"));
    }

    #[test]
    fn test_missing_cases_is_malformed() {
        let doc: CaseDocument = serde_yaml::from_str("db: d1\n").unwrap();
        let err = doc.single_case(Path::new("x")).unwrap_err();
        assert_eq!(err.code(), "EMU_MALFORMED_CASE_FILE");
    }

    #[test]
    fn test_missing_name_is_malformed() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("case.yaml");
        fs::write(&path, "cases:\n  - inputs:\n      - columns: ['a int']\n").unwrap();
        let err = CaseDocument::read(&path).unwrap_err();
        assert_eq!(err.code(), "EMU_MALFORMED_CASE_FILE");
    }

    #[test]
    fn test_missing_file_is_io_failure() {
        let tmp = TempDir::new().unwrap();
        let err = CaseDocument::read(&tmp.path().join("absent.yaml")).unwrap_err();
        assert_eq!(err.code(), "EMU_IO_FAILURE");
    }
}
