//! Reference engine runner
//!
//! Runs a case file through the external reference binary:
//! `<engine> --yaml_path=<case file>`. The call blocks until the engine
//! exits; there is no timeout.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::observability::ObservationScope;

use super::errors::{BridgeError, BridgeResult};

/// Captured result of one engine run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaseOutput {
    pub stdout: String,
    pub stderr: String,
    /// `-1` when the process was terminated by a signal
    pub exit_code: i32,
}

impl CaseOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Executes case files
pub trait CaseRunner {
    fn execute_case_file(&self, path: &Path) -> BridgeResult<CaseOutput>;
}

/// Runner that spawns the reference binary
#[derive(Debug, Clone)]
pub struct EngineRunner {
    binary: PathBuf,
}

impl EngineRunner {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    fn program_name(&self) -> String {
        self.binary
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.binary.display().to_string())
    }
}

impl CaseRunner for EngineRunner {
    fn execute_case_file(&self, path: &Path) -> BridgeResult<CaseOutput> {
        if !self.binary.exists() {
            return Err(BridgeError::Unavailable(format!(
                "no reference engine at {}, build it first",
                self.binary.display()
            )));
        }

        let path_str = path.display().to_string();
        let scope = ObservationScope::with_fields("RUN_CASE", &[("path", path_str.as_str())]);

        let output = match Command::new(&self.binary)
            .arg(format!("--yaml_path={}", path_str))
            .output()
        {
            Ok(output) => output,
            Err(e) => {
                scope.fail(&e.to_string());
                return Err(BridgeError::process(self.program_name(), e));
            }
        };

        let result = CaseOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            exit_code: output.status.code().unwrap_or(-1),
        };
        scope.complete_with_fields(&[("exit_code", result.exit_code.to_string().as_str())]);
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_binary_is_unavailable() {
        let tmp = TempDir::new().unwrap();
        let runner = EngineRunner::new(tmp.path().join("toydb_run_engine"));
        let err = runner
            .execute_case_file(&tmp.path().join("case.yaml"))
            .unwrap_err();
        assert!(matches!(err, BridgeError::Unavailable(ref m) if m.contains("build it first")));
    }

    #[cfg(unix)]
    fn script(tmp: &TempDir, body: &str) -> PathBuf {
        use std::fs;
        use std::os::unix::fs::PermissionsExt;

        let path = tmp.path().join("fake_engine");
        fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[cfg(unix)]
    #[test]
    fn test_captures_output_and_flag() {
        let tmp = TempDir::new().unwrap();
        let runner = EngineRunner::new(script(&tmp, "echo \"$1\"; echo oops >&2"));

        let out = runner.execute_case_file(Path::new("/tmp/c.yaml")).unwrap();
        assert!(out.success());
        assert_eq!(out.stdout, "--yaml_path=/tmp/c.yaml\n");
        assert_eq!(out.stderr, "oops\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_reports_exit_code() {
        let tmp = TempDir::new().unwrap();
        let runner = EngineRunner::new(script(&tmp, "exit 4"));

        let out = runner.execute_case_file(Path::new("/tmp/c.yaml")).unwrap();
        assert!(!out.success());
        assert_eq!(out.exit_code, 4);
        assert_eq!(runner.program_name(), "fake_engine");
    }
}
