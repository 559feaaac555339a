//! Line-oriented front ends for the command table
//!
//! - Interactive: rustyline editor, prompt `<db>> `, Ctrl-C clears the
//!   line, Ctrl-D or `exit` leaves. A failing command is reported and the
//!   shell keeps going.
//! - Script: one command per line, `#` comments, stops at the first failure.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use crate::observability::{Logger, Severity};

use super::commands::{CommandTable, Outcome};
use super::errors::{CliError, CliResult};
use super::session::Session;

/// Failures already reach stderr as `CODE: message`; the log copy stays
/// below the default threshold.
const COMMAND_FAILED_SEVERITY: Severity = Severity::Info;

fn report_failure(line: &str, err: &CliError) {
    Logger::log(
        COMMAND_FAILED_SEVERITY,
        "COMMAND_FAILED",
        &[("code", err.code_str()), ("line", line), ("message", err.message())],
    );
}

/// Runs the interactive read-eval-print loop until EOF or `exit`.
pub fn run_interactive(
    table: &CommandTable,
    session: &mut Session,
    history_file: Option<&Path>,
) -> CliResult<()> {
    let mut editor = DefaultEditor::new()?;
    if let Some(path) = history_file {
        if let Err(e) = editor.load_history(path) {
            Logger::trace("HISTORY_NOT_LOADED", &[("reason", e.to_string().as_str())]);
        }
    }

    println!("sqlemu shell, type 'help' for the command list");
    loop {
        match editor.readline(&session.prompt()) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    editor.add_history_entry(line.as_str())?;
                }
                match table.execute(session, &line) {
                    Ok(Outcome::Exit) => break,
                    Ok(Outcome::Reply(text)) => {
                        if !text.is_empty() {
                            println!("{}", text);
                        }
                    }
                    Err(e) => {
                        report_failure(&line, &e);
                        eprintln!("{}", e);
                    }
                }
            }
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        }
    }

    if let Some(path) = history_file {
        if let Err(e) = editor.save_history(path) {
            Logger::warn("HISTORY_NOT_SAVED", &[("reason", e.to_string().as_str())]);
        }
    }
    Ok(())
}

/// Runs every command in `reader`, echoing each line and its reply to `out`.
///
/// Returns the number of commands executed. The first failing command
/// aborts the script; the error names its line number.
pub fn run_script<R: BufRead, W: Write>(
    table: &CommandTable,
    session: &mut Session,
    reader: R,
    out: &mut W,
) -> CliResult<usize> {
    let mut executed = 0;
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        writeln!(out, "executing: {}", trimmed)?;
        match table.execute(session, trimmed) {
            Ok(Outcome::Exit) => break,
            Ok(Outcome::Reply(text)) => {
                executed += 1;
                if !text.is_empty() {
                    writeln!(out, "{}", text)?;
                }
            }
            Err(e) => {
                report_failure(trimmed, &e);
                return Err(CliError::new(
                    *e.code(),
                    format!("line {}: {}", index + 1, e.message()),
                ));
            }
        }
    }
    out.flush()?;
    Ok(executed)
}

/// Runs a script file, writing to stdout
pub fn run_script_file(
    table: &CommandTable,
    session: &mut Session,
    path: &Path,
) -> CliResult<()> {
    let file = File::open(path).map_err(|e| {
        CliError::io_error(format!("Failed to open script {}: {}", path.display(), e))
    })?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    run_script(table, session, BufReader::new(file), &mut out)?;
    Ok(())
}
