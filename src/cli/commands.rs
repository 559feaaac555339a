//! Shell command table and process entry points
//!
//! Every shell command is a `CommandSpec` row: name, aliases, how its
//! arguments are taken from the line, the argument count it accepts, and
//! the handler. Arity is checked before a handler runs.
//!
//! Argument modes:
//! - `Words`: the line is split like a shell would (quotes group words)
//! - `NamesThenTail(n)`: `n` whitespace-separated names, then the rest of
//!   the line as one argument (column lists, where `#` is not a comment)
//! - `RawTail`: everything after the command name, untouched (for SQL)

use std::fmt;
use std::path::Path;

use crate::observability::Logger;

use super::args::{Cli, Command};
use super::config::Config;
use super::errors::{CliError, CliResult};
use super::session::Session;
use super::shell::{run_interactive, run_script_file};

/// Handler signature shared by every command
pub type Handler = fn(&mut Session, &[String]) -> CliResult<String>;

/// How arguments are extracted from the input line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgMode {
    Words,
    NamesThenTail(usize),
    RawTail,
}

/// Accepted argument counts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exact(usize),
    Range(usize, usize),
}

impl Arity {
    pub fn accepts(&self, n: usize) -> bool {
        match *self {
            Arity::Exact(k) => n == k,
            Arity::Range(lo, hi) => (lo..=hi).contains(&n),
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Exact(k) => write!(f, "{}", k),
            Arity::Range(lo, hi) => write!(f, "{} to {}", lo, hi),
        }
    }
}

/// One row of the command table
#[derive(Clone, Copy)]
pub struct CommandSpec {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub usage: &'static str,
    pub description: &'static str,
    pub mode: ArgMode,
    pub arity: Arity,
    pub handler: Handler,
}

impl CommandSpec {
    fn matches(&self, name: &str) -> bool {
        self.name == name || self.aliases.contains(&name)
    }
}

/// What the shell should do after a line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Show the reply (possibly empty) and keep reading
    Reply(String),
    /// Leave the shell
    Exit,
}

/// Splits off up to `names` leading words; the remainder is one argument.
///
/// A remainder wrapped entirely in matching quotes is unwrapped.
fn split_names_then_tail(line: &str, names: usize) -> Vec<String> {
    let mut args = Vec::with_capacity(names + 1);
    let mut rest = line.trim();
    while args.len() < names && !rest.is_empty() {
        let (word, after) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
        args.push(word.to_string());
        rest = after.trim_start();
    }
    if !rest.is_empty() {
        let unquoted = ['"', '\'']
            .iter()
            .find_map(|q| rest.strip_prefix(*q).and_then(|r| r.strip_suffix(*q)))
            .unwrap_or(rest);
        args.push(unquoted.to_string());
    }
    args
}

fn optional_path(args: &[String]) -> Option<&Path> {
    args.first().map(|a| Path::new(a.as_str()))
}

fn hello(session: &mut Session, _args: &[String]) -> CliResult<String> {
    Ok(session.hello())
}

fn use_db(session: &mut Session, args: &[String]) -> CliResult<String> {
    session.use_database(&args[0])
}

fn add_table(session: &mut Session, args: &[String]) -> CliResult<String> {
    session.add_table(&args[0], &args[1])
}

fn add_db_table(session: &mut Session, args: &[String]) -> CliResult<String> {
    session.add_db_table(&args[0], &args[1], &args[2])
}

fn sql(session: &mut Session, args: &[String]) -> CliResult<String> {
    session.create_table(&args[0])
}

fn show_tables(session: &mut Session, _args: &[String]) -> CliResult<String> {
    session.show_tables()
}

fn val_batch(session: &mut Session, args: &[String]) -> CliResult<String> {
    session.validate_batch(&args[0])
}

fn val_req(session: &mut Session, args: &[String]) -> CliResult<String> {
    session.validate_request(&args[0])
}

fn run_case(session: &mut Session, args: &[String]) -> CliResult<String> {
    session.run_case(optional_path(args))
}

fn gen_ddl(session: &mut Session, args: &[String]) -> CliResult<String> {
    session.generate_ddl(&args[0])
}

fn gen_case(session: &mut Session, args: &[String]) -> CliResult<String> {
    session.generate_case(optional_path(args))
}

fn load_case(session: &mut Session, args: &[String]) -> CliResult<String> {
    session.load_case(optional_path(args))
}

fn dump_case(session: &mut Session, args: &[String]) -> CliResult<String> {
    session.dump_case(&args[0])
}

fn help(_session: &mut Session, _args: &[String]) -> CliResult<String> {
    Ok(CommandTable::standard().help())
}

const COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        name: "hello",
        aliases: &[],
        usage: "hello",
        description: "print a greeting",
        mode: ArgMode::Words,
        arity: Arity::Exact(0),
        handler: hello,
    },
    CommandSpec {
        name: "use",
        aliases: &[],
        usage: "use <db>",
        description: "use db (create if not exists)",
        mode: ArgMode::Words,
        arity: Arity::Exact(1),
        handler: use_db,
    },
    CommandSpec {
        name: "addtable",
        aliases: &["t"],
        usage: "addtable <table> <schema...>",
        description: "add table to current db, e.g. addtable t1 a int, b timestamp",
        mode: ArgMode::NamesThenTail(1),
        arity: Arity::Exact(2),
        handler: add_table,
    },
    CommandSpec {
        name: "adddbtable",
        aliases: &["dt"],
        usage: "adddbtable <db> <table> <schema...>",
        description: "add table to specified db",
        mode: ArgMode::NamesThenTail(2),
        arity: Arity::Exact(3),
        handler: add_db_table,
    },
    CommandSpec {
        name: "sql",
        aliases: &[],
        usage: "sql create table <name> (<columns>)",
        description: "add table by create table statement, nothing else supported",
        mode: ArgMode::RawTail,
        arity: Arity::Exact(1),
        handler: sql,
    },
    CommandSpec {
        name: "showtables",
        aliases: &["st"],
        usage: "showtables",
        description: "show all tables",
        mode: ArgMode::Words,
        arity: Arity::Exact(0),
        handler: show_tables,
    },
    CommandSpec {
        name: "valbatch",
        aliases: &["val"],
        usage: "valbatch <sql>",
        description: "validate sql in batch mode",
        mode: ArgMode::RawTail,
        arity: Arity::Exact(1),
        handler: val_batch,
    },
    CommandSpec {
        name: "valreq",
        aliases: &[],
        usage: "valreq <sql>",
        description: "validate sql in request mode",
        mode: ArgMode::RawTail,
        arity: Arity::Exact(1),
        handler: val_req,
    },
    CommandSpec {
        name: "run",
        aliases: &[],
        usage: "run [<yaml-path>]",
        description: "run a case in the reference engine, default the cached case path",
        mode: ArgMode::Words,
        arity: Arity::Range(0, 1),
        handler: run_case,
    },
    CommandSpec {
        name: "genddl",
        aliases: &[],
        usage: "genddl <sql>",
        description: "generate create table statements for a deployment sql",
        mode: ArgMode::RawTail,
        arity: Arity::Exact(1),
        handler: gen_ddl,
    },
    CommandSpec {
        name: "gencase",
        aliases: &[],
        usage: "gencase [<output-path>]",
        description: "write a template case file and cache its path",
        mode: ArgMode::Words,
        arity: Arity::Range(0, 1),
        handler: gen_case,
    },
    CommandSpec {
        name: "loadcase",
        aliases: &[],
        usage: "loadcase [<input-path>]",
        description: "load table schemas from a case file and cache its path",
        mode: ArgMode::Words,
        arity: Arity::Range(0, 1),
        handler: load_case,
    },
    CommandSpec {
        name: "dumpcase",
        aliases: &[],
        usage: "dumpcase <sql>",
        description: "store sql in the cached case file, adding default indexes",
        mode: ArgMode::RawTail,
        arity: Arity::Exact(1),
        handler: dump_case,
    },
    CommandSpec {
        name: "help",
        aliases: &["?"],
        usage: "help",
        description: "list commands",
        mode: ArgMode::Words,
        arity: Arity::Exact(0),
        handler: help,
    },
];

const EXIT_COMMANDS: &[&str] = &["exit", "quit"];

/// The shell's command table
#[derive(Clone, Copy)]
pub struct CommandTable {
    commands: &'static [CommandSpec],
}

impl CommandTable {
    /// Table holding every shell command
    pub fn standard() -> Self {
        Self { commands: COMMANDS }
    }

    pub fn lookup(&self, name: &str) -> Option<&CommandSpec> {
        self.commands.iter().find(|spec| spec.matches(name))
    }

    pub fn commands(&self) -> &[CommandSpec] {
        self.commands
    }

    /// One line per command: usage, aliases and description
    pub fn help(&self) -> String {
        self.commands
            .iter()
            .map(|spec| {
                let aliases = if spec.aliases.is_empty() {
                    String::new()
                } else {
                    format!(" ({})", spec.aliases.join(", "))
                };
                format!("{}{}\n    {}", spec.usage, aliases, spec.description)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Parses and runs one input line against `session`.
    ///
    /// Blank lines and `#` comments are no-ops.
    pub fn execute(&self, session: &mut Session, line: &str) -> CliResult<Outcome> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(Outcome::Reply(String::new()));
        }

        let (name, tail) = match line.split_once(char::is_whitespace) {
            Some((name, tail)) => (name, tail.trim()),
            None => (line, ""),
        };
        let name = name.to_lowercase();

        if EXIT_COMMANDS.contains(&name.as_str()) {
            return Ok(Outcome::Exit);
        }

        let spec = self
            .lookup(&name)
            .ok_or_else(|| CliError::unknown_command(&name))?;

        let args = match spec.mode {
            ArgMode::RawTail if tail.is_empty() => Vec::new(),
            ArgMode::RawTail => vec![tail.to_string()],
            ArgMode::NamesThenTail(names) => split_names_then_tail(tail, names),
            ArgMode::Words => shell_words::split(tail).map_err(|e| {
                CliError::unsupported(format!("cannot split arguments of {}: {}", spec.name, e))
            })?,
        };

        if !spec.arity.accepts(args.len()) {
            return Err(CliError::wrong_arity(spec.name, spec.arity, args.len()));
        }

        Logger::trace("COMMAND", &[("args", args.join(" ").as_str()), ("name", spec.name)]);
        let reply = (spec.handler)(session, &args)?;
        Ok(Outcome::Reply(reply))
    }
}

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    let config = Config::load_or_default(&cli.config)?;
    run_command(cli.command(), &config)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command, config: &Config) -> CliResult<()> {
    Logger::set_min_severity(config.severity()?);
    let mut session = Session::from_config(config);
    let table = CommandTable::standard();

    match cmd {
        Command::Shell => run_interactive(&table, &mut session, config.history_file.as_deref()),
        Command::Script { path } => run_script_file(&table, &mut session, &path),
    }
}
