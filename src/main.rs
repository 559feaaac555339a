//! sqlemu entry point
//!
//! Minimal entrypoint that:
//! 1. Parses CLI arguments and loads configuration (via cli::run)
//! 2. Runs the shell or a script (via cli::run)
//! 3. Prints errors to stderr
//! 4. Exits with non-zero on failure

use sqlemu::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
