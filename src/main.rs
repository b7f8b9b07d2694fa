//! stageschema CLI entry point
//!
//! This is a minimal entrypoint that:
//! 1. Parses CLI arguments and dispatches commands (via cli::run)
//! 2. Writes an error envelope and the error to stderr on failure
//! 3. Exits with non-zero on failure
//!
//! All logic is delegated to the CLI module.

use stageschema::cli::{self, CliErrorCode};

fn main() {
    if let Err(e) = cli::run() {
        // The report envelope is already on stdout for rejected candidates
        if e.code() != &CliErrorCode::ValidationRejected {
            let _ = cli::write_error(e.code_str(), e.message());
        }
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
