//! CLI module for stageschema
//!
//! Provides command-line interface for:
//! - validate: Validate and normalize a stage configuration
//! - describe: Print a stage schema for form rendering
//! - list: List known stage types
//! - check-catalog: Check a catalog definition file

mod args;
mod commands;
mod config;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{
    check_catalog, describe, list, list_stage_types, open_catalog, run, run_command, validate,
    validate_candidate,
};
pub use config::Config;
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_document, write_error, write_response};
