//! CLI argument definitions using clap
//!
//! Commands:
//! - stageschema validate --category <c> --type <t> [--input <path>]
//! - stageschema describe --category <c> --type <t>
//! - stageschema list [--category <c>]
//! - stageschema check-catalog --catalog <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// stageschema - validate and default pipeline stage configurations
#[derive(Parser, Debug)]
#[command(name = "stageschema")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate a stage configuration and print the normalized result
    Validate {
        /// Stage category: source, operator or sink
        #[arg(long)]
        category: String,

        /// Stage type within the category (e.g. http, kafka)
        #[arg(long = "type")]
        stage_type: String,

        /// Candidate configuration file; reads stdin when omitted
        #[arg(long)]
        input: Option<PathBuf>,

        /// Path to configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Print the schema of a stage type in catalog definition format
    Describe {
        /// Stage category: source, operator or sink
        #[arg(long)]
        category: String,

        /// Stage type within the category
        #[arg(long = "type")]
        stage_type: String,

        /// Path to configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// List known stage types
    List {
        /// Only list this category
        #[arg(long)]
        category: Option<String>,

        /// Path to configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Load a catalog definition file and report whether it is well-formed
    CheckCatalog {
        /// Catalog definition file
        #[arg(long)]
        catalog: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
