//! CLI commands and argument parsing

use crate::output::OutputFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Admin insights extraction CLI
#[derive(Parser, Debug)]
#[command(name = "insights-extract")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Pretty-print JSON messages
    #[arg(short, long, global = true)]
    pub pretty: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a job and write its table
    Run {
        /// Job definition file (YAML)
        job: PathBuf,

        /// Read one response body from this file instead of the API
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output file (defaults to the job's output path)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format (defaults to the job's, or the output extension)
        #[arg(short, long)]
        format: Option<OutputFormat>,

        /// Fixed generation stamp instead of the current time
        #[arg(long)]
        stamp: Option<String>,
    },

    /// Validate a job definition
    Validate {
        /// Job definition file (YAML)
        job: PathBuf,
    },

    /// Print the flat rows of a JSON or XML response file
    Flatten {
        /// Response body file; `.xml` is read as markup, anything else as JSON
        input: PathBuf,

        /// Record path (JSON) or record element (XML)
        #[arg(short, long)]
        records: Option<String>,
    },
}
