//! CLI module
//!
//! Command-line interface for running extraction jobs.
//!
//! # Commands
//!
//! - `run` - Fetch, project and write a job's table
//! - `validate` - Check a job definition
//! - `flatten` - Show the flat rows of a saved response

mod commands;
mod runner;

pub use commands::{Cli, Commands};
pub use runner::Runner;
