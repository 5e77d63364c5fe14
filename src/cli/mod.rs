//! CLI module
//!
//! Command-line interface for the extractor.
//!
//! # Commands
//!
//! - `run` - Execute a sync and emit JSONL records
//! - `check` - Test connection and credentials
//! - `discover` - Print the stream catalog

mod commands;
mod runner;

pub use commands::{Cli, Commands};
pub use runner::Runner;
