//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Incremental extractor for the audioscrobbler API
#[derive(Parser, Debug)]
#[command(name = "lastfm-extractor")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// State file (JSON); overrides the configured path
    #[arg(short, long, global = true)]
    pub state: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a sync, emitting JSONL records
    Run {
        /// Output file (stdout when omitted); overrides the configured path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Test connection and credentials against the API
    Check,

    /// Print the stream catalog
    Discover,
}
