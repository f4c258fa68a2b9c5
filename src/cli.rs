//! CLI definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// job-alert - rank fresh job postings against your resume
#[derive(Parser, Debug)]
#[command(
    name = "job-alert",
    version,
    about = "Rank fresh job postings against your resume and email a shortlist"
)]
pub struct Cli {
    /// Extra configuration file, layered over config/default and config/local
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch, rank and email today's matches (default)
    Run {
        /// Log the ranking instead of emailing it and leave history untouched
        #[arg(long)]
        dry_run: bool,
    },

    /// Serve the matching API over HTTP
    Serve,
}
