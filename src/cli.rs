// src/cli.rs
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "stranger",
    version,
    about = "Law of Demeter linter for Java: only talk to friends"
)]
pub struct Cli {
    /// Files or directories to scan (defaults to the current directory)
    #[arg(value_name = "PATH")]
    pub paths: Vec<PathBuf>,
    /// Override the configured trust radius
    #[arg(long, value_name = "N")]
    pub radius: Option<usize>,
    /// Emit the report as JSON instead of console output
    #[arg(long)]
    pub json: bool,
    #[arg(long, short)]
    pub verbose: bool,
}
