// src/bin/stranger.rs
use std::path::{Path, PathBuf};
use std::process;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;

use stranger_core::analysis::Engine;
use stranger_core::cli::Cli;
use stranger_core::config::Config;
use stranger_core::discovery;
use stranger_core::reporting;

fn main() {
    if let Err(e) = run() {
        eprintln!("{} {e}", "error:".red().bold());
        process::exit(2);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load(Path::new("."))?;
    config.verbose = cli.verbose;
    if let Some(radius) = cli.radius {
        if radius == 0 {
            anyhow::bail!("trust radius must be positive");
        }
        config.rules.trust_radius = radius;
    }

    let roots = if cli.paths.is_empty() {
        vec![PathBuf::from(".")]
    } else {
        cli.paths.clone()
    };
    let files = discovery::discover(&roots, &config)?;

    let report = Engine::new(config).scan(&files);
    if cli.json {
        reporting::print_json(&report)?;
    } else {
        reporting::print_report(&report);
    }

    if report.has_violations() {
        process::exit(1);
    }
    Ok(())
}
