// src/analysis/mod.rs
//! Parallel scan orchestration (the "Rule Engine").

use rayon::prelude::{IntoParallelRefIterator, ParallelIterator};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::config::Config;
use crate::java::JavaAnalyzer;
use crate::types::{FileReport, ScanReport};

/// Scans files in parallel. Parallelism is per file: each file task owns an
/// independent parser, arena and degree cache, so nothing analysis-scoped
/// crosses a thread boundary.
pub struct Engine {
    config: Config,
}

impl Engine {
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn scan(&self, files: &[PathBuf]) -> ScanReport {
        let start = Instant::now();

        let results: Vec<FileReport> = files
            .par_iter()
            .map(|path| self.scan_file(path))
            .collect();

        ScanReport {
            total_methods: results.iter().map(|r| r.method_count).sum(),
            total_violations: results.iter().map(|r| r.violations.len()).sum(),
            files: results,
            duration_ms: start.elapsed().as_millis(),
        }
    }

    /// Unreadable or unparseable files degrade to an empty report; a lint
    /// run never fails on one bad input.
    fn scan_file(&self, path: &Path) -> FileReport {
        let source = match fs::read_to_string(path) {
            Ok(source) => source,
            Err(e) => {
                if self.config.verbose {
                    eprintln!("WARN: skipping {}: {e}", path.display());
                }
                return empty_report(path);
            }
        };
        let Ok(mut analyzer) = JavaAnalyzer::new() else {
            if self.config.verbose {
                eprintln!("WARN: Java grammar unavailable, skipping {}", path.display());
            }
            return empty_report(path);
        };
        let analysis = analyzer.analyze(&source, &self.config.rules);
        FileReport {
            path: path.to_path_buf(),
            method_count: analysis.method_count,
            violations: analysis.violations,
        }
    }
}

fn empty_report(path: &Path) -> FileReport {
    FileReport {
        path: path.to_path_buf(),
        method_count: 0,
        violations: Vec::new(),
    }
}
