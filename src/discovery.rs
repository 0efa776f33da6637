// src/discovery.rs
use crate::config::Config;
use crate::error::Result;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Directories that never hold checked-in Java sources.
const PRUNED_DIRS: &[&str] = &[
    ".git",
    ".gradle",
    ".idea",
    "target",
    "build",
    "out",
    "node_modules",
];

/// Runs the file discovery pipeline over the given roots.
///
/// # Errors
/// Returns error if the file system walk fails at a root.
pub fn discover(roots: &[PathBuf], config: &Config) -> Result<Vec<PathBuf>> {
    let raw_files = walk_filesystem(roots, config.verbose);
    let mut files = filter_config(raw_files, config);
    files.sort();
    files.dedup();
    Ok(files)
}

fn walk_filesystem(roots: &[PathBuf], verbose: bool) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    let mut error_count = 0usize;

    for root in roots {
        // Roots are exempt from pruning so explicit arguments always walk.
        let walker = WalkDir::new(root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !should_prune(&e.file_name().to_string_lossy()));

        for item in walker {
            match item {
                Ok(entry) => {
                    if entry.file_type().is_file() && is_java_source(entry.path()) {
                        let p = entry.path().strip_prefix(".").unwrap_or(entry.path());
                        paths.push(p.to_path_buf());
                    }
                }
                Err(_) => error_count += 1,
            }
        }
    }

    if error_count > 0 && verbose {
        eprintln!("WARN: Encountered {error_count} errors during file walk");
    }
    paths
}

fn should_prune(name: &str) -> bool {
    if PRUNED_DIRS.contains(&name) {
        return true;
    }
    // Hidden entries, but not the bare "." root.
    name.len() > 1 && name.starts_with('.')
}

fn is_java_source(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "java")
}

/// Normalizes a path to use forward slashes (cross-platform pattern matching).
fn normalize_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

fn filter_config(mut paths: Vec<PathBuf>, config: &Config) -> Vec<PathBuf> {
    if !config.include_patterns.is_empty() {
        paths.retain(|p| {
            let s = normalize_path(p);
            config.include_patterns.iter().any(|re| re.is_match(&s))
        });
    }

    if !config.exclude_patterns.is_empty() {
        paths.retain(|p| {
            let s = normalize_path(p);
            !config.exclude_patterns.iter().any(|re| re.is_match(&s))
        });
    }

    paths
}
