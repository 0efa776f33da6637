// src/reporting/console.rs
use crate::types::{ScanReport, Violation};
use colored::Colorize;
use std::fs;
use std::path::Path;

const WHY: &str = "chained access reaches through an intermediary, coupling this \
method to the internals of a value it does not own";
const FIX: &str = "ask the direct collaborator to do the work, or have it hand \
back exactly the value this method needs";

/// Prints a formatted scan report to stdout. The first violation gets the
/// full educational block; subsequent ones get a compact line.
pub fn print_report(report: &ScanReport) {
    let mut occurrence = 0usize;
    for file in &report.files {
        for violation in &file.violations {
            occurrence += 1;
            if occurrence == 1 {
                print_violation_full(&file.path, violation, report.total_violations);
            } else {
                print_violation_compact(&file.path, violation, occurrence, report.total_violations);
            }
        }
    }
    print_summary(report);
}

fn print_violation_full(path: &Path, v: &Violation, total: usize) {
    let count_label = if total > 1 {
        format!(" [1 of {total}]")
    } else {
        String::new()
    };
    println!("{}", format!("warn:{count_label} {}", v.message).yellow());
    println!("  {} {}:{}", "-->".blue(), path.display(), v.row);
    print_snippet(path, v.row);

    println!("   {}", "|".blue());
    println!("   {} {} {}", "=".blue(), "WHY:".cyan(), WHY);
    println!("   {}", "|".blue());
    println!("   {} {} {}", "=".blue(), "FIX:".green(), FIX);
    println!();
}

fn print_violation_compact(path: &Path, v: &Violation, occurrence: usize, total: usize) {
    println!(
        "{}",
        format!("warn: [{occurrence} of {total}] {}", v.message).yellow()
    );
    println!("  {} {}:{}", "-->".blue(), path.display(), v.row);
    println!();
}

fn print_snippet(path: &Path, row: usize) {
    let Ok(content) = fs::read_to_string(path) else {
        return;
    };
    let lines: Vec<&str> = content.lines().collect();

    let idx = row.saturating_sub(1);
    let start = idx.saturating_sub(1);
    let end = (idx + 1).min(lines.len().saturating_sub(1));

    println!("   {}", "|".blue());

    for i in start..=end {
        if let Some(line) = lines.get(i) {
            let line_num = i + 1;
            let gutter = format!("{line_num:3} |");

            if i == idx {
                println!("   {} {}", gutter.blue(), line);
                let trimmed = line.trim_start();
                let padding = line.len() - trimmed.len();
                let underline_len = trimmed.len().max(1);
                let spaces = " ".repeat(padding);
                let carets = "^".repeat(underline_len);
                println!("   {} {}{}", "|".blue(), spaces, carets.yellow().bold());
            } else {
                println!("   {} {}", gutter.blue().dimmed(), line.dimmed());
            }
        }
    }
}

fn print_summary(report: &ScanReport) {
    let files = report.files.len();
    let methods = report.total_methods;
    let duration = report.duration_ms;

    if !report.has_violations() {
        println!(
            "{} No foreign-value access found in {files} {} ({methods} {}, {duration}ms).",
            "OK".green().bold(),
            pluralize("file", files),
            pluralize("method", methods),
        );
        return;
    }

    println!(
        "{} Stranger found {} {} in {files} {} ({duration}ms).",
        "~".yellow().bold(),
        report.total_violations,
        pluralize("violation", report.total_violations),
        pluralize("file", files),
    );
}

fn pluralize(word: &str, count: usize) -> String {
    if count == 1 {
        word.to_string()
    } else {
        format!("{word}s")
    }
}
