// src/types.rs
use serde::Serialize;
use std::path::PathBuf;

use crate::ast::Span;

/// What kind of member access breached the trust radius.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessKind {
    Field,
    Call,
}

/// A single violation detected during analysis.
#[derive(Debug, Clone, Serialize)]
pub struct Violation {
    pub row: usize,
    pub column: usize,
    pub kind: AccessKind,
    /// Name of the accessed field or called method.
    pub member: String,
    /// Pretty-printed receiver the access reached through.
    pub qualifier: String,
    /// Computed foreign degree at the reported access.
    pub degree: usize,
    pub message: String,
}

impl Violation {
    #[must_use]
    pub fn field_access(span: Span, member: &str, qualifier: &str, degree: usize) -> Self {
        Self {
            row: span.row,
            column: span.column,
            kind: AccessKind::Field,
            member: member.to_string(),
            qualifier: qualifier.to_string(),
            degree,
            message: format!(
                "Access to field `{member}` on foreign value `{qualifier}` (degree {degree})"
            ),
        }
    }

    #[must_use]
    pub fn method_call(span: Span, member: &str, qualifier: &str, degree: usize) -> Self {
        Self {
            row: span.row,
            column: span.column,
            kind: AccessKind::Call,
            member: member.to_string(),
            qualifier: qualifier.to_string(),
            degree,
            message: format!(
                "Call to `{member}` on foreign value `{qualifier}` (degree {degree})"
            ),
        }
    }
}

/// Analysis results for a single file.
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub path: PathBuf,
    /// Methods and constructors analyzed.
    pub method_count: usize,
    pub violations: Vec<Violation>,
}

impl FileReport {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }

    #[must_use]
    pub fn violation_count(&self) -> usize {
        self.violations.len()
    }
}

/// Aggregated results from scanning multiple files.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScanReport {
    pub files: Vec<FileReport>,
    pub total_methods: usize,
    pub total_violations: usize,
    pub duration_ms: u128,
}

impl ScanReport {
    #[must_use]
    pub fn has_violations(&self) -> bool {
        self.total_violations > 0
    }

    #[must_use]
    pub fn clean_file_count(&self) -> usize {
        self.files.iter().filter(|f| f.is_clean()).count()
    }
}
