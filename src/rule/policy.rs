// src/rule/policy.rs
//! First-crossing reporting policy.
//!
//! A chain that breaches the trust radius does so at exactly one access;
//! everything deeper has a strictly larger degree. Reporting only the
//! crossing keeps one bad chain from producing a cascade of reports.

/// True when `degree` is the first value past the configured radius.
#[must_use]
pub fn is_reported(degree: usize, trust_radius: usize) -> bool {
    degree == trust_radius + 1
}
