// src/reporting/json.rs
use crate::error::{Result, StrangerError};
use crate::types::ScanReport;

/// Prints the scan report as pretty JSON on stdout.
///
/// # Errors
/// Returns error if serialization fails.
pub fn print_json(report: &ScanReport) -> Result<()> {
    let rendered =
        serde_json::to_string_pretty(report).map_err(|e| StrangerError::Other(e.to_string()))?;
    println!("{rendered}");
    Ok(())
}
