//! JSON output writer.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use super::Report;
use crate::error::Result;

/// Writes the report to a JSON file.
///
/// # Format
/// ```json
/// {
///   "metadata": { "totalMessages": 3, ... },
///   "participants": [ { "name": "Alice", ... } ],
///   "analytics": { "messageStats": { ... }, ... }
/// }
/// ```
pub fn write_json(report: &Report<'_>, output_path: impl AsRef<Path>) -> Result<()> {
    let json = to_json(report)?;
    let mut file = File::create(output_path)?;
    file.write_all(json.as_bytes())?;
    file.write_all(b"\n")?;
    Ok(())
}

/// Converts the report to a pretty-printed JSON string.
///
/// Maps are ordered, so identical input yields identical bytes.
pub fn to_json(report: &Report<'_>) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}
