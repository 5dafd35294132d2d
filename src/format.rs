//! Output format selection, independent of the CLI.
//!
//! # Example
//!
//! ```rust
//! # #[cfg(all(feature = "csv-output", feature = "json-output"))]
//! # fn example() -> chatlens::Result<()> {
//! use chatlens::analytics::analyze;
//! use chatlens::config::AnalyticsConfig;
//! use chatlens::core::filter::FilterPredicate;
//! use chatlens::format::{OutputFormat, to_format_string};
//! use chatlens::parser::LogParser;
//!
//! let chat = LogParser::new().parse_str("[01/01/2024, 09:00:00] Alice: hi")?;
//! let analytics = analyze(&chat, &AnalyticsConfig::default())?;
//!
//! let format = OutputFormat::from_path("report.json")?;
//! let json = to_format_string(&chat, &analytics, &FilterPredicate::new(), format)?;
//! assert!(json.contains("\"totalMessages\": 1"));
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::analytics::ProcessedAnalytics;
use crate::core::filter::FilterPredicate;
use crate::core::models::ParsedChat;
use crate::error::ChatlensError;

/// Output format for analysis results.
///
/// - [`Json`](OutputFormat::Json) - metadata, participants and analytics
/// - [`Csv`](OutputFormat::Csv) - the parsed messages, one row each
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum OutputFormat {
    #[default]
    Json,

    /// Semicolon delimited
    Csv,
}

impl OutputFormat {
    /// File extension, without dot.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
        }
    }

    pub fn all_names() -> &'static [&'static str] {
        &["json", "csv"]
    }

    pub fn all() -> &'static [OutputFormat] {
        &[OutputFormat::Json, OutputFormat::Csv]
    }

    /// # Example
    ///
    /// ```rust
    /// use chatlens::format::OutputFormat;
    ///
    /// assert_eq!(OutputFormat::Json.mime_type(), "application/json");
    /// ```
    pub fn mime_type(&self) -> &'static str {
        match self {
            OutputFormat::Json => "application/json",
            OutputFormat::Csv => "text/csv",
        }
    }

    /// Detects format from a file path's extension.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ChatlensError> {
        let ext = path
            .as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match ext.as_str() {
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(ChatlensError::invalid_format(
                "output",
                format!("Unknown file extension: '.{ext}'. Expected one of: json, csv"),
            )),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Json => write!(f, "JSON"),
            OutputFormat::Csv => write!(f, "CSV"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(format!(
                "Unknown format: '{}'. Expected one of: {}",
                s,
                OutputFormat::all_names().join(", ")
            )),
        }
    }
}

/// Writes results to a file in the given format.
///
/// `analytics` is written as computed; CSV rows are the messages matching
/// `predicate`, so both formats describe the same subset.
///
/// # Errors
///
/// Returns an error if the format's feature is disabled or the file cannot
/// be written.
#[allow(unused_variables)]
pub fn write_to_format(
    chat: &ParsedChat,
    analytics: &ProcessedAnalytics,
    predicate: &FilterPredicate,
    path: impl AsRef<Path>,
    format: OutputFormat,
) -> Result<(), ChatlensError> {
    match format {
        #[cfg(feature = "json-output")]
        OutputFormat::Json => {
            crate::core::output::write_json(&crate::core::output::Report::new(chat, analytics), path)
        }
        #[cfg(feature = "csv-output")]
        OutputFormat::Csv => crate::core::output::write_csv(
            crate::core::filter::apply_filter(&chat.messages, &chat.calls, predicate).messages,
            path,
        ),
        #[allow(unreachable_patterns)]
        _ => Err(missing_feature(format)),
    }
}

/// Renders results to a string in the given format.
#[allow(unused_variables)]
pub fn to_format_string(
    chat: &ParsedChat,
    analytics: &ProcessedAnalytics,
    predicate: &FilterPredicate,
    format: OutputFormat,
) -> Result<String, ChatlensError> {
    match format {
        #[cfg(feature = "json-output")]
        OutputFormat::Json => {
            crate::core::output::to_json(&crate::core::output::Report::new(chat, analytics))
        }
        #[cfg(feature = "csv-output")]
        OutputFormat::Csv => crate::core::output::to_csv(
            crate::core::filter::apply_filter(&chat.messages, &chat.calls, predicate).messages,
        ),
        #[allow(unreachable_patterns)]
        _ => Err(missing_feature(format)),
    }
}

#[allow(dead_code)]
fn missing_feature(format: OutputFormat) -> ChatlensError {
    let feature = match format {
        OutputFormat::Json => "json-output",
        OutputFormat::Csv => "csv-output",
    };
    ChatlensError::invalid_format(
        "output",
        format!("Output format {format:?} requires the '{feature}' feature to be enabled"),
    )
}
