//! Output writers.
//!
//! - [`write_json`] / [`to_json`] - the analysis [`Report`] as pretty JSON - requires `json-output` feature
//! - [`write_csv`] / [`to_csv`] - one row per message, semicolon delimited - requires `csv-output` feature
//! - [`calls_to_csv`] - one row per call - requires `csv-output` feature
//!
//! # Example
//!
//! ```rust,no_run
//! # #[cfg(all(feature = "csv-output", feature = "json-output"))]
//! # fn main() -> chatlens::Result<()> {
//! use chatlens::analytics::analyze;
//! use chatlens::config::AnalyticsConfig;
//! use chatlens::core::output::{Report, to_csv, write_json};
//! use chatlens::parser::LogParser;
//!
//! let chat = LogParser::new().parse_file("chat.txt")?;
//! let analytics = analyze(&chat, &AnalyticsConfig::default())?;
//!
//! write_json(&Report::new(&chat, &analytics), "report.json")?;
//! let csv_string = to_csv(&chat.messages)?;
//! # Ok(())
//! # }
//! # #[cfg(not(all(feature = "csv-output", feature = "json-output")))]
//! # fn main() {}
//! ```

#[cfg(feature = "csv-output")]
mod csv_writer;
#[cfg(feature = "json-output")]
mod json_writer;

#[cfg(feature = "csv-output")]
pub use csv_writer::{calls_to_csv, to_csv, write_csv};
#[cfg(feature = "json-output")]
pub use json_writer::{to_json, write_json};

use serde::Serialize;

use crate::analytics::ProcessedAnalytics;
use crate::core::models::{ChatMetadata, ParsedChat, Participant};

/// Top-level JSON document: `{metadata, participants, analytics}`.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Report<'a> {
    pub metadata: &'a ChatMetadata,
    pub participants: &'a [Participant],
    pub analytics: &'a ProcessedAnalytics,
}

impl<'a> Report<'a> {
    pub fn new(chat: &'a ParsedChat, analytics: &'a ProcessedAnalytics) -> Self {
        Self {
            metadata: &chat.metadata,
            participants: &chat.participants,
            analytics,
        }
    }
}
