//! # Chatlens
//!
//! A Rust library for turning chat export transcripts into typed entities
//! and conversation analytics.
//!
//! ## Overview
//!
//! The pipeline has three stages:
//! - **Parsing**: a tolerant line-oriented parser detects the timestamp
//!   dialect, joins multi-line messages and recognizes call events
//! - **Aggregation**: a pure function computes [`ProcessedAnalytics`](analytics::ProcessedAnalytics)
//!   (volume, time patterns, emoji, words, response times, calls)
//! - **Filtered re-aggregation**: the same aggregation over a subset
//!   selected by date, sender, keyword and entry type
//!
//! ## Quick Start
//!
//! ```rust
//! use chatlens::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let text = "\
//! [01/01/2024, 09:00:00] Alice: Good morning 😀
//! [01/01/2024, 09:05:00] Bob: Morning!
//! [01/01/2024, 23:00:00] Alice: Night";
//!
//!     let chat = LogParser::new().parse_str(text)?;
//!     let analytics = analyze(&chat, &AnalyticsConfig::default())?;
//!     assert_eq!(analytics.response_metrics.conversation_count, 2);
//!
//!     let bob_only = FilterPredicate::new().with_sender("Bob");
//!     let filtered = analyze_filtered(&chat, &bob_only, &AnalyticsConfig::default())?;
//!     assert_eq!(filtered.message_stats.total_messages, 1);
//!     Ok(())
//! }
//! ```
//!
//! ## Off-thread Work
//!
//! [`worker`] runs parsing and filtered re-aggregation on tokio's blocking
//! pool. [`FilterWorker`](worker::FilterWorker) serves rapid, superseding
//! filter changes and only surfaces the newest answer.
//!
//! ## Module Structure
//!
//! - [`parser`] - [`LogParser`](parser::LogParser) and the event-emitting parse loop
//! - [`parsing`] - Timestamp dialects, call events, content inspection
//! - [`analytics`] - [`analyze`](analytics::analyze) and the analytics sections
//! - [`core`] - Entity [`models`], [`filter`](core::filter), [`output`](core::output)
//! - [`channel`] - [`ParseEvent`](channel::ParseEvent), [`FilterResponse`](channel::FilterResponse)
//! - [`worker`] - tokio execution
//! - [`config`] - [`ParserConfig`](config::ParserConfig), [`AnalyticsConfig`](config::AnalyticsConfig)
//! - [`progress`] - Progress reporting
//! - [`format`] - Output format selection
//! - [`error`] - [`ChatlensError`], [`Result`]

pub mod analytics;
pub mod channel;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod format;
pub mod parser;
pub mod parsing;
pub mod progress;
pub mod worker;

pub use core::models;
pub use error::{ChatlensError, Result};

/// Convenient re-exports for common usage.
///
/// ```rust
/// use chatlens::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{ChatlensError, Result};

    pub use crate::config::{AnalyticsConfig, ParserConfig};

    pub use crate::core::models::{
        Call, CallKind, CallStatus, ChatMetadata, ChatType, Message, MessageKind, ParsedChat,
        Participant,
    };

    pub use crate::parser::LogParser;

    pub use crate::analytics::{Analyzer, ProcessedAnalytics, analyze};

    pub use crate::core::filter::{EntryType, FilterPredicate, analyze_filtered};

    pub use crate::channel::{FilterResponse, ParseEvent, RequestId};
    pub use crate::worker::{FilterWorker, filter_and_analyze, parse_async};

    pub use crate::progress::{Progress, ProgressCallback};

    pub use crate::format::OutputFormat;

    #[cfg(feature = "csv-output")]
    pub use crate::core::output::{to_csv, write_csv};
    #[cfg(feature = "json-output")]
    pub use crate::core::output::{Report, to_json, write_json};
}
