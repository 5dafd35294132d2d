//! Statistical summary of a set of entities.
//!
//! [`analyze`] is a pure function: identical entities and configuration
//! always produce an identical [`ProcessedAnalytics`], and every map in it
//! is ordered so serialized output is byte-stable.
//!
//! - [`MessageStats`] - volume and length
//! - [`TimePatterns`] - hourly, weekly, daily and monthly activity
//! - [`EmojiAnalysis`] - emoji usage
//! - [`WordFrequency`] - word ranking
//! - [`ResponseMetrics`] - reply latency, conversations, bursts
//! - [`CallAnalytics`] - call outcomes and durations
//!
//! # Example
//!
//! ```rust
//! use chatlens::analytics::analyze;
//! use chatlens::config::AnalyticsConfig;
//! use chatlens::parser::LogParser;
//!
//! let text = "\
//! [01/01/2024, 09:00:00] Alice: Morning 😀
//! [01/01/2024, 09:05:00] Bob: Morning!";
//!
//! let chat = LogParser::new().parse_str(text)?;
//! let analytics = analyze(&chat, &AnalyticsConfig::default())?;
//! assert_eq!(analytics.message_stats.total_messages, 2);
//! assert_eq!(analytics.emoji_analysis.total_emojis, 1);
//! # Ok::<(), chatlens::ChatlensError>(())
//! ```

mod calls;
mod emoji;
mod messages;
mod ranking;
mod response;
mod time;
mod words;

pub use calls::CallAnalytics;
pub use emoji::EmojiAnalysis;
pub use messages::{LengthSummary, MessageStats};
pub use ranking::{FrequencyCounter, RankedEntry};
pub use response::ResponseMetrics;
pub use time::TimePatterns;
pub use words::{WordFrequency, tokenize};

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::AnalyticsConfig;
use crate::core::models::{Call, Message, ParsedChat};
use crate::error::{ChatlensError, Result};

/// The full statistical summary. Every section is always present; an empty
/// input yields zeroed sections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedAnalytics {
    pub message_stats: MessageStats,
    pub time_patterns: TimePatterns,
    pub emoji_analysis: EmojiAnalysis,
    pub word_frequency: WordFrequency,
    pub response_metrics: ResponseMetrics,
    pub call_analytics: CallAnalytics,
}

/// Computes [`ProcessedAnalytics`] over entity slices.
#[derive(Debug, Clone, Default)]
pub struct Analyzer {
    config: AnalyticsConfig,
}

impl Analyzer {
    pub fn new(config: AnalyticsConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    /// Aggregates owned slices.
    pub fn analyze(&self, messages: &[Message], calls: &[Call]) -> Result<ProcessedAnalytics> {
        let messages: Vec<&Message> = messages.iter().collect();
        let calls: Vec<&Call> = calls.iter().collect();
        self.analyze_refs(messages, &calls)
    }

    /// Aggregates a borrowed subset, as produced by filtering.
    ///
    /// Messages need not be sorted; they are ordered by timestamp (stable)
    /// before the order-dependent metrics run.
    ///
    /// # Errors
    ///
    /// Returns [`ChatlensError::DataIntegrity`] if a message has an empty
    /// sender.
    pub fn analyze_refs(
        &self,
        mut messages: Vec<&Message>,
        calls: &[&Call],
    ) -> Result<ProcessedAnalytics> {
        if let Some(bad) = messages.iter().find(|m| m.sender.trim().is_empty()) {
            return Err(ChatlensError::data_integrity(format!(
                "message {} has an empty sender",
                bad.id
            )));
        }

        if !messages.is_sorted_by_key(|m| m.timestamp) {
            messages.sort_by_key(|m| m.timestamp);
        }

        let senders: BTreeSet<&str> = messages.iter().map(|m| m.sender.as_str()).collect();
        let senders: Vec<&str> = senders.into_iter().collect();

        debug!(
            messages = messages.len(),
            calls = calls.len(),
            senders = senders.len(),
            "aggregating analytics"
        );

        Ok(ProcessedAnalytics {
            message_stats: messages::message_stats(&messages, &senders),
            time_patterns: time::time_patterns(
                &messages,
                &senders,
                self.config.trend_window_days,
            ),
            emoji_analysis: emoji::emoji_analysis(&messages, &senders, self.config.top_emojis),
            word_frequency: words::word_frequency(&messages, &self.config),
            response_metrics: response::response_metrics(&messages, &senders, &self.config),
            call_analytics: calls::call_analytics(calls),
        })
    }
}

/// Computes the full analytics of a parsed chat.
pub fn analyze(chat: &ParsedChat, config: &AnalyticsConfig) -> Result<ProcessedAnalytics> {
    Analyzer::new(config.clone()).analyze(&chat.messages, &chat.calls)
}
