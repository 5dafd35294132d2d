//! Configuration types for the parser and the aggregator.
//!
//! This module provides clean configuration structs for library usage,
//! without any CLI framework dependencies. Every tunable constant the
//! pipeline relies on (conversation gap, burst window, group threshold,
//! top-K sizes) lives here with a documented default.
//!
//! - [`ParserConfig`] - transcript parsing and streaming settings
//! - [`AnalyticsConfig`] - aggregation thresholds and ranking sizes
//!
//! # Example
//!
//! ```rust
//! use chatlens::config::{AnalyticsConfig, ParserConfig};
//!
//! let parser = ParserConfig::new().with_batch_size(1_000);
//! let analytics = AnalyticsConfig::new()
//!     .with_conversation_gap_minutes(120)
//!     .with_top_words(25);
//! assert_eq!(analytics.top_words, 25);
//! ```

use serde::{Deserialize, Serialize};

/// Configuration for transcript parsing.
///
/// # Example
///
/// ```rust
/// use chatlens::config::ParserConfig;
///
/// let config = ParserConfig::new()
///     .with_skip_system_messages(false)
///     .with_group_threshold(3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ParserConfig {
    /// Number of lines processed per streamed batch (default: 5000)
    pub batch_size: usize,

    /// Number of header-looking lines sampled for dialect detection (default: 20)
    pub detect_sample_lines: usize,

    /// Skip vendor system lines (encryption notice, member joins) (default: true)
    pub skip_system_messages: bool,

    /// A chat is a group when its distinct sender count exceeds this (default: 2)
    pub group_threshold: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            batch_size: 5_000,
            detect_sample_lines: 20,
            skip_system_messages: true,
            group_threshold: 2,
        }
    }
}

impl ParserConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of lines per streamed batch. Zero is treated as one.
    #[must_use]
    pub fn with_batch_size(mut self, lines: usize) -> Self {
        self.batch_size = lines.max(1);
        self
    }

    /// Sets how many matching lines are sampled for dialect detection.
    #[must_use]
    pub fn with_detect_sample_lines(mut self, lines: usize) -> Self {
        self.detect_sample_lines = lines.max(1);
        self
    }

    /// Sets whether to skip system messages.
    #[must_use]
    pub fn with_skip_system_messages(mut self, skip: bool) -> Self {
        self.skip_system_messages = skip;
        self
    }

    /// Sets the distinct-sender threshold above which a chat is a group.
    #[must_use]
    pub fn with_group_threshold(mut self, threshold: usize) -> Self {
        self.group_threshold = threshold;
        self
    }
}

/// Words ignored by the word-frequency aggregate unless overridden.
///
/// A short English + Spanish list; the exports this tool grew up on were
/// bilingual.
pub const DEFAULT_STOPWORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "but", "by", "for", "if", "in", "is", "it", "of",
    "on", "or", "so", "that", "the", "to", "was", "with", "i", "you", "me", "my", "we", "de",
    "la", "que", "el", "en", "y", "los", "se", "del", "las", "un", "por", "con", "no", "una",
    "su", "para", "es", "al", "lo", "como", "mas", "pero", "sus", "le", "ya", "o",
];

/// Configuration for the analytics aggregator.
///
/// All thresholds are explicit so the aggregate stays a pure function of
/// `(entities, config)`.
///
/// # Example
///
/// ```rust
/// use chatlens::config::AnalyticsConfig;
///
/// let config = AnalyticsConfig::new()
///     .with_burst_window_secs(60)
///     .with_stopwords(Vec::<String>::new());
/// assert!(config.stopwords.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnalyticsConfig {
    /// A message whose gap from the previous one exceeds this starts a
    /// new conversation (default: 60)
    pub conversation_gap_minutes: u32,

    /// Maximum gap between consecutive same-sender messages in a burst (default: 120)
    pub burst_window_secs: u32,

    /// Number of entries in `topEmojis` (default: 10)
    pub top_emojis: usize,

    /// Number of entries in `topWords` (default: 20)
    pub top_words: usize,

    /// Maximum number of words in the word cloud, 0 = unlimited (default: 100)
    pub word_cloud_limit: usize,

    /// Shortest token counted as a word, in characters (default: 1)
    pub min_word_length: usize,

    /// Lowercase words excluded from word frequency
    pub stopwords: Vec<String>,

    /// Window of the centered moving average over daily totals (default: 7)
    pub trend_window_days: usize,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            conversation_gap_minutes: 60,
            burst_window_secs: 120,
            top_emojis: 10,
            top_words: 20,
            word_cloud_limit: 100,
            min_word_length: 1,
            stopwords: DEFAULT_STOPWORDS.iter().map(|w| (*w).to_string()).collect(),
            trend_window_days: 7,
        }
    }
}

impl AnalyticsConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a configuration from JSON. Missing fields take their defaults.
    ///
    /// ```rust
    /// use chatlens::config::AnalyticsConfig;
    ///
    /// let config = AnalyticsConfig::from_json(r#"{"conversationGapMinutes": 30}"#)?;
    /// assert_eq!(config.conversation_gap_minutes, 30);
    /// assert_eq!(config.top_emojis, 10);
    /// # Ok::<(), chatlens::ChatlensError>(())
    /// ```
    #[cfg(feature = "json-output")]
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Sets the conversation-boundary gap.
    #[must_use]
    pub fn with_conversation_gap_minutes(mut self, minutes: u32) -> Self {
        self.conversation_gap_minutes = minutes;
        self
    }

    /// Sets the burst window.
    #[must_use]
    pub fn with_burst_window_secs(mut self, secs: u32) -> Self {
        self.burst_window_secs = secs;
        self
    }

    /// Sets the number of top emojis reported.
    #[must_use]
    pub fn with_top_emojis(mut self, k: usize) -> Self {
        self.top_emojis = k;
        self
    }

    /// Sets the number of top words reported.
    #[must_use]
    pub fn with_top_words(mut self, k: usize) -> Self {
        self.top_words = k;
        self
    }

    /// Sets the word cloud size limit (0 = unlimited).
    #[must_use]
    pub fn with_word_cloud_limit(mut self, limit: usize) -> Self {
        self.word_cloud_limit = limit;
        self
    }

    /// Sets the minimum word length.
    #[must_use]
    pub fn with_min_word_length(mut self, chars: usize) -> Self {
        self.min_word_length = chars;
        self
    }

    /// Replaces the stopword list. Words are lowercased.
    #[must_use]
    pub fn with_stopwords<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.stopwords = words
            .into_iter()
            .map(|w| w.as_ref().to_lowercase())
            .collect();
        self
    }

    /// Sets the moving-average window for the daily trend. Zero is treated as one.
    #[must_use]
    pub fn with_trend_window_days(mut self, days: usize) -> Self {
        self.trend_window_days = days.max(1);
        self
    }

    /// Conversation gap in milliseconds.
    pub(crate) fn conversation_gap_ms(&self) -> i64 {
        i64::from(self.conversation_gap_minutes) * 60_000
    }

    /// Burst window in milliseconds.
    pub(crate) fn burst_window_ms(&self) -> i64 {
        i64::from(self.burst_window_secs) * 1_000
    }
}
