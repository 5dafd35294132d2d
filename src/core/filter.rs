//! Filter entities by type, sender, date range and keyword.
//!
//! This module provides [`FilterPredicate`] for defining filter criteria,
//! [`apply_filter`] for selecting the matching subset, and
//! [`analyze_filtered`] for re-running the aggregation over it.
//!
//! # Filter Types
//!
//! | Filter | Method | Description |
//! |--------|--------|-------------|
//! | Types | [`with_types`](FilterPredicate::with_types) | Text, media and/or calls (empty = all) |
//! | Sender | [`with_sender`](FilterPredicate::with_sender) | Messages by sender, calls by initiator |
//! | Date from | [`with_date_from`](FilterPredicate::with_date_from) | Entities on or after date |
//! | Date to | [`with_date_to`](FilterPredicate::with_date_to) | Entities on or before date |
//! | Keyword | [`with_keyword`](FilterPredicate::with_keyword) | Case-insensitive substring of message content |
//!
//! # Examples
//!
//! ```
//! use chatlens::core::filter::{FilterPredicate, apply_filter};
//! use chatlens::core::models::Message;
//! use chrono::{TimeZone, Utc};
//!
//! # fn main() -> chatlens::Result<()> {
//! let at = |m| Utc.with_ymd_and_hms(2024, 6, 15, 12, m, 0).unwrap();
//! let messages = vec![
//!     Message::new(0, "Alice", "Hello", at(0)),
//!     Message::new(1, "Bob", "Hi there", at(1)),
//!     Message::new(2, "Alice", "How are you?", at(2)),
//! ];
//!
//! let predicate = FilterPredicate::new()
//!     .with_sender("Alice")
//!     .with_date_from("2024-06-01")?;
//! let view = apply_filter(&messages, &[], &predicate);
//!
//! assert_eq!(view.messages.len(), 2);
//! # Ok(())
//! # }
//! ```
//!
//! # Behavior Notes
//!
//! - Filters are applied in order: type, sender, date, keyword
//! - Sender matching is exact
//! - Calls carry no text, so the keyword filter never removes them
//! - Date bounds are inclusive

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::analytics::{Analyzer, ProcessedAnalytics};
use crate::config::AnalyticsConfig;
use crate::core::models::{Call, Message, MessageKind, ParsedChat};
use crate::error::{ChatlensError, Result};

/// Entity type selectable by a filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    Text,
    Media,
    Call,
}

impl EntryType {
    pub fn all() -> &'static [EntryType] {
        &[EntryType::Text, EntryType::Media, EntryType::Call]
    }
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryType::Text => write!(f, "text"),
            EntryType::Media => write!(f, "media"),
            EntryType::Call => write!(f, "call"),
        }
    }
}

impl FromStr for EntryType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" => Ok(EntryType::Text),
            "media" => Ok(EntryType::Media),
            "call" | "calls" => Ok(EntryType::Call),
            other => Err(format!(
                "Unknown entry type: '{}'. Expected one of: text, media, call",
                other
            )),
        }
    }
}

impl From<MessageKind> for EntryType {
    fn from(kind: MessageKind) -> Self {
        match kind {
            MessageKind::Text => EntryType::Text,
            MessageKind::Media => EntryType::Media,
        }
    }
}

/// Criteria for selecting a subset of entities.
///
/// The default predicate selects everything.
///
/// # Examples
///
/// ```
/// use chatlens::core::filter::{EntryType, FilterPredicate};
///
/// # fn main() -> chatlens::Result<()> {
/// let predicate = FilterPredicate::new()
///     .with_date_from("2024-01-01")?
///     .with_date_to("2024-12-31")?
///     .with_keyword("pizza")
///     .with_types([EntryType::Text]);
/// assert!(predicate.is_active());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FilterPredicate {
    /// Include only entities at or after this instant.
    pub after: Option<DateTime<Utc>>,

    /// Include only entities at or before this instant.
    pub before: Option<DateTime<Utc>>,

    /// Include only these senders (empty = all).
    pub selected_senders: BTreeSet<String>,

    /// Case-insensitive substring of message content (empty = all).
    pub search_keyword: String,

    /// Include only these entity types (empty = all).
    pub message_types: BTreeSet<EntryType>,
}

impl FilterPredicate {
    /// Creates a predicate that selects everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the start date (inclusive, start of day UTC). Format: `YYYY-MM-DD`.
    ///
    /// # Errors
    ///
    /// Returns [`ChatlensError::InvalidDate`] if the format is invalid.
    pub fn with_date_from(mut self, date_str: &str) -> Result<Self> {
        self.after = Some(parse_day(date_str)?.and_time(NaiveTime::MIN).and_utc());
        Ok(self)
    }

    /// Sets the end date (inclusive, end of day UTC). Format: `YYYY-MM-DD`.
    ///
    /// # Errors
    ///
    /// Returns [`ChatlensError::InvalidDate`] if the format is invalid.
    pub fn with_date_to(mut self, date_str: &str) -> Result<Self> {
        let start = parse_day(date_str)?.and_time(NaiveTime::MIN).and_utc();
        self.before = Some(start + Duration::days(1) - Duration::milliseconds(1));
        Ok(self)
    }

    /// Sets both bounds directly.
    #[must_use]
    pub fn with_date_range(mut self, after: DateTime<Utc>, before: DateTime<Utc>) -> Self {
        self.after = Some(after);
        self.before = Some(before);
        self
    }

    /// Adds a sender to the selection.
    #[must_use]
    pub fn with_sender(mut self, sender: impl Into<String>) -> Self {
        self.selected_senders.insert(sender.into());
        self
    }

    /// Sets the keyword.
    #[must_use]
    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.search_keyword = keyword.into();
        self
    }

    /// Replaces the type selection.
    #[must_use]
    pub fn with_types(mut self, types: impl IntoIterator<Item = EntryType>) -> Self {
        self.message_types = types.into_iter().collect();
        self
    }

    /// Returns `true` if any filter is active.
    pub fn is_active(&self) -> bool {
        self.after.is_some()
            || self.before.is_some()
            || !self.selected_senders.is_empty()
            || !self.search_keyword.is_empty()
            || !self.message_types.is_empty()
    }

    fn includes_type(&self, entry: EntryType) -> bool {
        self.message_types.is_empty() || self.message_types.contains(&entry)
    }

    fn includes_sender(&self, sender: &str) -> bool {
        self.selected_senders.is_empty() || self.selected_senders.contains(sender)
    }

    fn includes_instant(&self, at: DateTime<Utc>) -> bool {
        self.after.is_none_or(|after| at >= after) && self.before.is_none_or(|before| at <= before)
    }

    /// Returns `true` if the message passes every filter.
    pub fn matches_message(&self, msg: &Message, keyword_lower: &str) -> bool {
        self.includes_type(msg.kind.into())
            && self.includes_sender(&msg.sender)
            && self.includes_instant(msg.datetime)
            && (keyword_lower.is_empty() || msg.content.to_lowercase().contains(keyword_lower))
    }

    /// Returns `true` if the call passes the type, sender and date filters.
    pub fn matches_call(&self, call: &Call) -> bool {
        self.includes_type(EntryType::Call)
            && self.includes_sender(&call.initiator)
            && self.includes_instant(call.datetime)
    }
}

fn parse_day(date_str: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .map_err(|_| ChatlensError::invalid_date(date_str))
}

/// The entities selected by a predicate, in input order.
#[derive(Debug, Clone, Default)]
pub struct FilteredView<'a> {
    pub messages: Vec<&'a Message>,
    pub calls: Vec<&'a Call>,
}

/// Selects the entities matching `predicate`.
pub fn apply_filter<'a>(
    messages: &'a [Message],
    calls: &'a [Call],
    predicate: &FilterPredicate,
) -> FilteredView<'a> {
    let keyword = predicate.search_keyword.to_lowercase();

    FilteredView {
        messages: messages
            .iter()
            .filter(|m| predicate.matches_message(m, &keyword))
            .collect(),
        calls: calls.iter().filter(|c| predicate.matches_call(c)).collect(),
    }
}

/// Filters a chat and aggregates the subset.
///
/// An empty subset is not an error; it produces zeroed analytics. With the
/// default predicate the result equals [`analyze`](crate::analytics::analyze).
pub fn analyze_filtered(
    chat: &ParsedChat,
    predicate: &FilterPredicate,
    config: &AnalyticsConfig,
) -> Result<ProcessedAnalytics> {
    let view = apply_filter(&chat.messages, &chat.calls, predicate);
    Analyzer::new(config.clone()).analyze_refs(view.messages, &view.calls)
}
