//! Typed entities produced by the parser.
//!
//! - [`Message`] - one chat message (possibly multi-line)
//! - [`Call`] - one voice or video call event
//! - [`Participant`] - per-sender tallies derived from messages
//! - [`ChatMetadata`] - export-level facts (counts, date range, chat type)
//! - [`ParsedChat`] - the full entity set handed to the aggregator
//!
//! Entities are immutable once parsed. All types serialize with camelCase
//! field names.
//!
//! # Example
//!
//! ```rust
//! use chatlens::core::models::{Message, MessageKind};
//! use chrono::{TimeZone, Utc};
//!
//! let dt = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
//! let msg = Message::new(0, "Alice", "hi 😀", dt);
//!
//! assert_eq!(msg.kind, MessageKind::Text);
//! assert_eq!(msg.timestamp, dt.timestamp_millis());
//! assert_eq!(msg.metadata.emojis, vec!["😀"]);
//! ```

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ChatlensError;
use crate::parsing::content;

/// Message content type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Text,
    Media,
}

/// Kind of media behind a placeholder like `image omitted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
    Audio,
    Sticker,
    Gif,
    Document,
    /// Generic placeholder that doesn't name the media type
    Other,
}

/// Per-message facts derived from the content at parse time.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageMetadata {
    pub has_emoji: bool,
    pub has_url: bool,
    pub word_count: usize,
    pub char_count: usize,
    pub emojis: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub media_kind: Option<MediaKind>,
}

/// A parsed chat message.
///
/// `timestamp` is `datetime` in epoch milliseconds; both are kept because
/// presentation code keys on either.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Position in the transcript, in parse order.
    pub id: u64,
    pub datetime: DateTime<Utc>,
    pub timestamp: i64,
    pub sender: String,
    /// Text content. Continuation lines are joined with `\n`.
    pub content: String,
    #[serde(rename = "type")]
    pub kind: MessageKind,
    pub metadata: MessageMetadata,
}

impl Message {
    /// Creates a message, deriving kind and metadata from the content.
    pub fn new(
        id: u64,
        sender: impl Into<String>,
        content: impl Into<String>,
        datetime: DateTime<Utc>,
    ) -> Self {
        let content = content.into();
        let metadata = content::inspect(&content);
        let kind = if metadata.media_kind.is_some() {
            MessageKind::Media
        } else {
            MessageKind::Text
        };

        Self {
            id,
            datetime,
            timestamp: datetime.timestamp_millis(),
            sender: sender.into(),
            content,
            kind,
            metadata,
        }
    }

    /// Returns `true` for media placeholders.
    pub fn is_media(&self) -> bool {
        self.kind == MessageKind::Media
    }
}

/// Call type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallKind {
    Voice,
    Video,
}

/// How a call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallStatus {
    Completed,
    Missed,
    Declined,
}

/// A voice or video call event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Call {
    pub initiator: String,
    #[serde(rename = "type")]
    pub kind: CallKind,
    pub status: CallStatus,
    /// Length in minutes; 0 unless the call completed.
    pub duration: f64,
    pub timestamp: i64,
    pub datetime: DateTime<Utc>,
}

impl Call {
    /// Creates a call. The duration is dropped unless `status` is completed.
    pub fn new(
        initiator: impl Into<String>,
        kind: CallKind,
        status: CallStatus,
        duration_secs: u64,
        datetime: DateTime<Utc>,
    ) -> Self {
        let duration = if status == CallStatus::Completed {
            duration_secs as f64 / 60.0
        } else {
            0.0
        };

        Self {
            initiator: initiator.into(),
            kind,
            status,
            duration,
            timestamp: datetime.timestamp_millis(),
            datetime,
        }
    }
}

/// Per-sender tallies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub name: String,
    pub message_count: usize,
    pub media_count: usize,
    pub first_message: DateTime<Utc>,
    pub last_message: DateTime<Utc>,
}

/// Whether the chat is one-to-one or a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatType {
    Individual,
    Group,
}

/// Inclusive datetime span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    /// A range covering a single instant.
    pub fn at(instant: DateTime<Utc>) -> Self {
        Self {
            start: instant,
            end: instant,
        }
    }

    /// Widens the range to include `instant`.
    pub fn extend(&mut self, instant: DateTime<Utc>) {
        self.start = self.start.min(instant);
        self.end = self.end.max(instant);
    }

    /// Returns `true` if `instant` lies within the range, bounds included.
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant <= self.end
    }
}

/// Export-level facts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMetadata {
    /// When the transcript was parsed.
    pub export_date: DateTime<Utc>,
    pub total_messages: usize,
    pub total_calls: usize,
    pub date_range: DateRange,
    pub chat_type: ChatType,
}

/// Incremental builder for participants and metadata.
///
/// Fed one entity at a time by the streaming parser, so metadata can be
/// produced without holding every message.
#[derive(Debug, Default, Clone)]
pub struct EntityTally {
    participants: BTreeMap<String, Participant>,
    range: Option<DateRange>,
    messages: usize,
    calls: usize,
}

impl EntityTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a message.
    pub fn add_message(&mut self, msg: &Message) {
        self.messages += 1;
        self.extend_range(msg.datetime);

        let entry = self
            .participants
            .entry(msg.sender.clone())
            .or_insert_with(|| Participant {
                name: msg.sender.clone(),
                message_count: 0,
                media_count: 0,
                first_message: msg.datetime,
                last_message: msg.datetime,
            });
        entry.message_count += 1;
        if msg.is_media() {
            entry.media_count += 1;
        }
        entry.first_message = entry.first_message.min(msg.datetime);
        entry.last_message = entry.last_message.max(msg.datetime);
    }

    /// Records a call.
    pub fn add_call(&mut self, call: &Call) {
        self.calls += 1;
        self.extend_range(call.datetime);
    }

    fn extend_range(&mut self, instant: DateTime<Utc>) {
        match self.range.as_mut() {
            Some(range) => range.extend(instant),
            None => self.range = Some(DateRange::at(instant)),
        }
    }

    /// Number of entities recorded so far.
    pub fn entity_count(&self) -> usize {
        self.messages + self.calls
    }

    /// Produces participants (sorted by name) and metadata.
    ///
    /// # Errors
    ///
    /// Returns the "no messages found" parse error when nothing was recorded.
    pub fn finish(
        self,
        group_threshold: usize,
    ) -> Result<(Vec<Participant>, ChatMetadata), ChatlensError> {
        let date_range = self.range.ok_or_else(ChatlensError::no_messages)?;
        let chat_type = if self.participants.len() > group_threshold {
            ChatType::Group
        } else {
            ChatType::Individual
        };

        let metadata = ChatMetadata {
            export_date: Utc::now(),
            total_messages: self.messages,
            total_calls: self.calls,
            date_range,
            chat_type,
        };

        Ok((self.participants.into_values().collect(), metadata))
    }
}

/// The full entity set of one transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedChat {
    /// Ascending by timestamp.
    pub messages: Vec<Message>,
    /// Ascending by timestamp.
    pub calls: Vec<Call>,
    pub participants: Vec<Participant>,
    pub metadata: ChatMetadata,
}

impl ParsedChat {
    /// Builds a chat from loose entities, sorting them and deriving
    /// participants and metadata.
    ///
    /// ```rust
    /// use chatlens::core::models::{ChatType, Message, ParsedChat};
    /// use chrono::{TimeZone, Utc};
    ///
    /// let t = |h| Utc.with_ymd_and_hms(2024, 1, 1, h, 0, 0).unwrap();
    /// let chat = ParsedChat::from_entities(
    ///     vec![Message::new(0, "Alice", "hi", t(9)), Message::new(1, "Bob", "yo", t(8))],
    ///     vec![],
    ///     2,
    /// )?;
    /// assert_eq!(chat.messages[0].sender, "Bob");
    /// assert_eq!(chat.metadata.chat_type, ChatType::Individual);
    /// # Ok::<(), chatlens::ChatlensError>(())
    /// ```
    pub fn from_entities(
        mut messages: Vec<Message>,
        mut calls: Vec<Call>,
        group_threshold: usize,
    ) -> Result<Self, ChatlensError> {
        let mut tally = EntityTally::new();
        messages.iter().for_each(|m| tally.add_message(m));
        calls.iter().for_each(|c| tally.add_call(c));
        let (participants, metadata) = tally.finish(group_threshold)?;

        sort_entities(&mut messages, &mut calls);

        Ok(Self {
            messages,
            calls,
            participants,
            metadata,
        })
    }

    /// Returns the distinct senders, sorted.
    pub fn senders(&self) -> Vec<&str> {
        self.participants.iter().map(|p| p.name.as_str()).collect()
    }
}

/// Stable sort of both entity lists by timestamp.
pub(crate) fn sort_entities(messages: &mut [Message], calls: &mut [Call]) {
    if !messages.is_sorted_by_key(|m| m.timestamp) {
        messages.sort_by_key(|m| m.timestamp);
    }
    if !calls.is_sorted_by_key(|c| c.timestamp) {
        calls.sort_by_key(|c| c.timestamp);
    }
}
