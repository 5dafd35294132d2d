//! Message types exchanged between the caller and background work.
//!
//! Two closed protocols:
//! - Parsing: zero or more [`ParseEvent::Chunk`] / [`ParseEvent::Progress`]
//!   events, then exactly one [`ParseEvent::Complete`] or
//!   [`ParseEvent::Error`]. [`ParseCollector`] accumulates the stream and
//!   settles once.
//! - Filtering: one [`FilterRequest`] yields exactly one [`FilterResponse`],
//!   correlated by [`RequestId`]. [`LatestWins`] decides which response is
//!   authoritative.

use std::fmt;

use tracing::warn;

use crate::analytics::ProcessedAnalytics;
use crate::core::filter::FilterPredicate;
use crate::core::models::{Call, ChatMetadata, Message, ParsedChat, Participant, sort_entities};
use crate::error::{ChatlensError, Result};
use crate::progress::Progress;

/// One event on the parse stream.
#[derive(Debug)]
pub enum ParseEvent {
    /// Entities finalized during one batch, in transcript order.
    Chunk {
        messages: Vec<Message>,
        calls: Vec<Call>,
    },
    /// Share of the input consumed so far.
    Progress(Progress),
    /// Terminal success: derived participants and metadata.
    Complete {
        participants: Vec<Participant>,
        metadata: ChatMetadata,
    },
    /// Terminal failure.
    Error(ChatlensError),
}

impl ParseEvent {
    /// Returns `true` for `Complete` and `Error`.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ParseEvent::Complete { .. } | ParseEvent::Error(_))
    }
}

/// Accumulates a parse stream into a [`ParsedChat`].
///
/// # Example
///
/// ```rust
/// use chatlens::channel::ParseCollector;
/// use chatlens::parser::LogParser;
///
/// let text = "[15/01/2024, 10:30:00] Alice: Hello\n";
/// let mut collector = ParseCollector::new();
/// let mut outcome = None;
/// LogParser::new().parse_events(text, |event| {
///     if let Some(result) = collector.push(event) {
///         outcome = Some(result);
///     }
/// });
/// let chat = outcome.unwrap()?;
/// assert_eq!(chat.messages.len(), 1);
/// # Ok::<(), chatlens::ChatlensError>(())
/// ```
#[derive(Debug, Default)]
pub struct ParseCollector {
    messages: Vec<Message>,
    calls: Vec<Call>,
    last_progress: Option<Progress>,
    settled: bool,
}

impl ParseCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one event.
    ///
    /// Returns `Some` exactly once, when the terminal event arrives. Events
    /// after settlement are ignored.
    pub fn push(&mut self, event: ParseEvent) -> Option<Result<ParsedChat>> {
        if self.settled {
            warn!("parse event received after the stream settled");
            return None;
        }

        match event {
            ParseEvent::Chunk { messages, calls } => {
                self.messages.extend(messages);
                self.calls.extend(calls);
                None
            }
            ParseEvent::Progress(progress) => {
                self.last_progress = Some(progress);
                None
            }
            ParseEvent::Complete {
                participants,
                metadata,
            } => {
                self.settled = true;
                let mut messages = std::mem::take(&mut self.messages);
                let mut calls = std::mem::take(&mut self.calls);
                sort_entities(&mut messages, &mut calls);
                Some(Ok(ParsedChat {
                    messages,
                    calls,
                    participants,
                    metadata,
                }))
            }
            ParseEvent::Error(error) => {
                self.settled = true;
                self.messages.clear();
                self.calls.clear();
                Some(Err(error))
            }
        }
    }

    /// Drains a complete event sequence.
    ///
    /// A sequence that ends without a terminal event is a channel failure.
    pub fn collect<I>(events: I) -> Result<ParsedChat>
    where
        I: IntoIterator<Item = ParseEvent>,
    {
        let mut collector = Self::new();
        events
            .into_iter()
            .find_map(|event| collector.push(event))
            .unwrap_or_else(|| {
                Err(ChatlensError::channel(
                    "parse stream ended without a terminal event",
                ))
            })
    }

    /// Last progress snapshot seen.
    pub fn last_progress(&self) -> Option<Progress> {
        self.last_progress
    }

    /// Whether a terminal event has been received.
    pub fn is_settled(&self) -> bool {
        self.settled
    }
}

/// Correlates a filter request with its response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(pub u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A filtered re-aggregation request.
#[derive(Debug, Clone)]
pub struct FilterRequest {
    pub id: RequestId,
    pub predicate: FilterPredicate,
}

/// The single response to a [`FilterRequest`].
#[derive(Debug)]
pub enum FilterResponse {
    Result {
        id: RequestId,
        analytics: Box<ProcessedAnalytics>,
    },
    Error {
        id: RequestId,
        error: ChatlensError,
    },
}

impl FilterResponse {
    /// The id of the request this answers.
    pub fn id(&self) -> RequestId {
        match self {
            FilterResponse::Result { id, .. } | FilterResponse::Error { id, .. } => *id,
        }
    }

    /// Converts into a plain result.
    pub fn into_result(self) -> Result<ProcessedAnalytics> {
        match self {
            FilterResponse::Result { analytics, .. } => Ok(*analytics),
            FilterResponse::Error { error, .. } => Err(error),
        }
    }
}

/// Issues monotonically increasing ids and tracks which one is current.
///
/// ```rust
/// use chatlens::channel::LatestWins;
///
/// let mut tracker = LatestWins::new();
/// let first = tracker.issue();
/// let second = tracker.issue();
/// assert!(!tracker.accept(first));
/// assert!(tracker.accept(second));
/// ```
#[derive(Debug, Default)]
pub struct LatestWins {
    next: u64,
    latest: Option<RequestId>,
}

impl LatestWins {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a new id, superseding every earlier one.
    pub fn issue(&mut self) -> RequestId {
        let id = RequestId(self.next);
        self.next += 1;
        self.latest = Some(id);
        id
    }

    /// Most recently issued id.
    pub fn latest(&self) -> Option<RequestId> {
        self.latest
    }

    /// Returns `true` if a response for `id` should be shown.
    pub fn accept(&self, id: RequestId) -> bool {
        self.latest == Some(id)
    }
}
