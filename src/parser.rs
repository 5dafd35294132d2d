//! The transcript parser.
//!
//! [`LogParser`] turns a raw export into typed entities with a small line
//! state machine:
//!
//! - `AwaitingEntry`: no entry open. Lines that aren't headers are dropped.
//! - `AccumulatingEntry`: a message is open. Non-header lines are appended
//!   to it with a `\n` separator.
//!
//! A header line always finalizes the open entry first. A header whose
//! content is a call phrase becomes a [`Call`] right away and the machine
//! returns to `AwaitingEntry`.
//!
//! Input is processed in batches of [`ParserConfig::batch_size`] lines.
//! Every batch emits a [`ParseEvent::Chunk`] (when it produced entities) and
//! a [`ParseEvent::Progress`]; the stream ends with exactly one
//! [`ParseEvent::Complete`] or [`ParseEvent::Error`].
//!
//! # Example
//!
//! ```rust
//! use chatlens::parser::LogParser;
//!
//! let text = "\
//! [15/01/2024, 10:30:00] Alice: Hello
//! [15/01/2024, 10:31:00] Bob: Hi!
//! how are you?
//! [15/01/2024, 10:40:00] Alice: Voice call, 3 min";
//!
//! let chat = LogParser::new().parse_str(text)?;
//! assert_eq!(chat.messages.len(), 2);
//! assert_eq!(chat.messages[1].content, "Hi!\nhow are you?");
//! assert_eq!(chat.calls.len(), 1);
//! # Ok::<(), chatlens::ChatlensError>(())
//! ```

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use regex::Regex;
use tracing::{debug, info, trace};

use crate::channel::{ParseCollector, ParseEvent};
use crate::config::ParserConfig;
use crate::core::models::{Call, EntityTally, Message, ParsedChat};
use crate::error::{ChatlensError, Result};
use crate::parsing::{
    DateFormat, detect_format, is_system_message, parse_call_event, parse_timestamp,
    strip_invisible,
};
use crate::progress::{Progress, ProgressCallback};

/// Parses chat transcripts into [`ParsedChat`].
#[derive(Debug, Clone, Default)]
pub struct LogParser {
    config: ParserConfig,
}

impl LogParser {
    /// Creates a parser with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a parser with custom configuration.
    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Returns the parser's configuration.
    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parses a complete transcript.
    ///
    /// # Errors
    ///
    /// Fails with "no messages found" when no entry could be recognized.
    pub fn parse_str(&self, text: &str) -> Result<ParsedChat> {
        self.parse_with_progress(text, None)
    }

    /// Parses a complete transcript, reporting progress after every batch.
    pub fn parse_with_progress(
        &self,
        text: &str,
        on_progress: Option<&ProgressCallback>,
    ) -> Result<ParsedChat> {
        let mut collector = ParseCollector::new();
        let mut outcome = None;

        self.parse_events(text, |event| {
            if let (ParseEvent::Progress(progress), Some(callback)) = (&event, on_progress) {
                callback(*progress);
            }
            if let Some(result) = collector.push(event) {
                outcome = Some(result);
            }
        });

        outcome.unwrap_or_else(|| {
            Err(ChatlensError::channel(
                "parse stream ended without a terminal event",
            ))
        })
    }

    /// Reads and parses a transcript file.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<ParsedChat> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        self.parse_str(&text).map_err(|e| e.with_path(path))
    }

    /// Runs the state machine, handing every event to `emit`.
    ///
    /// Exactly one terminal event is emitted, always last.
    pub fn parse_events<F>(&self, text: &str, mut emit: F)
    where
        F: FnMut(ParseEvent),
    {
        info!(bytes = text.len(), "parsing transcript");

        let sample = text.lines().filter(|line| !line.trim().is_empty());
        let Some(format) = detect_format(sample, self.config.detect_sample_lines) else {
            debug!("no header dialect matched");
            emit(ParseEvent::Error(ChatlensError::no_messages()));
            return;
        };
        debug!(?format, "detected header dialect");

        let mut run = match ParseRun::new(&self.config, format, text.len() as u64) {
            Ok(run) => run,
            Err(e) => {
                emit(ParseEvent::Error(e));
                return;
            }
        };

        let batch_size = self.config.batch_size.max(1);
        let mut lines_in_batch = 0usize;

        for line in text.split_inclusive('\n') {
            run.step(line);
            lines_in_batch += 1;
            if lines_in_batch == batch_size {
                run.emit_chunk(&mut emit);
                run.emit_progress(&mut emit);
                lines_in_batch = 0;
            }
        }

        run.finalize_pending();
        run.emit_chunk(&mut emit);
        if lines_in_batch > 0 {
            run.emit_progress(&mut emit);
        }

        match run.tally.finish(self.config.group_threshold) {
            Ok((participants, metadata)) => {
                info!(
                    messages = metadata.total_messages,
                    calls = metadata.total_calls,
                    participants = participants.len(),
                    "parsed transcript"
                );
                emit(ParseEvent::Complete {
                    participants,
                    metadata,
                });
            }
            Err(e) => emit(ParseEvent::Error(e)),
        }
    }
}

/// Parses a transcript with the given configuration.
///
/// Shorthand for [`LogParser::with_config`] + [`LogParser::parse_with_progress`].
pub fn parse(
    text: &str,
    config: &ParserConfig,
    on_progress: Option<&ProgressCallback>,
) -> Result<ParsedChat> {
    LogParser::with_config(config.clone()).parse_with_progress(text, on_progress)
}

/// A message whose continuation lines may still follow.
#[derive(Debug)]
struct PendingEntry {
    datetime: DateTime<Utc>,
    sender: String,
    content: String,
}

#[derive(Debug)]
enum EntryState {
    AwaitingEntry,
    AccumulatingEntry(PendingEntry),
}

/// Mutable state of one parse.
struct ParseRun<'a> {
    config: &'a ParserConfig,
    format: DateFormat,
    header: Regex,
    prefix: Regex,
    state: EntryState,
    next_id: u64,
    bytes_consumed: u64,
    total_bytes: u64,
    chunk_messages: Vec<Message>,
    chunk_calls: Vec<Call>,
    tally: EntityTally,
}

impl<'a> ParseRun<'a> {
    fn new(config: &'a ParserConfig, format: DateFormat, total_bytes: u64) -> Result<Self> {
        Ok(Self {
            config,
            format,
            header: format.compile()?,
            prefix: format.compile_prefix()?,
            state: EntryState::AwaitingEntry,
            next_id: 0,
            bytes_consumed: 0,
            total_bytes,
            chunk_messages: Vec::new(),
            chunk_calls: Vec::new(),
            tally: EntityTally::new(),
        })
    }

    fn step(&mut self, raw: &str) {
        self.bytes_consumed += raw.len() as u64;
        let line = strip_invisible(raw.trim_end_matches(['\n', '\r']));

        if let Some(caps) = self.header.captures(&line) {
            self.finalize_pending();

            let date = caps.get(1).map_or("", |m| m.as_str());
            let time = caps.get(2).map_or("", |m| m.as_str());
            let sender = caps.get(3).map_or("", |m| m.as_str().trim());
            let content = caps.get(4).map_or("", |m| m.as_str());

            let Some(datetime) = parse_timestamp(date, time, self.format) else {
                trace!(line = %line, "dropping header with malformed datetime");
                return;
            };

            if self.config.skip_system_messages && is_system_message(sender, content) {
                trace!(sender, "skipping system line");
                return;
            }

            if let Some(event) = parse_call_event(content) {
                let call = Call::new(
                    sender,
                    event.kind,
                    event.status,
                    event.duration_secs,
                    datetime,
                );
                self.tally.add_call(&call);
                self.chunk_calls.push(call);
                return;
            }

            self.state = EntryState::AccumulatingEntry(PendingEntry {
                datetime,
                sender: sender.to_string(),
                content: content.to_string(),
            });
            return;
        }

        if self.prefix.is_match(&line) {
            // Timestamped notice without a sender ("Alice added Bob")
            self.finalize_pending();
            trace!(line = %line, "skipping sender-less notice");
            return;
        }

        match &mut self.state {
            EntryState::AccumulatingEntry(pending) => {
                pending.content.push('\n');
                pending.content.push_str(&line);
            }
            EntryState::AwaitingEntry => {
                if !line.trim().is_empty() {
                    trace!(line = %line, "discarding line outside any entry");
                }
            }
        }
    }

    /// Closes the open entry, if any, and queues it as a message.
    fn finalize_pending(&mut self) {
        let EntryState::AccumulatingEntry(pending) =
            std::mem::replace(&mut self.state, EntryState::AwaitingEntry)
        else {
            return;
        };

        let content = pending.content.trim_end();
        if content.trim().is_empty() {
            trace!(sender = %pending.sender, "dropping empty message");
            return;
        }

        let message = Message::new(self.next_id, pending.sender, content, pending.datetime);
        self.next_id += 1;
        self.tally.add_message(&message);
        self.chunk_messages.push(message);
    }

    /// Emits the entities finalized since the last chunk, if any.
    fn emit_chunk<F: FnMut(ParseEvent)>(&mut self, emit: &mut F) {
        if self.chunk_messages.is_empty() && self.chunk_calls.is_empty() {
            return;
        }
        emit(ParseEvent::Chunk {
            messages: std::mem::take(&mut self.chunk_messages),
            calls: std::mem::take(&mut self.chunk_calls),
        });
    }

    fn emit_progress<F: FnMut(ParseEvent)>(&self, emit: &mut F) {
        emit(ParseEvent::Progress(Progress::new(
            self.bytes_consumed,
            self.total_bytes,
            self.tally.entity_count(),
        )));
    }
}
