//! Shared line-level parsing utilities.
//!
//! This module contains the pieces the [`LogParser`](crate::parser::LogParser)
//! state machine is built from:
//! - [`formats`] - header dialects and auto-detection
//! - [`calls`] - call-event phrase recognition
//! - [`content`] - emoji, URL and media placeholder inspection

pub mod calls;
pub mod content;
pub mod formats;

pub use calls::{CallEvent, parse_call_event};
pub use content::{detect_media, extract_emojis, has_url, inspect, strip_invisible};
pub use formats::{DateFormat, detect_format, is_system_message, parse_timestamp};
