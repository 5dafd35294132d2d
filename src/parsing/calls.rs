//! Recognition of call-event phrases.
//!
//! Exports record calls as ordinary header lines whose content is a fixed
//! phrase, e.g. `Voice call, 12 min`, `Missed video call`, or
//! `Video call • 1:02:05`. A content string only counts as a call event when
//! the phrase opens the content and is followed by nothing or a separator,
//! so "let's do a video call later" stays a text message.

use std::sync::LazyLock;

use regex::Regex;

use crate::core::models::{CallKind, CallStatus};

static CALL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?:(missed|declined|rejected|incoming|outgoing|group)\s+)?(voice|video|audio)\s+call(?:\s*$|\s*[,.•·\-–]\s*(.*)$)",
    )
    .unwrap()
});

static CLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{1,2}):(\d{2})(?::(\d{2}))?\b").unwrap());

static UNIT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+)\s*(hours?|hrs?|h|minutes?|mins?|m|seconds?|secs?|s)\b").unwrap()
});

/// A recognized call phrase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallEvent {
    pub kind: CallKind,
    pub status: CallStatus,
    /// Call length in seconds; zero unless completed.
    pub duration_secs: u64,
}

/// Parses a call-event phrase. Returns `None` for anything else.
///
/// A bare `No answer` line is an unanswered voice call.
pub fn parse_call_event(content: &str) -> Option<CallEvent> {
    let content = content.trim();
    if content.eq_ignore_ascii_case("no answer") {
        return Some(CallEvent {
            kind: CallKind::Voice,
            status: CallStatus::Missed,
            duration_secs: 0,
        });
    }

    let caps = CALL_RE.captures(content)?;

    let prefix = caps.get(1).map(|m| m.as_str().to_lowercase());
    let kind = match caps.get(2).map(|m| m.as_str().to_lowercase()).as_deref() {
        Some("video") => CallKind::Video,
        _ => CallKind::Voice,
    };
    let tail = caps.get(3).map_or("", |m| m.as_str()).to_lowercase();

    let status = match prefix.as_deref() {
        Some("missed") => CallStatus::Missed,
        Some("declined" | "rejected") => CallStatus::Declined,
        _ if tail.contains("declined") || tail.contains("rejected") => CallStatus::Declined,
        _ if tail.contains("no answer")
            || tail.contains("missed")
            || tail.contains("tap to call back") =>
        {
            CallStatus::Missed
        }
        _ => CallStatus::Completed,
    };

    let duration_secs = if status == CallStatus::Completed {
        parse_duration_secs(&tail)
    } else {
        0
    };

    Some(CallEvent {
        kind,
        status,
        duration_secs,
    })
}

/// Parses `1:02:05`, `2:05`, `1 hr 5 min`, `12 min`, `125 sec` into seconds.
///
/// A duration that overflows `u64` is treated as unparseable and yields 0.
fn parse_duration_secs(text: &str) -> u64 {
    if let Some(caps) = CLOCK_RE.captures(text) {
        let parts: Vec<u64> = (1..=3)
            .filter_map(|i| caps.get(i))
            .filter_map(|m| m.as_str().parse().ok())
            .collect();
        let secs = match parts.as_slice() {
            [h, m, s] => h
                .checked_mul(3600)
                .and_then(|h| h.checked_add(m.checked_mul(60)?))
                .and_then(|hm| hm.checked_add(*s)),
            [m, s] => m.checked_mul(60).and_then(|m| m.checked_add(*s)),
            _ => None,
        };
        return secs.unwrap_or(0);
    }

    UNIT_RE
        .captures_iter(text)
        .try_fold(0u64, |total, caps| {
            // Digits too long for u64 fail here as well
            let value: u64 = caps.get(1)?.as_str().parse().ok()?;
            let unit = caps.get(2)?.as_str().to_lowercase();
            let factor = match unit.chars().next()? {
                'h' => 3600,
                'm' => 60,
                _ => 1,
            };
            total.checked_add(value.checked_mul(factor)?)
        })
        .unwrap_or(0)
}
