//! Transcript header dialects and their detection.
//!
//! Exports vary by locale and platform. Each [`DateFormat`] describes one
//! "timestamp + sender + content" header shape; the dialect of a transcript
//! is picked by scoring sample lines against every shape.

use std::sync::LazyLock;

use chrono::{DateTime, Datelike, NaiveDateTime, Utc};
use regex::Regex;

use crate::error::ChatlensError;

/// Detected header dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFormat {
    /// Bracketed EU with slashes, 24h clock
    /// Example: [15/01/2024, 10:30:45] Sender: Message
    EuSlashBracketed,
    /// US format: M/D/YY or M/D/YYYY with optional AM/PM
    /// Example: [1/15/24, 10:30:45 AM] Sender: Message
    US,
    /// EU format with dots in brackets: DD.MM.YY or DD.MM.YYYY
    /// Example: [15.01.24, 10:30:45] Sender: Message
    EuDotBracketed,
    /// EU format with dots, no brackets
    /// Example: 26.10.2025, 20:40 - Sender: Message
    EuDotNoBracket,
    /// EU format with slashes, no brackets
    /// Example: 15/01/2024, 10:30 - Sender: Message
    EuSlash,
}

impl DateFormat {
    /// Returns the header regex for this dialect.
    ///
    /// Capture groups: 1 = date, 2 = time, 3 = sender, 4 = content.
    pub fn pattern(self) -> &'static str {
        match self {
            DateFormat::EuSlashBracketed => {
                r"^\[(\d{2}/\d{2}/\d{2,4}),\s(\d{2}:\d{2}(?::\d{2})?)\]\s([^:]+):\s?(.*)"
            }
            DateFormat::US => {
                r"^\[(\d{1,2}/\d{1,2}/\d{2,4}),\s(\d{1,2}:\d{2}(?::\d{2})?(?:\s?[APap][Mm])?)\]\s([^:]+):\s?(.*)"
            }
            DateFormat::EuDotBracketed => {
                r"^\[(\d{2}\.\d{2}\.\d{2,4}),\s(\d{2}:\d{2}(?::\d{2})?)\]\s([^:]+):\s?(.*)"
            }
            DateFormat::EuDotNoBracket => {
                r"^(\d{2}\.\d{2}\.\d{2,4}),\s(\d{2}:\d{2}(?::\d{2})?)\s-\s([^:]+):\s?(.*)"
            }
            DateFormat::EuSlash => {
                r"^(\d{2}/\d{2}/\d{2,4}),\s(\d{2}:\d{2}(?::\d{2})?)\s-\s([^:]+):\s?(.*)"
            }
        }
    }

    /// Returns the regex for the bare timestamp that opens every line of
    /// this dialect, including sender-less system notices.
    pub fn prefix_pattern(self) -> &'static str {
        match self {
            DateFormat::EuSlashBracketed => r"^\[\d{2}/\d{2}/\d{2,4},\s\d{2}:\d{2}(?::\d{2})?\]\s",
            DateFormat::US => {
                r"^\[\d{1,2}/\d{1,2}/\d{2,4},\s\d{1,2}:\d{2}(?::\d{2})?(?:\s?[APap][Mm])?\]\s"
            }
            DateFormat::EuDotBracketed => r"^\[\d{2}\.\d{2}\.\d{2,4},\s\d{2}:\d{2}(?::\d{2})?\]\s",
            DateFormat::EuDotNoBracket => r"^\d{2}\.\d{2}\.\d{2,4},\s\d{2}:\d{2}(?::\d{2})?\s-\s",
            DateFormat::EuSlash => r"^\d{2}/\d{2}/\d{2,4},\s\d{2}:\d{2}(?::\d{2})?\s-\s",
        }
    }

    /// Returns date parsing format strings for chrono.
    pub fn date_parse_formats(self) -> &'static [&'static str] {
        match self {
            DateFormat::US => &[
                "%m/%d/%y, %I:%M:%S %p",
                "%m/%d/%y, %I:%M %p",
                "%m/%d/%Y, %I:%M:%S %p",
                "%m/%d/%Y, %I:%M %p",
                "%m/%d/%y, %H:%M:%S",
                "%m/%d/%y, %H:%M",
                "%m/%d/%Y, %H:%M:%S",
                "%m/%d/%Y, %H:%M",
            ],
            DateFormat::EuDotBracketed | DateFormat::EuDotNoBracket => &[
                "%d.%m.%y, %H:%M:%S",
                "%d.%m.%y, %H:%M",
                "%d.%m.%Y, %H:%M:%S",
                "%d.%m.%Y, %H:%M",
            ],
            DateFormat::EuSlash | DateFormat::EuSlashBracketed => &[
                "%d/%m/%y, %H:%M:%S",
                "%d/%m/%y, %H:%M",
                "%d/%m/%Y, %H:%M:%S",
                "%d/%m/%Y, %H:%M",
            ],
        }
    }

    /// Returns all dialects, in tie-breaking order.
    pub fn all() -> &'static [DateFormat] {
        &[
            DateFormat::EuSlashBracketed,
            DateFormat::US,
            DateFormat::EuDotBracketed,
            DateFormat::EuDotNoBracket,
            DateFormat::EuSlash,
        ]
    }

    /// Compiles the header regex.
    pub fn compile(self) -> Result<Regex, ChatlensError> {
        Regex::new(self.pattern()).map_err(|e| ChatlensError::pattern(e.to_string()))
    }

    /// Compiles the bare timestamp regex.
    pub fn compile_prefix(self) -> Result<Regex, ChatlensError> {
        Regex::new(self.prefix_pattern()).map_err(|e| ChatlensError::pattern(e.to_string()))
    }
}

/// Years outside this range are typos, not real timestamps.
const PLAUSIBLE_YEARS: std::ops::RangeInclusive<i32> = 1970..=2100;

/// Parse timestamp from date and time strings.
///
/// Two-digit years are read by `%y` first, so `24` becomes 2024 rather
/// than year 24. Years outside 1970..=2100 are rejected.
pub fn parse_timestamp(date_str: &str, time_str: &str, format: DateFormat) -> Option<DateTime<Utc>> {
    let datetime_str = format!("{date_str}, {}", time_str.to_uppercase());
    let two_digit_year = date_str
        .rsplit(['/', '.'])
        .next()
        .is_some_and(|y| y.len() == 2);

    format
        .date_parse_formats()
        .iter()
        .filter(|f| f.contains("%y") == two_digit_year)
        .find_map(|f| NaiveDateTime::parse_from_str(&datetime_str, f).ok())
        .filter(|naive| PLAUSIBLE_YEARS.contains(&naive.year()))
        .map(|naive| naive.and_utc())
}

/// Membership notices in English: `Alice added Bob`, `You removed Bob`,
/// `added Charlie`, `left`. The whole content must have that shape, so
/// "Left the keys on the table" stays a user message.
static MEMBERSHIP_EN_RE: LazyLock<Regex> = LazyLock::new(|| {
    let name = r"(?:[Yy]ou|\p{Lu}[\p{L}\p{M}'.\-]+(?: \p{Lu}[\p{L}\p{M}'.\-]+)*|\+[\d ]+\d)";
    Regex::new(&format!(
        r"^(?:(?:{name} )?(?:added|removed) {name}(?:(?:, | and ){name})*|(?:{name} )?left)$"
    ))
    .unwrap()
});

/// Russian counterpart: `Алиса добавил(а) Боба`, `Вы вышли`.
static MEMBERSHIP_RU_RE: LazyLock<Regex> = LazyLock::new(|| {
    let name = r"(?:\p{Lu}[\p{L}\p{M}'.\-]+(?: \p{Lu}[\p{L}\p{M}'.\-]+)*|\+[\d ]+\d)";
    Regex::new(&format!(
        r"^(?:{name} )?(?:(?:добавил|удалил)(?:\(а\)|а|и)? {name}(?:(?:, | и ){name})*|(?:вышел|вышла|вышли|покинул|покинула|покинули)(?:\(а\))?(?: из группы)?)$"
    ))
    .unwrap()
});

/// Check if a header line is a vendor system message rather than a user one.
///
/// System messages include: encryption notice, group created, user added/left.
pub fn is_system_message(sender: &str, content: &str) -> bool {
    const SYSTEM_INDICATORS_EN: &[&str] = &[
        "messages and calls are end-to-end encrypted",
        "created group",
        "changed the subject",
        "changed this group's icon",
        "changed the group description",
        "deleted this group's icon",
        "changed their phone number",
        "joined using this group's invite link",
        "security code changed",
        "you're now an admin",
        "is now an admin",
        "turned on disappearing messages",
        "turned off disappearing messages",
    ];

    // Case-sensitive for Cyrillic
    const SYSTEM_INDICATORS_RU: &[&str] = &[
        "Сообщения и звонки защищены сквозным шифрованием",
        "создал(а) группу",
        "изменил тему",
        "изменил номер телефона",
        "присоединился по ссылке",
        "код безопасности изменён",
        "теперь администратор",
    ];

    let content = content.trim();
    let content_lower = content.to_lowercase();
    let sender_lower = sender.to_lowercase();

    SYSTEM_INDICATORS_EN.iter().any(|i| content_lower.contains(i))
        || SYSTEM_INDICATORS_RU.iter().any(|i| content.contains(i))
        || MEMBERSHIP_EN_RE.is_match(content)
        || MEMBERSHIP_RU_RE.is_match(content)
        || sender.trim().is_empty()
        || sender_lower == "whatsapp"
        || sender_lower == "system"
}

/// Auto-detect the dialect by scoring sample lines.
///
/// A line scores for a dialect only when its header regex matches *and* the
/// captured timestamp parses, which separates `15/01/2024` (day first) from
/// `1/15/24` (month first). Scanning stops after `sample` lines matched any
/// dialect, so long preambles of noise are tolerated. Returns `None` if no
/// line matches any dialect.
pub fn detect_format<'a, I>(lines: I, sample: usize) -> Option<DateFormat>
where
    I: IntoIterator<Item = &'a str>,
{
    let detectors: Vec<(DateFormat, Regex)> = DateFormat::all()
        .iter()
        .filter_map(|&f| f.compile().ok().map(|re| (f, re)))
        .collect();

    let mut scores = vec![0usize; detectors.len()];
    let mut sampled = 0usize;

    for raw in lines {
        let line = super::content::strip_invisible(raw);
        let mut matched_any = false;
        for (i, (format, regex)) in detectors.iter().enumerate() {
            if let Some(caps) = regex.captures(&line) {
                matched_any = true;
                let date = caps.get(1).map_or("", |m| m.as_str());
                let time = caps.get(2).map_or("", |m| m.as_str());
                if parse_timestamp(date, time, *format).is_some() {
                    scores[i] += 1;
                }
            }
        }
        if matched_any {
            sampled += 1;
            if sampled >= sample {
                break;
            }
        }
    }

    // Find the winner (highest score, earliest on ties)
    let max_score = *scores.iter().max()?;
    if max_score == 0 {
        return None;
    }

    let winner_idx = scores.iter().position(|&s| s == max_score)?;
    Some(detectors[winner_idx].0)
}
