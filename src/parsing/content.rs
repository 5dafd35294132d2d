//! Message content inspection: emojis, URLs, media placeholders, counts.

use std::sync::LazyLock;

use regex::Regex;

use crate::core::models::{MediaKind, MessageMetadata};

/// Single emoji: flag pair, or pictograph with optional modifier and ZWJ chain.
static EMOJI_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"[\x{1F1E6}-\x{1F1FF}]{2}|\p{Extended_Pictographic}(?:\x{FE0F}|[\x{1F3FB}-\x{1F3FF}])*(?:\x{200D}\p{Extended_Pictographic}(?:\x{FE0F}|[\x{1F3FB}-\x{1F3FF}])*)*",
    )
    .unwrap()
});

/// iOS placeholders; documents may be prefixed by the file name, e.g.
/// `report.pdf • 3 pages document omitted`.
static PLACEHOLDER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:(image|video|audio|sticker|gif)|(?:.+\s)?document)\s+omitted$").unwrap()
});

static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:https?://|www\.)\S+").unwrap());

/// Invisible characters vendors sprinkle into exports.
const INVISIBLE: &[char] = &['\u{200E}', '\u{200F}', '\u{FEFF}', '\u{202A}', '\u{202C}'];

/// Removes direction marks and BOMs, and normalizes exotic spaces
/// (narrow no-break space before AM/PM on newer iOS exports).
pub fn strip_invisible(line: &str) -> String {
    line.chars()
        .filter(|c| !INVISIBLE.contains(c))
        .map(|c| match c {
            '\u{202F}' | '\u{00A0}' => ' ',
            other => other,
        })
        .collect()
}

/// Extracts every emoji sequence in order of appearance.
pub fn extract_emojis(content: &str) -> Vec<String> {
    EMOJI_RE
        .find_iter(content)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Returns `true` if the content contains a link.
pub fn has_url(content: &str) -> bool {
    URL_RE.is_match(content)
}

/// Classifies a media placeholder, returning `None` for ordinary text.
///
/// Recognizes Android (`<Media omitted>`), iOS (`image omitted`,
/// `<attached: 00000012-PHOTO-...jpg>`) and Russian placeholders.
pub fn detect_media(content: &str) -> Option<MediaKind> {
    let lower = content.trim().to_lowercase();

    if lower.starts_with("<attached:") && lower.ends_with('>') {
        return Some(attachment_kind(&lower["<attached:".len()..]));
    }
    if lower == "<media omitted>" || lower == "<без медиафайлов>" {
        return Some(MediaKind::Other);
    }

    let caps = PLACEHOLDER_RE.captures(&lower)?;
    let kind = match caps.get(1).map_or("document", |m| m.as_str()) {
        "image" => MediaKind::Image,
        "video" => MediaKind::Video,
        "audio" => MediaKind::Audio,
        "sticker" => MediaKind::Sticker,
        "gif" => MediaKind::Gif,
        _ => MediaKind::Document,
    };
    Some(kind)
}

fn attachment_kind(name: &str) -> MediaKind {
    if name.contains("photo") || name.ends_with(".jpg>") || name.ends_with(".png>") {
        MediaKind::Image
    } else if name.contains("video") || name.ends_with(".mp4>") {
        MediaKind::Video
    } else if name.contains("audio") || name.ends_with(".opus>") {
        MediaKind::Audio
    } else if name.contains("sticker") || name.ends_with(".webp>") {
        MediaKind::Sticker
    } else if name.contains("gif") {
        MediaKind::Gif
    } else {
        MediaKind::Document
    }
}

/// Derives the per-message metadata block from its content.
pub fn inspect(content: &str) -> MessageMetadata {
    let emojis = extract_emojis(content);
    MessageMetadata {
        has_emoji: !emojis.is_empty(),
        has_url: has_url(content),
        word_count: content.split_whitespace().count(),
        char_count: content.chars().count(),
        emojis,
        media_kind: detect_media(content),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_simple_emojis() {
        assert_eq!(extract_emojis("hi 😀 there 🔥🔥"), vec!["😀", "🔥", "🔥"]);
    }

    #[test]
    fn test_extract_compound_emojis() {
        let emojis = extract_emojis("❤️ 👍🏽 👨‍👩‍👧 🇪🇸");
        assert_eq!(emojis, vec!["❤️", "👍🏽", "👨‍👩‍👧", "🇪🇸"]);
    }

    #[test]
    fn test_digits_are_not_emojis() {
        assert!(extract_emojis("call me at 555 #1").is_empty());
    }

    #[test]
    fn test_has_url() {
        assert!(has_url("look https://example.com/x"));
        assert!(has_url("www.example.org"));
        assert!(!has_url("no links here"));
    }

    #[test]
    fn test_detect_media() {
        assert_eq!(detect_media("<Media omitted>"), Some(MediaKind::Other));
        assert_eq!(detect_media("image omitted"), Some(MediaKind::Image));
        assert_eq!(detect_media("sticker omitted"), Some(MediaKind::Sticker));
        assert_eq!(detect_media("GIF omitted"), Some(MediaKind::Gif));
        assert_eq!(
            detect_media("<attached: 00000012-PHOTO-2024-01-15-10-30-00.jpg>"),
            Some(MediaKind::Image)
        );
        assert_eq!(detect_media("<Без медиафайлов>"), Some(MediaKind::Other));
        assert_eq!(detect_media("I omitted nothing"), None);
        assert_eq!(
            detect_media("report.pdf • 3 pages document omitted"),
            Some(MediaKind::Document)
        );
        assert_eq!(detect_media("hello"), None);
    }

    #[test]
    fn test_strip_invisible() {
        assert_eq!(strip_invisible("\u{200E}[1/15/24]"), "[1/15/24]");
        assert_eq!(strip_invisible("10:30\u{202F}AM"), "10:30 AM");
    }

    #[test]
    fn test_inspect_counts() {
        let meta = inspect("Hola 😀 mundo https://x.io");
        assert!(meta.has_emoji);
        assert!(meta.has_url);
        assert_eq!(meta.word_count, 4);
        assert_eq!(meta.char_count, 25);
        assert_eq!(meta.emojis, vec!["😀"]);
        assert!(meta.media_kind.is_none());
    }

    #[test]
    fn test_prose_mentioning_placeholders_is_text() {
        assert_eq!(detect_media("the video omitted the ending"), None);
        assert_eq!(detect_media("they omitted page 3 of the pdf"), None);
        assert_eq!(detect_media("see <Media omitted> above"), None);
        assert_eq!(detect_media("<attached: is how it shows up"), None);
    }
}
