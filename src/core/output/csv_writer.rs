//! CSV output writer.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::core::models::{Call, Message};
use crate::error::{ChatlensError, Result};

const MESSAGE_HEADER: [&str; 8] = [
    "ID", "Timestamp", "Sender", "Type", "Content", "Words", "Chars", "Emojis",
];
const CALL_HEADER: [&str; 5] = ["Timestamp", "Initiator", "Type", "Status", "DurationMinutes"];
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Writes messages to CSV with semicolon delimiter.
///
/// # Format
/// - Delimiter: `;`
/// - Columns: `ID`, `Timestamp`, `Sender`, `Type`, `Content`, `Words`, `Chars`, `Emojis`
/// - Multi-line content is quoted, emojis are joined without separator
/// - Encoding: UTF-8
pub fn write_csv<'a, I>(messages: I, output_path: impl AsRef<Path>) -> Result<()>
where
    I: IntoIterator<Item = &'a Message>,
{
    let csv = to_csv(messages)?;
    let mut file = File::create(output_path)?;
    file.write_all(csv.as_bytes())?;
    Ok(())
}

/// Converts messages to a CSV string.
pub fn to_csv<'a, I>(messages: I) -> Result<String>
where
    I: IntoIterator<Item = &'a Message>,
{
    let mut writer = new_writer();
    writer.write_record(MESSAGE_HEADER)?;

    for msg in messages {
        let kind = if msg.is_media() { "media" } else { "text" };
        writer.write_record([
            msg.id.to_string(),
            msg.datetime.format(TIMESTAMP_FORMAT).to_string(),
            msg.sender.clone(),
            kind.to_string(),
            msg.content.clone(),
            msg.metadata.word_count.to_string(),
            msg.metadata.char_count.to_string(),
            msg.metadata.emojis.concat(),
        ])?;
    }

    finish(writer)
}

/// Converts calls to a CSV string.
pub fn calls_to_csv<'a, I>(calls: I) -> Result<String>
where
    I: IntoIterator<Item = &'a Call>,
{
    let mut writer = new_writer();
    writer.write_record(CALL_HEADER)?;

    for call in calls {
        writer.write_record([
            call.datetime.format(TIMESTAMP_FORMAT).to_string(),
            call.initiator.clone(),
            format!("{:?}", call.kind).to_lowercase(),
            format!("{:?}", call.status).to_lowercase(),
            call.duration.to_string(),
        ])?;
    }

    finish(writer)
}

fn new_writer() -> csv::Writer<Vec<u8>> {
    csv::WriterBuilder::new()
        .delimiter(b';')
        .from_writer(Vec::new())
}

fn finish(writer: csv::Writer<Vec<u8>>) -> Result<String> {
    let bytes = writer
        .into_inner()
        .map_err(|e| ChatlensError::Io(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| ChatlensError::invalid_format("csv", e.to_string()))
}
