//! Message volume and length statistics.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::models::{MediaKind, Message};

/// Mean and median length of one sender's text messages, in characters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LengthSummary {
    pub mean: f64,
    pub median: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageStats {
    pub total_messages: usize,
    pub messages_per_sender: BTreeMap<String, usize>,
    pub media_per_sender: BTreeMap<String, usize>,
    /// Mean characters per text message.
    pub average_message_length: f64,
    /// Words across text messages.
    pub total_words: usize,
    /// Characters across text messages.
    pub total_characters: usize,
    pub media_by_kind: BTreeMap<MediaKind, usize>,
    pub length_by_sender: BTreeMap<String, LengthSummary>,
}

pub(crate) fn message_stats(messages: &[&Message], senders: &[&str]) -> MessageStats {
    let mut stats = MessageStats {
        total_messages: messages.len(),
        ..MessageStats::default()
    };

    let mut lengths: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for &sender in senders {
        stats.messages_per_sender.insert(sender.to_string(), 0);
        stats.media_per_sender.insert(sender.to_string(), 0);
        lengths.insert(sender, Vec::new());
    }

    let mut text_messages = 0usize;
    for msg in messages {
        *stats
            .messages_per_sender
            .entry(msg.sender.clone())
            .or_default() += 1;

        if let Some(kind) = msg.metadata.media_kind {
            *stats.media_per_sender.entry(msg.sender.clone()).or_default() += 1;
            *stats.media_by_kind.entry(kind).or_default() += 1;
            continue;
        }

        text_messages += 1;
        stats.total_words += msg.metadata.word_count;
        stats.total_characters += msg.metadata.char_count;
        lengths
            .entry(msg.sender.as_str())
            .or_default()
            .push(msg.metadata.char_count);
    }

    stats.average_message_length = mean(stats.total_characters, text_messages);
    stats.length_by_sender = lengths
        .into_iter()
        .map(|(sender, mut values)| (sender.to_string(), summarize(&mut values)))
        .collect();

    stats
}

pub(crate) fn mean(sum: usize, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        sum as f64 / count as f64
    }
}

fn summarize(values: &mut [usize]) -> LengthSummary {
    if values.is_empty() {
        return LengthSummary::default();
    }
    values.sort_unstable();
    let mid = values.len() / 2;
    let median = if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) as f64 / 2.0
    } else {
        values[mid] as f64
    };

    LengthSummary {
        mean: mean(values.iter().sum(), values.len()),
        median,
    }
}
