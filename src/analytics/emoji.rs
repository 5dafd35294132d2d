//! Emoji usage.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::ranking::{FrequencyCounter, RankedEntry};
use crate::core::models::Message;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmojiAnalysis {
    pub total_emojis: usize,
    pub unique_emojis: usize,
    pub emoji_frequency: BTreeMap<String, usize>,
    /// Emoji occurrences per sender.
    pub emojis_per_sender: BTreeMap<String, usize>,
    pub top_emojis: Vec<RankedEntry>,
}

pub(crate) fn emoji_analysis(messages: &[&Message], senders: &[&str], top: usize) -> EmojiAnalysis {
    let mut counter = FrequencyCounter::new();
    let mut per_sender: BTreeMap<String, usize> =
        senders.iter().map(|s| (s.to_string(), 0)).collect();

    for msg in messages {
        for emoji in &msg.metadata.emojis {
            counter.add(emoji);
        }
        *per_sender.entry(msg.sender.clone()).or_default() += msg.metadata.emojis.len();
    }

    EmojiAnalysis {
        total_emojis: counter.total(),
        unique_emojis: counter.distinct(),
        emoji_frequency: counter.to_sorted_map(),
        emojis_per_sender: per_sender,
        top_emojis: counter.top(top),
    }
}
