//! Word frequency over text messages.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::ranking::{FrequencyCounter, RankedEntry};
use crate::config::AnalyticsConfig;
use crate::core::models::Message;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordFrequency {
    pub top_words: Vec<RankedEntry>,
    pub word_cloud: Vec<RankedEntry>,
    pub unique_words: usize,
}

/// Lowercased, purely alphabetic tokens of `content`.
///
/// Tokens carrying digits or punctuation ("hello,", "2pm") are dropped
/// rather than trimmed.
pub fn tokenize(content: &str) -> impl Iterator<Item = String> + '_ {
    content
        .split_whitespace()
        .filter(|token| token.chars().all(char::is_alphabetic))
        .map(str::to_lowercase)
}

pub(crate) fn word_frequency(messages: &[&Message], config: &AnalyticsConfig) -> WordFrequency {
    let stopwords: HashSet<String> = config.stopwords.iter().map(|w| w.to_lowercase()).collect();
    let mut counter = FrequencyCounter::new();

    for msg in messages.iter().filter(|m| !m.is_media()) {
        for word in tokenize(&msg.content) {
            if word.chars().count() >= config.min_word_length && !stopwords.contains(&word) {
                counter.add(&word);
            }
        }
    }

    WordFrequency {
        top_words: counter.top(config.top_words),
        word_cloud: counter.top(config.word_cloud_limit),
        unique_words: counter.distinct(),
    }
}
