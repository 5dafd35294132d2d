//! First-seen-stable frequency counting and top-K ranking.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One ranked value with its occurrence count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedEntry {
    pub value: String,
    pub count: usize,
}

/// Counts occurrences while remembering first-seen order.
///
/// ```rust
/// use chatlens::analytics::FrequencyCounter;
///
/// let mut counter = FrequencyCounter::new();
/// for word in ["b", "a", "b", "c", "a"] {
///     counter.add(word);
/// }
/// let top: Vec<_> = counter.top(2).into_iter().map(|e| e.value).collect();
/// assert_eq!(top, vec!["b", "a"]);
/// ```
#[derive(Debug, Default, Clone)]
pub struct FrequencyCounter {
    counts: IndexMap<String, usize>,
}

impl FrequencyCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, value: &str) {
        if let Some(count) = self.counts.get_mut(value) {
            *count += 1;
        } else {
            self.counts.insert(value.to_string(), 1);
        }
    }

    /// Sum of all counts.
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// Number of distinct values.
    pub fn distinct(&self) -> usize {
        self.counts.len()
    }

    /// The `limit` most frequent values, descending by count. Ties keep
    /// first-seen order. A limit of zero means no limit.
    pub fn top(&self, limit: usize) -> Vec<RankedEntry> {
        let mut ranked: Vec<(&String, &usize)> = self.counts.iter().collect();
        // Stable sort preserves insertion order among equal counts
        ranked.sort_by(|a, b| b.1.cmp(a.1));

        let limit = if limit == 0 { ranked.len() } else { limit };
        ranked
            .into_iter()
            .take(limit)
            .map(|(value, &count)| RankedEntry {
                value: value.clone(),
                count,
            })
            .collect()
    }

    /// Counts keyed in sorted order, for deterministic serialization.
    pub fn to_sorted_map(&self) -> BTreeMap<String, usize> {
        self.counts
            .iter()
            .map(|(value, &count)| (value.clone(), count))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ties_keep_first_seen_order() {
        let mut counter = FrequencyCounter::new();
        for v in ["x", "y", "z", "y", "z"] {
            counter.add(v);
        }
        let top = counter.top(0);
        let values: Vec<&str> = top.iter().map(|e| e.value.as_str()).collect();
        assert_eq!(values, vec!["y", "z", "x"]);
    }

    #[test]
    fn test_limit_and_totals() {
        let mut counter = FrequencyCounter::new();
        for v in ["a", "b", "c", "a"] {
            counter.add(v);
        }
        assert_eq!(counter.top(1), vec![RankedEntry { value: "a".into(), count: 2 }]);
        assert_eq!(counter.total(), 4);
        assert_eq!(counter.distinct(), 3);
        assert_eq!(counter.to_sorted_map().keys().next().map(String::as_str), Some("a"));
    }

    #[test]
    fn test_empty_counter() {
        let counter = FrequencyCounter::new();
        assert!(counter.top(10).is_empty());
        assert_eq!(counter.total(), 0);
    }
}
