//! Reply latency, conversation boundaries and message bursts.
//!
//! All metrics walk the messages in timestamp order. A message answers the
//! one right before it when the two senders differ; it starts a conversation
//! when it is the first message or the gap before it exceeds the
//! conversation gap.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::messages::mean;
use crate::config::AnalyticsConfig;
use crate::core::models::Message;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMetrics {
    /// Mean reply latency in minutes.
    pub average_response_time: f64,
    /// Mean reply latency in minutes, keyed by the replying sender.
    pub response_time_per_sender: BTreeMap<String, f64>,
    /// Conversations started, per sender.
    pub conversation_initiators: BTreeMap<String, usize>,
    pub conversation_count: usize,
    /// Runs of two or more quick consecutive messages, per sender.
    pub bursts_per_sender: BTreeMap<String, usize>,
}

pub(crate) fn response_metrics(
    messages: &[&Message],
    senders: &[&str],
    config: &AnalyticsConfig,
) -> ResponseMetrics {
    let zeroed = || -> BTreeMap<String, usize> { senders.iter().map(|s| (s.to_string(), 0)).collect() };
    let mut initiators = zeroed();
    let mut bursts = zeroed();
    let mut latencies: BTreeMap<&str, (i64, usize)> =
        senders.iter().map(|&s| (s, (0, 0))).collect();

    let gap_ms = config.conversation_gap_ms();
    let burst_ms = config.burst_window_ms();

    let mut total_latency_ms = 0i64;
    let mut responses = 0usize;
    let mut conversations = 0usize;
    let mut run_len = 0usize;

    let mut previous: Option<&Message> = None;
    for &msg in messages {
        let Some(prev) = previous else {
            conversations += 1;
            *initiators.entry(msg.sender.clone()).or_default() += 1;
            run_len = 1;
            previous = Some(msg);
            continue;
        };

        let gap = msg.timestamp - prev.timestamp;

        if gap > gap_ms {
            conversations += 1;
            *initiators.entry(msg.sender.clone()).or_default() += 1;
        }

        if msg.sender == prev.sender {
            if gap <= burst_ms {
                run_len += 1;
                if run_len == 2 {
                    *bursts.entry(msg.sender.clone()).or_default() += 1;
                }
            } else {
                run_len = 1;
            }
        } else {
            run_len = 1;
            total_latency_ms += gap;
            responses += 1;
            let entry = latencies.entry(msg.sender.as_str()).or_insert((0, 0));
            entry.0 += gap;
            entry.1 += 1;
        }

        previous = Some(msg);
    }

    ResponseMetrics {
        average_response_time: minutes(total_latency_ms, responses),
        response_time_per_sender: latencies
            .into_iter()
            .map(|(sender, (sum, count))| (sender.to_string(), minutes(sum, count)))
            .collect(),
        conversation_initiators: initiators,
        conversation_count: conversations,
        bursts_per_sender: bursts,
    }
}

fn minutes(total_ms: i64, count: usize) -> f64 {
    mean(total_ms.max(0) as usize, count) / 60_000.0
}
