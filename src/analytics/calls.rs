//! Call outcome and duration statistics.

use std::collections::BTreeMap;

use chrono::{Datelike, Timelike};
use serde::{Deserialize, Serialize};

use crate::core::models::{Call, CallStatus};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallAnalytics {
    pub total_calls: usize,
    pub completed_calls: usize,
    pub missed_calls: usize,
    pub declined_calls: usize,
    /// Mean length of completed calls, in minutes.
    pub average_duration: f64,
    /// Summed length of completed calls, in minutes.
    pub total_duration: f64,
    pub calls_by_hour: [usize; 24],
    /// Index 0 = Sunday.
    pub calls_by_day: [usize; 7],
    pub calls_per_initiator: BTreeMap<String, usize>,
    /// Mean completed-call minutes by `[weekday][hour]`, 0 where none.
    pub duration_heatmap: [[f64; 24]; 7],
}

pub(crate) fn call_analytics(calls: &[&Call]) -> CallAnalytics {
    let mut out = CallAnalytics {
        total_calls: calls.len(),
        ..CallAnalytics::default()
    };
    let mut heat_counts = [[0usize; 24]; 7];

    for call in calls {
        let hour = call.datetime.hour() as usize;
        let day = call.datetime.weekday().num_days_from_sunday() as usize;

        out.calls_by_hour[hour] += 1;
        out.calls_by_day[day] += 1;
        *out
            .calls_per_initiator
            .entry(call.initiator.clone())
            .or_default() += 1;

        match call.status {
            CallStatus::Completed => {
                out.completed_calls += 1;
                out.total_duration += call.duration;
                out.duration_heatmap[day][hour] += call.duration;
                heat_counts[day][hour] += 1;
            }
            CallStatus::Missed => out.missed_calls += 1,
            CallStatus::Declined => out.declined_calls += 1,
        }
    }

    if out.completed_calls > 0 {
        out.average_duration = out.total_duration / out.completed_calls as f64;
    }

    for (row, counts) in out.duration_heatmap.iter_mut().zip(heat_counts) {
        for (cell, count) in row.iter_mut().zip(counts) {
            if count > 0 {
                *cell /= count as f64;
            }
        }
    }

    out
}
