//! Activity over time: hour of day, day of week, calendar day and month.

use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDate, Timelike};
use serde::{Deserialize, Serialize};

use crate::core::models::Message;

const DAY_KEY: &str = "%Y-%m-%d";
const MONTH_KEY: &str = "%Y-%m";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimePatterns {
    /// Messages per hour of day (0-23), per sender.
    pub hourly_activity: BTreeMap<String, [usize; 24]>,
    /// Messages per `YYYY-MM-DD`, per sender.
    pub daily_activity: BTreeMap<String, BTreeMap<String, usize>>,
    /// Messages per weekday (0 = Sunday), per sender.
    pub weekly_activity: BTreeMap<String, [usize; 7]>,
    /// Messages per `YYYY-MM`, per sender.
    pub monthly_activity: BTreeMap<String, BTreeMap<String, usize>>,
    /// Messages per `YYYY-MM-DD` across all senders, zero-filled between
    /// the first and last active day.
    pub daily_totals: BTreeMap<String, usize>,
    /// Centered moving average of `daily_totals`.
    pub daily_trend: BTreeMap<String, f64>,
}

pub(crate) fn time_patterns(
    messages: &[&Message],
    senders: &[&str],
    trend_window_days: usize,
) -> TimePatterns {
    let mut patterns = TimePatterns::default();
    for &sender in senders {
        patterns.hourly_activity.insert(sender.to_string(), [0; 24]);
        patterns.weekly_activity.insert(sender.to_string(), [0; 7]);
        patterns
            .daily_activity
            .insert(sender.to_string(), BTreeMap::new());
        patterns
            .monthly_activity
            .insert(sender.to_string(), BTreeMap::new());
    }

    let mut per_day: BTreeMap<NaiveDate, usize> = BTreeMap::new();

    for msg in messages {
        let dt = msg.datetime;
        let sender = msg.sender.clone();

        patterns.hourly_activity.entry(sender.clone()).or_insert([0; 24])[dt.hour() as usize] += 1;
        patterns.weekly_activity.entry(sender.clone()).or_insert([0; 7])
            [dt.weekday().num_days_from_sunday() as usize] += 1;
        *patterns
            .daily_activity
            .entry(sender.clone())
            .or_default()
            .entry(dt.format(DAY_KEY).to_string())
            .or_default() += 1;
        *patterns
            .monthly_activity
            .entry(sender)
            .or_default()
            .entry(dt.format(MONTH_KEY).to_string())
            .or_default() += 1;

        *per_day.entry(dt.date_naive()).or_default() += 1;
    }

    let days = contiguous_days(&per_day);
    let trend = moving_average(&days, trend_window_days);

    for ((day, count), avg) in days.into_iter().zip(trend) {
        let key = day.format(DAY_KEY).to_string();
        patterns.daily_totals.insert(key.clone(), count);
        patterns.daily_trend.insert(key, avg);
    }

    patterns
}

/// Expands sparse day counts into every day from first to last.
fn contiguous_days(per_day: &BTreeMap<NaiveDate, usize>) -> Vec<(NaiveDate, usize)> {
    let (Some((&first, _)), Some((&last, _))) =
        (per_day.first_key_value(), per_day.last_key_value())
    else {
        return Vec::new();
    };

    let span = (last - first).num_days();
    (0..=span)
        .map(|offset| {
            let day = first + Duration::days(offset);
            (day, per_day.get(&day).copied().unwrap_or(0))
        })
        .collect()
}

/// Centered moving average. Windows that run past either end average only
/// the days available.
fn moving_average(days: &[(NaiveDate, usize)], window: usize) -> Vec<f64> {
    let window = window.max(1);
    let before = (window - 1) / 2;
    let after = window - 1 - before;

    (0..days.len())
        .map(|i| {
            let start = i.saturating_sub(before);
            let end = (i + after).min(days.len() - 1);
            let slice = &days[start..=end];
            let sum: usize = slice.iter().map(|(_, count)| count).sum();
            sum as f64 / slice.len() as f64
        })
        .collect()
}
