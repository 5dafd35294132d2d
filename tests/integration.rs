//! Integration tests for the parse -> analyze -> filter pipeline.

use chatlens::core::output::{Report, to_csv, to_json};
use chatlens::parser::{LogParser, parse};
use chatlens::prelude::*;
use std::fs;
use tempfile::tempdir;

const ALICE_BOB_DAY: &str = "\
[01/01/2024, 09:00:00] Alice: Good morning
[01/01/2024, 09:05:00] Bob: Morning!
[01/01/2024, 23:00:00] Alice: Night";

const WITH_CALLS: &str = "\
[01/01/2024, 09:00:00] Alice: call me?
[01/01/2024, 10:00:00] Alice: Voice call, 125 sec
[01/01/2024, 11:00:00] Bob: Missed video call
[01/01/2024, 11:30:00] Bob: sorry, missed it";

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

// =========================================================================
// Parsing
// =========================================================================

#[test]
fn test_three_line_round_trip() {
    let chat = LogParser::new().parse_str(ALICE_BOB_DAY).unwrap();

    assert_eq!(chat.messages.len(), 3);
    assert!(chat.calls.is_empty());
    let contents: Vec<&str> = chat.messages.iter().map(|m| m.content.as_str()).collect();
    assert_eq!(contents, vec!["Good morning", "Morning!", "Night"]);

    let names: Vec<&str> = chat.participants.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Alice", "Bob"]);
    assert_eq!(chat.participants[0].message_count, 2);

    assert_eq!(chat.metadata.total_messages, 3);
    assert_eq!(chat.metadata.chat_type, ChatType::Individual);
    assert_eq!(chat.metadata.date_range.start, chat.messages[0].datetime);
    assert_eq!(chat.metadata.date_range.end, chat.messages[2].datetime);
}

#[test]
fn test_ids_are_sequential() {
    let chat = LogParser::new().parse_str(ALICE_BOB_DAY).unwrap();
    let ids: Vec<u64> = chat.messages.iter().map(|m| m.id).collect();
    assert_eq!(ids, vec![0, 1, 2]);
}

#[test]
fn test_empty_transcript_is_no_messages() {
    let err = LogParser::new().parse_str("").unwrap_err();
    assert!(err.is_no_messages());
    assert!(err.to_string().contains("no messages found"));
}

#[test]
fn test_unrecognized_transcript_is_no_messages() {
    let err = LogParser::new()
        .parse_str("just some notes\nwith no timestamps at all")
        .unwrap_err();
    assert!(err.is_no_messages());
}

#[test]
fn test_parse_file_and_missing_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("chat.txt");
    fs::write(&path, ALICE_BOB_DAY).unwrap();

    let chat = LogParser::new().parse_file(&path).unwrap();
    assert_eq!(chat.messages.len(), 3);

    let err = LogParser::new()
        .parse_file(dir.path().join("missing.txt"))
        .unwrap_err();
    assert!(err.is_io());
}

#[test]
fn test_free_parse_fn_honors_config() {
    let config = ParserConfig::new().with_group_threshold(1);
    let chat = parse(ALICE_BOB_DAY, &config, None).unwrap();
    assert_eq!(chat.metadata.chat_type, ChatType::Group);
}

#[test]
fn test_group_chat_detection() {
    let text = "\
[01/01/2024, 09:00:00] Alice: hi
[01/01/2024, 09:01:00] Bob: hi
[01/01/2024, 09:02:00] Carol: hi";
    let chat = LogParser::new().parse_str(text).unwrap();
    assert_eq!(chat.metadata.chat_type, ChatType::Group);
}

#[test]
fn test_dialects() {
    let samples = [
        "[15/01/2024, 10:30:00] Alice: Hello",
        "[1/15/24, 10:30:00 AM] Alice: Hello",
        "[15.01.24, 10:30:00] Alice: Hello",
        "15.01.2024, 10:30 - Alice: Hello",
        "15/01/2024, 10:30 - Alice: Hello",
    ];
    for sample in samples {
        let chat = LogParser::new().parse_str(sample).unwrap();
        assert_eq!(chat.messages.len(), 1, "dialect sample: {sample}");
        assert_eq!(chat.messages[0].sender, "Alice");
        assert_eq!(chat.messages[0].content, "Hello");
    }
}

// =========================================================================
// Aggregation
// =========================================================================

#[test]
fn test_alice_bob_day_analytics() {
    let chat = LogParser::new().parse_str(ALICE_BOB_DAY).unwrap();
    let analytics = analyze(&chat, &AnalyticsConfig::default()).unwrap();

    let stats = &analytics.message_stats;
    assert_eq!(stats.total_messages, 3);
    assert_eq!(stats.messages_per_sender["Alice"], 2);
    assert_eq!(stats.messages_per_sender["Bob"], 1);

    let alice_hours = analytics.time_patterns.hourly_activity["Alice"];
    assert_eq!(alice_hours[9], 1);
    assert_eq!(alice_hours[23], 1);
    assert_eq!(alice_hours.iter().sum::<usize>(), 2);

    let response = &analytics.response_metrics;
    assert_eq!(response.conversation_count, 2);
    assert_eq!(response.conversation_initiators["Alice"], 2);
    assert!(approx(response.response_time_per_sender["Bob"], 5.0));
}

#[test]
fn test_call_scenario() {
    let chat = LogParser::new().parse_str(WITH_CALLS).unwrap();
    assert_eq!(chat.messages.len(), 2);
    assert_eq!(chat.calls.len(), 2);
    assert_eq!(chat.metadata.total_calls, 2);

    let calls = analyze(&chat, &AnalyticsConfig::default())
        .unwrap()
        .call_analytics;
    assert_eq!(calls.total_calls, 2);
    assert_eq!(calls.completed_calls, 1);
    assert_eq!(calls.missed_calls, 1);
    assert!(approx(calls.average_duration, 125.0 / 60.0));
    assert_eq!(calls.calls_per_initiator["Alice"], 1);
}

#[test]
fn test_sum_invariants() {
    let chat = LogParser::new().parse_str(WITH_CALLS).unwrap();
    let analytics = analyze(&chat, &AnalyticsConfig::default()).unwrap();

    let per_sender: usize = analytics.message_stats.messages_per_sender.values().sum();
    assert_eq!(per_sender, analytics.message_stats.total_messages);

    let weekly: usize = analytics
        .time_patterns
        .weekly_activity
        .values()
        .flat_map(|d| d.iter())
        .sum();
    assert_eq!(weekly, analytics.message_stats.total_messages);

    let daily: usize = analytics.time_patterns.daily_totals.values().sum();
    assert_eq!(daily, analytics.message_stats.total_messages);

    assert_eq!(
        analytics.call_analytics.calls_by_day.iter().sum::<usize>(),
        analytics.call_analytics.total_calls
    );
}

#[test]
fn test_analysis_is_pure() {
    let chat = LogParser::new().parse_str(WITH_CALLS).unwrap();
    let config = AnalyticsConfig::default();
    assert_eq!(analyze(&chat, &config).unwrap(), analyze(&chat, &config).unwrap());
}

#[test]
fn test_config_from_json() {
    let config = AnalyticsConfig::from_json(r#"{"conversationGapMinutes": 1000}"#).unwrap();
    assert_eq!(config.conversation_gap_minutes, 1000);
    assert_eq!(config.top_words, 20);

    let chat = LogParser::new().parse_str(ALICE_BOB_DAY).unwrap();
    let analytics = analyze(&chat, &config).unwrap();
    assert_eq!(analytics.response_metrics.conversation_count, 1);
}

// =========================================================================
// Filtering
// =========================================================================

#[test]
fn test_sender_filter_bob() {
    let chat = LogParser::new().parse_str(ALICE_BOB_DAY).unwrap();
    let predicate = FilterPredicate::new().with_sender("Bob");
    let analytics = analyze_filtered(&chat, &predicate, &AnalyticsConfig::default()).unwrap();

    assert_eq!(analytics.message_stats.total_messages, 1);
    assert_eq!(analytics.message_stats.messages_per_sender.len(), 1);
    assert_eq!(analytics.message_stats.messages_per_sender["Bob"], 1);
}

#[test]
fn test_identity_law() {
    let chat = LogParser::new().parse_str(WITH_CALLS).unwrap();
    let config = AnalyticsConfig::default();
    assert_eq!(
        analyze_filtered(&chat, &FilterPredicate::new(), &config).unwrap(),
        analyze(&chat, &config).unwrap()
    );
}

#[test]
fn test_call_type_filter_excludes_messages() {
    let chat = LogParser::new().parse_str(WITH_CALLS).unwrap();
    let predicate = FilterPredicate::new().with_types([EntryType::Call]);
    let analytics = analyze_filtered(&chat, &predicate, &AnalyticsConfig::default()).unwrap();

    assert_eq!(analytics.message_stats.total_messages, 0);
    assert_eq!(analytics.call_analytics.total_calls, 2);
}

#[test]
fn test_filter_to_nothing_is_not_an_error() {
    let chat = LogParser::new().parse_str(ALICE_BOB_DAY).unwrap();
    let predicate = FilterPredicate::new().with_date_from("2030-01-01").unwrap();
    let analytics = analyze_filtered(&chat, &predicate, &AnalyticsConfig::default()).unwrap();
    assert_eq!(analytics.message_stats.total_messages, 0);
    assert_eq!(analytics.response_metrics.conversation_count, 0);
}

// =========================================================================
// Output
// =========================================================================

#[test]
fn test_json_report() {
    let chat = LogParser::new().parse_str(WITH_CALLS).unwrap();
    let analytics = analyze(&chat, &AnalyticsConfig::default()).unwrap();
    let json = to_json(&Report::new(&chat, &analytics)).unwrap();

    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["metadata"]["totalCalls"], 2);
    assert_eq!(value["participants"].as_array().unwrap().len(), 2);
    assert_eq!(value["analytics"]["callAnalytics"]["missedCalls"], 1);
    assert!(value["analytics"]["timePatterns"]["dailyTrend"].is_object());
}

#[test]
fn test_csv_messages() {
    let chat = LogParser::new().parse_str(ALICE_BOB_DAY).unwrap();
    let csv = to_csv(&chat.messages).unwrap();
    assert_eq!(csv.lines().count(), 4);
    assert!(csv.contains(";Bob;text;Morning!;"));
}
