//! End-to-end CLI tests for chatlens.
//!
//! These tests run the actual binary with various arguments and check the
//! files it writes.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test --test cli_e2e
//! ```

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::{TempDir, tempdir};

// ============================================================================
// Test Fixtures
// ============================================================================

const CHAT: &str = "\
[01/01/2024, 08:59:00] Messages and calls are end-to-end encrypted.
[01/01/2024, 09:00:00] Alice: Good morning 😀
[01/01/2024, 09:05:00] Bob: Morning!
want pizza later?
[01/01/2024, 10:00:00] Alice: Voice call, 125 sec
[01/01/2024, 11:00:00] Bob: Missed video call
[02/01/2024, 23:00:00] Alice: image omitted
[03/01/2024, 12:00:00] Bob: pizza was great";

fn setup_fixtures() -> TempDir {
    let dir = tempdir().expect("Failed to create temp dir");
    fs::write(dir.path().join("chat.txt"), CHAT).unwrap();
    fs::write(dir.path().join("empty.txt"), "").unwrap();
    dir
}

fn chatlens_cmd() -> Command {
    let cmd = std::process::Command::new(env!("CARGO_BIN_EXE_chatlens"));
    Command::from_std(cmd)
}

fn output_path(dir: &TempDir, name: &str) -> PathBuf {
    dir.path().join(name)
}

fn run_json(fixtures: &TempDir, extra: &[&str]) -> serde_json::Value {
    let input = fixtures.path().join("chat.txt");
    let output = output_path(fixtures, "report.json");

    let mut args = vec![input.to_str().unwrap(), "-o", output.to_str().unwrap()];
    args.extend_from_slice(extra);
    chatlens_cmd().args(&args).assert().success();

    serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap()
}

// ============================================================================
// Basic Functionality
// ============================================================================

mod basic_functionality {
    use super::*;

    #[test]
    fn test_json_report() {
        let fixtures = setup_fixtures();
        let input = fixtures.path().join("chat.txt");
        let output = output_path(&fixtures, "out.json");

        chatlens_cmd()
            .args([input.to_str().unwrap(), "-o", output.to_str().unwrap()])
            .assert()
            .success()
            .stdout(predicate::str::contains("Done"))
            .stdout(predicate::str::contains("Found 4 messages and 2 calls"));

        let report: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(report["metadata"]["totalMessages"], 4);
        assert_eq!(report["metadata"]["totalCalls"], 2);
        assert_eq!(report["metadata"]["chatType"], "individual");
        assert_eq!(report["participants"][0]["name"], "Alice");
        assert_eq!(report["analytics"]["callAnalytics"]["completedCalls"], 1);
    }

    #[test]
    fn test_multiline_message_kept_whole() {
        let fixtures = setup_fixtures();
        let report = run_json(&fixtures, &[]);
        assert_eq!(
            report["analytics"]["messageStats"]["messagesPerSender"]["Bob"],
            2
        );
        let top = report["analytics"]["wordFrequency"]["topWords"][0]["value"].clone();
        assert_eq!(top, "pizza");
    }

    #[test]
    fn test_default_output_path() {
        let fixtures = setup_fixtures();
        let input = fixtures.path().join("chat.txt");

        chatlens_cmd()
            .current_dir(fixtures.path())
            .arg(input.to_str().unwrap())
            .assert()
            .success();

        assert!(fixtures.path().join("chat_analysis.json").exists());
    }

    #[test]
    fn test_verbose_logging() {
        let fixtures = setup_fixtures();
        let input = fixtures.path().join("chat.txt");
        let output = output_path(&fixtures, "out.json");

        chatlens_cmd()
            .env_remove("RUST_LOG")
            .args([input.to_str().unwrap(), "-o", output.to_str().unwrap(), "-v"])
            .assert()
            .success()
            .stderr(predicate::str::contains("parsed transcript"));
    }
}

// ============================================================================
// Output Formats
// ============================================================================

mod output_formats {
    use super::*;

    #[test]
    fn test_csv_output() {
        let fixtures = setup_fixtures();
        let input = fixtures.path().join("chat.txt");
        let output = output_path(&fixtures, "messages.csv");

        chatlens_cmd()
            .args([
                input.to_str().unwrap(),
                "-f",
                "csv",
                "-o",
                output.to_str().unwrap(),
            ])
            .assert()
            .success();

        let content = fs::read_to_string(&output).unwrap();
        let mut lines = content.lines();
        assert_eq!(
            lines.next(),
            Some("ID;Timestamp;Sender;Type;Content;Words;Chars;Emojis")
        );
        assert!(content.contains("Alice;media;image omitted"));
        assert!(content.contains("\"Morning!\nwant pizza later?\""));
    }

    #[test]
    fn test_csv_default_output_path() {
        let fixtures = setup_fixtures();
        let input = fixtures.path().join("chat.txt");

        chatlens_cmd()
            .current_dir(fixtures.path())
            .args([input.to_str().unwrap(), "-f", "csv"])
            .assert()
            .success();

        assert!(fixtures.path().join("chat_analysis.csv").exists());
    }

    #[test]
    fn test_csv_honors_sender_filter() {
        let fixtures = setup_fixtures();
        let input = fixtures.path().join("chat.txt");
        let output = output_path(&fixtures, "bob.csv");

        chatlens_cmd()
            .args([
                input.to_str().unwrap(),
                "-f",
                "csv",
                "--sender",
                "Bob",
                "-o",
                output.to_str().unwrap(),
            ])
            .assert()
            .success();

        let content = fs::read_to_string(&output).unwrap();
        assert!(!content.contains("Alice"));
        assert!(content.contains(";Bob;text;pizza was great;"));
        assert!(content.contains("\"Morning!\nwant pizza later?\""));
    }

    #[test]
    fn test_csv_honors_keyword_filter() {
        let fixtures = setup_fixtures();
        let input = fixtures.path().join("chat.txt");
        let output = output_path(&fixtures, "pizza.csv");

        chatlens_cmd()
            .args([
                input.to_str().unwrap(),
                "-f",
                "csv",
                "--keyword",
                "GREAT",
                "-o",
                output.to_str().unwrap(),
            ])
            .assert()
            .success();

        let content = fs::read_to_string(&output).unwrap();
        assert_eq!(content.lines().count(), 2);
        assert!(content.contains("pizza was great"));
    }
}

// ============================================================================
// Filters
// ============================================================================

mod filters {
    use super::*;

    #[test]
    fn test_sender_filter() {
        let fixtures = setup_fixtures();
        let report = run_json(&fixtures, &["--sender", "Bob"]);
        let per_sender = report["analytics"]["messageStats"]["messagesPerSender"]
            .as_object()
            .unwrap();
        assert_eq!(per_sender.len(), 1);
        assert_eq!(per_sender["Bob"], 2);
        assert_eq!(report["analytics"]["callAnalytics"]["totalCalls"], 1);
        // Metadata describes the whole chat
        assert_eq!(report["metadata"]["totalMessages"], 4);
    }

    #[test]
    fn test_date_filter() {
        let fixtures = setup_fixtures();
        let report = run_json(&fixtures, &["--after", "2024-01-02", "--before", "2024-01-02"]);
        assert_eq!(report["analytics"]["messageStats"]["totalMessages"], 1);
        assert_eq!(report["analytics"]["callAnalytics"]["totalCalls"], 0);
    }

    #[test]
    fn test_keyword_filter() {
        let fixtures = setup_fixtures();
        let report = run_json(&fixtures, &["--keyword", "PIZZA"]);
        assert_eq!(report["analytics"]["messageStats"]["totalMessages"], 2);
    }

    #[test]
    fn test_types_filter() {
        let fixtures = setup_fixtures();
        let report = run_json(&fixtures, &["--types", "call"]);
        assert_eq!(report["analytics"]["messageStats"]["totalMessages"], 0);
        assert_eq!(report["analytics"]["callAnalytics"]["totalCalls"], 2);
    }

    #[test]
    fn test_gap_minutes() {
        let fixtures = setup_fixtures();
        let report = run_json(&fixtures, &["--gap-minutes", "100000"]);
        assert_eq!(report["analytics"]["responseMetrics"]["conversationCount"], 1);
    }
}

// ============================================================================
// Error Handling
// ============================================================================

mod error_handling {
    use super::*;

    #[test]
    fn test_nonexistent_file() {
        chatlens_cmd()
            .arg("nonexistent_file.txt")
            .assert()
            .failure()
            .stderr(predicate::str::contains("Error"));
    }

    #[test]
    fn test_empty_transcript() {
        let fixtures = setup_fixtures();
        let input = fixtures.path().join("empty.txt");

        chatlens_cmd()
            .args([input.to_str().unwrap(), "-o", "unused.json"])
            .current_dir(fixtures.path())
            .assert()
            .failure()
            .stderr(predicate::str::contains("no messages found"));

        assert!(!fixtures.path().join("unused.json").exists());
    }

    #[test]
    fn test_invalid_date_format() {
        let fixtures = setup_fixtures();
        let input = fixtures.path().join("chat.txt");

        chatlens_cmd()
            .args([input.to_str().unwrap(), "--after", "not-a-date"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid date"));
    }

    #[test]
    fn test_invalid_format_option() {
        let fixtures = setup_fixtures();
        let input = fixtures.path().join("chat.txt");

        chatlens_cmd()
            .args([input.to_str().unwrap(), "-f", "jsonl"])
            .assert()
            .failure();
    }

    #[test]
    fn test_invalid_type() {
        let fixtures = setup_fixtures();
        let input = fixtures.path().join("chat.txt");

        chatlens_cmd()
            .args([input.to_str().unwrap(), "--types", "text,sticker"])
            .assert()
            .failure();
    }

    #[test]
    fn test_missing_input_argument() {
        chatlens_cmd().assert().failure();
    }
}

// ============================================================================
// Help and Version
// ============================================================================

mod help_and_version {
    use super::*;

    #[test]
    fn test_help() {
        chatlens_cmd()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("--sender"))
            .stdout(predicate::str::contains("EXAMPLES"));
    }

    #[test]
    fn test_version() {
        chatlens_cmd()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    }
}
