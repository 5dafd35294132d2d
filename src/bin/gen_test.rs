//! Synthetic transcript generator for stress testing chatlens.
//!
//! Usage: cargo run --features gen-test --bin gen_test -- [messages] [output]
//! Example: cargo run --features gen-test --bin gen_test -- 100000 heavy_chat.txt
//!
//! Writes `[dd/mm/yyyy, HH:MM:SS] Sender: text` lines with multi-line
//! messages, media placeholders, call events, system notices and garbage.

use std::env;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::time::Instant;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use rand::Rng;
use rand::seq::SliceRandom;

const EMOJIS: &[&str] = &[
    "😀", "😂", "🤣", "😍", "🥰", "🤔", "🙄", "😱", "🔥", "👍", "❤️", "💔", "🎉", "🇰🇿", "👨‍👩‍👧‍👦",
    "🤷‍♀️", "👍🏽",
];

const SENDERS: &[&str] = &[
    "Alice", "Bob", "Carol", "Иван", "Мария", "村上", "محمد", "🔥FireUser🔥", "Dr. Who",
];

const WORDS: &[&str] = &[
    "hello", "pizza", "tonight", "meeting", "weekend", "coffee", "train", "late", "movie",
    "dinner", "work", "tomorrow", "great", "thanks", "привет", "sure", "maybe", "call", "later",
];

const MEDIA: &[&str] = &[
    "image omitted",
    "video omitted",
    "audio omitted",
    "sticker omitted",
    "GIF omitted",
    "document omitted",
    "<Media omitted>",
];

const CALLS: &[&str] = &[
    "Missed voice call",
    "Missed video call",
    "Voice call, No answer",
    "Declined voice call",
];

const NOTICES: &[&str] = &[
    "Messages and calls are end-to-end encrypted. No one outside of this chat can read them.",
    "Alice added Bob",
    "Carol left",
    "Bob changed the group description",
];

fn main() -> io::Result<()> {
    let args: Vec<String> = env::args().collect();

    let count: usize = args.get(1).and_then(|s| s.parse().ok()).unwrap_or(100_000);
    let output = args.get(2).map_or("heavy_chat.txt", String::as_str);

    println!("🧪 Transcript Generator");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("   Messages: {}", count);
    println!("   Output:   {}", output);
    println!();

    let file = File::create(output)?;
    let mut writer = BufWriter::with_capacity(1024 * 1024, file);
    let mut rng = rand::thread_rng();

    let start = Instant::now();
    let mut bytes_written: usize = 0;
    let Some(mut at) = NaiveDate::from_ymd_opt(2023, 1, 1).and_then(|d| d.and_hms_opt(8, 0, 0))
    else {
        return Err(io::Error::other("invalid start date"));
    };

    for i in 0..count {
        at = advance(&mut rng, at);
        let sender = SENDERS.choose(&mut rng).copied().unwrap_or("Alice");
        let line = generate_line(&mut rng, at, sender);

        bytes_written += line.len();
        writer.write_all(line.as_bytes())?;

        // Occasionally insert garbage lines to test robustness
        if i % 1000 == 500 {
            let garbage = generate_garbage_line(&mut rng);
            bytes_written += garbage.len();
            writer.write_all(garbage.as_bytes())?;
        }

        if (i + 1) % 10000 == 0 {
            let elapsed = start.elapsed().as_secs_f64();
            eprint!(
                "\r   Generated {}/{} ({:.1} MB, {:.0} msg/s)",
                i + 1,
                count,
                bytes_written as f64 / 1_000_000.0,
                (i + 1) as f64 / elapsed
            );
        }
    }

    writer.flush()?;

    let elapsed = start.elapsed();
    println!("\n\n✅ Done!");
    println!("   Size: {:.2} MB", bytes_written as f64 / 1_000_000.0);
    println!("   Time: {:.2}s", elapsed.as_secs_f64());
    Ok(())
}

/// Mostly quick replies, sometimes a long silence.
fn advance(rng: &mut impl Rng, at: NaiveDateTime) -> NaiveDateTime {
    let secs = if rng.gen_bool(0.05) {
        rng.gen_range(3_600..172_800)
    } else {
        rng.gen_range(5..900)
    };
    at + Duration::seconds(secs)
}

fn generate_line(rng: &mut impl Rng, at: NaiveDateTime, sender: &str) -> String {
    let stamp = at.format("[%d/%m/%Y, %H:%M:%S]");
    let roll: u32 = rng.gen_range(0..100);

    match roll {
        0..=1 => {
            let notice = NOTICES.choose(rng).copied().unwrap_or("Carol left");
            format!("{stamp} {notice}\n")
        }
        2..=4 => {
            let secs: u32 = rng.gen_range(5..5_400);
            let kind = if rng.gen_bool(0.5) { "Voice" } else { "Video" };
            format!("{stamp} {sender}: {kind} call, {} min {} sec\n", secs / 60, secs % 60)
        }
        5..=6 => {
            let call = CALLS.choose(rng).copied().unwrap_or("Missed voice call");
            format!("{stamp} {sender}: {call}\n")
        }
        7..=14 => {
            let media = MEDIA.choose(rng).copied().unwrap_or("image omitted");
            format!("{stamp} {sender}: \u{200E}{media}\n")
        }
        15..=19 => {
            // Multi-line: continuation lines carry no timestamp
            let lines: Vec<String> = (0..rng.gen_range(2..5)).map(|_| sentence(rng)).collect();
            format!("{stamp} {sender}: {}\n", lines.join("\n"))
        }
        20..=22 => format!("{stamp} {sender}: look https://example.com/{}\n", rng.r#gen::<u16>()),
        _ => format!("{stamp} {sender}: {}\n", sentence(rng)),
    }
}

fn sentence(rng: &mut impl Rng) -> String {
    let len = rng.gen_range(1..12);
    let mut parts: Vec<&str> = (0..len)
        .map(|_| WORDS.choose(rng).copied().unwrap_or("hello"))
        .collect();
    if rng.gen_bool(0.3) {
        parts.push(EMOJIS.choose(rng).copied().unwrap_or("😀"));
    }
    parts.join(" ")
}

fn generate_garbage_line(rng: &mut impl Rng) -> String {
    match rng.gen_range(0..5) {
        0 => "[32/13/2024, 25:61:00] Ghost: impossible date\n".to_string(),
        1 => "[01/01/2024, 10:00:00] : no sender\n".to_string(),
        2 => "\r\n".to_string(),
        3 => "\u{FEFF}\u{200B}\u{200E}\n".to_string(),
        _ => {
            let len = rng.gen_range(10..200);
            let s: String = (0..len)
                .map(|_| char::from_u32(rng.gen_range(0x20..0x7E)).unwrap_or('?'))
                .collect();
            format!("{}\n", s)
        }
    }
}
