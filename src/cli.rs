//! Command-line interface definition using clap.
//!
//! - [`Args`] - CLI argument structure
//! - [`OutputFormat`] - Output format options, convertible to
//!   [`format::OutputFormat`](crate::format::OutputFormat)

use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::config::AnalyticsConfig;
use crate::core::filter::{EntryType, FilterPredicate};
use crate::error::Result;

const DEFAULT_OUTPUT_STEM: &str = "chat_analysis";

/// Parse a chat export transcript and compute conversation analytics.
#[derive(Parser, Debug, Clone)]
#[command(name = "chatlens")]
#[command(version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    chatlens chat.txt
    chatlens chat.txt -o report.json --after 2024-01-01
    chatlens chat.txt --sender Alice --sender Bob --types text,media
    chatlens chat.txt -f csv -o messages.csv --keyword pizza")]
pub struct Args {
    /// Path to the transcript
    pub input: String,

    /// Path to output file [default: chat_analysis.<format>]
    #[arg(short, long)]
    pub output: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    pub format: OutputFormat,

    /// Keep entries on or after this date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub after: Option<String>,

    /// Keep entries on or before this date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub before: Option<String>,

    /// Keep entries from this sender (repeatable)
    #[arg(long = "sender", value_name = "NAME")]
    pub senders: Vec<String>,

    /// Keep messages containing this text (case-insensitive)
    #[arg(long, value_name = "TEXT")]
    pub keyword: Option<String>,

    /// Keep these entry types: text, media, call
    #[arg(long, value_delimiter = ',', value_name = "TYPES")]
    pub types: Vec<EntryType>,

    /// Silence longer than this many minutes starts a new conversation
    #[arg(long, value_name = "N")]
    pub gap_minutes: Option<u32>,

    /// Length of the top emoji and word rankings
    #[arg(long, value_name = "N")]
    pub top: Option<usize>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Output path, defaulting to `chat_analysis.<ext>`.
    pub fn output_path(&self) -> String {
        self.output.clone().unwrap_or_else(|| {
            let format: crate::format::OutputFormat = self.format.into();
            format!("{DEFAULT_OUTPUT_STEM}.{}", format.extension())
        })
    }

    /// Builds the filter predicate from the filtering flags.
    pub fn filter_predicate(&self) -> Result<FilterPredicate> {
        let mut predicate = FilterPredicate::new();

        if let Some(ref after) = self.after {
            predicate = predicate.with_date_from(after)?;
        }
        if let Some(ref before) = self.before {
            predicate = predicate.with_date_to(before)?;
        }
        for sender in &self.senders {
            predicate = predicate.with_sender(sender.clone());
        }
        if let Some(ref keyword) = self.keyword {
            predicate = predicate.with_keyword(keyword.clone());
        }
        if !self.types.is_empty() {
            predicate = predicate.with_types(self.types.iter().copied());
        }

        Ok(predicate)
    }

    pub fn analytics_config(&self) -> AnalyticsConfig {
        let mut config = AnalyticsConfig::default();
        if let Some(minutes) = self.gap_minutes {
            config = config.with_conversation_gap_minutes(minutes);
        }
        if let Some(top) = self.top {
            config = config.with_top_emojis(top).with_top_words(top);
        }
        config
    }
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Metadata, participants and analytics as JSON
    #[default]
    Json,
    /// One row per message, semicolon delimited
    Csv,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Json => write!(f, "JSON"),
            OutputFormat::Csv => write!(f, "CSV"),
        }
    }
}

impl From<OutputFormat> for crate::format::OutputFormat {
    fn from(format: OutputFormat) -> crate::format::OutputFormat {
        match format {
            OutputFormat::Json => crate::format::OutputFormat::Json,
            OutputFormat::Csv => crate::format::OutputFormat::Csv,
        }
    }
}
