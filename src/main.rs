//! # chatlens CLI
//!
//! Command-line interface for the chatlens library.

use std::process;
use std::sync::Arc;
use std::time::Instant;

use clap::Parser as ClapParser;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use chatlens::ChatlensError;
use chatlens::analytics::analyze;
use chatlens::cli::Args;
use chatlens::config::ParserConfig;
use chatlens::format::{OutputFormat, write_to_format};
use chatlens::progress::stderr_progress;
use chatlens::worker::{filter_and_analyze, parse_file_async};

#[tokio::main]
async fn main() {
    let args = <Args as ClapParser>::parse();
    init_logging(args.verbose);

    if let Err(e) = run(args).await {
        eprintln!("❌ Error: {}", e);
        process::exit(1);
    }
}

/// Installs a stderr subscriber. `RUST_LOG` wins over `-v`.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "chatlens=debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init();
}

async fn run(args: Args) -> Result<(), ChatlensError> {
    let total_start = Instant::now();
    let output_path = args.output_path();
    let format: OutputFormat = args.format.into();
    let predicate = args.filter_predicate()?;
    let config = args.analytics_config();

    println!("🔎 chatlens v{}", env!("CARGO_PKG_VERSION"));
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("📂 Input:   {}", args.input);
    println!("💾 Output:  {}", output_path);
    println!("📄 Format:  {}", format);
    if predicate.is_active() {
        debug!(?predicate, "filter active");
        println!("🔍 Filter:  active");
    }
    println!();

    let parse_start = Instant::now();
    let chat = parse_file_async(&args.input, ParserConfig::default(), Some(stderr_progress())).await?;
    info!(
        messages = chat.messages.len(),
        calls = chat.calls.len(),
        "transcript parsed"
    );
    println!(
        "   Found {} messages and {} calls from {} participants ({:.2}s)",
        chat.messages.len(),
        chat.calls.len(),
        chat.participants.len(),
        parse_start.elapsed().as_secs_f64()
    );

    let analyze_start = Instant::now();
    let chat = Arc::new(chat);
    let analytics = if predicate.is_active() {
        filter_and_analyze(Arc::clone(&chat), predicate.clone(), config).await?
    } else {
        analyze(&chat, &config)?
    };
    println!(
        "   Analyzed {} messages ({:.2}s)",
        analytics.message_stats.total_messages,
        analyze_start.elapsed().as_secs_f64()
    );

    write_to_format(&chat, &analytics, &predicate, &output_path, format)?;

    println!();
    println!("✅ Done! Output saved to {}", output_path);
    println!();
    println!("📊 Summary:");
    println!("   Chat type:      {:?}", chat.metadata.chat_type);
    println!("   Conversations:  {}", analytics.response_metrics.conversation_count);
    println!("   Unique words:   {}", analytics.word_frequency.unique_words);
    println!("   Total time:     {:.2}s", total_start.elapsed().as_secs_f64());

    Ok(())
}
