//! coinwatch - AI crypto market monitor
//!
//! # Usage
//!
//! ```bash
//! # Fetch prices, analyze, append to the analysis log
//! coinwatch daily
//!
//! # Aggregate the trailing window and append a weekly report
//! coinwatch weekly
//! ```
//!
//! # Environment Variables
//!
//! - `OPENAI_API_KEY`: API key for the generation backend (required; `.env` honored)
//! - `COINWATCH_CONFIG`: Path to TOML config (default: `coinwatch.toml`)
//! - `RUST_LOG`: Logging level (default: info)

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use coinwatch::config::MonitorConfig;
use coinwatch::feed::PriceFeed;
use coinwatch::llm::{GenerationBackend, OpenAiBackend};
use coinwatch::pipeline::{DailyAnalyst, WeeklyReporter};
use coinwatch::store::LogStore;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "coinwatch")]
#[command(about = "AI-assisted crypto market monitor")]
#[command(version)]
struct CliArgs {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch current prices, analyze them, and append to the analysis log
    Daily,
    /// Aggregate the trailing log window and append a weekly report
    Weekly,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = CliArgs::parse();
    let config = MonitorConfig::load();

    let api_key = MonitorConfig::api_key()?;
    let backend: Arc<dyn GenerationBackend> =
        Arc::new(OpenAiBackend::new(&config.llm, api_key)?);
    let store = LogStore::new(&config.store);

    match args.command {
        Command::Daily => run_daily(&config, backend, &store).await,
        Command::Weekly => run_weekly(&config, backend, &store).await,
    }
}

async fn run_daily(
    config: &MonitorConfig,
    backend: Arc<dyn GenerationBackend>,
    store: &LogStore,
) -> Result<()> {
    let feed = PriceFeed::new(&config.feed)?;
    let quote = feed.fetch_prices().await?;
    info!(btc = quote.btc, eth = quote.eth, "Fetched spot prices");

    let facts = format!(
        "Bitcoin is ${} and Ethereum is ${}. Summarize today's crypto trend and give sentiment.",
        quote.btc, quote.eth
    );

    let analyst = DailyAnalyst::new(backend);
    let record = analyst.analyze(&facts).await?;
    info!(
        sentiment = %record.sentiment,
        summary = %record.summary,
        "Daily analysis complete"
    );

    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
    store
        .append_analysis(&timestamp, quote.btc, quote.eth, &record)
        .context("Failed to append analysis row")?;

    Ok(())
}

async fn run_weekly(
    config: &MonitorConfig,
    backend: Arc<dyn GenerationBackend>,
    store: &LogStore,
) -> Result<()> {
    let rows = store.read_rows().context("Failed to read analysis log")?;
    if rows.is_empty() {
        warn!("Analysis log is empty, nothing to report");
        return Ok(());
    }

    let reporter = WeeklyReporter::new(backend, config.weekly.window_size);
    let (stats, record) = reporter.build_weekly_report(&rows).await?;
    info!(
        avg_btc = stats.avg_btc,
        avg_eth = stats.avg_eth,
        counts = %stats.sentiment_counts,
        sentiment = %record.sentiment,
        "Weekly report generated"
    );

    let date = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
    store
        .append_weekly(&date, &stats, &record)
        .context("Failed to append weekly report")?;

    Ok(())
}
