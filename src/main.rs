mod engine;
mod models;
mod storage;
mod types;

use std::io::stderr;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;
use chrono::TimeDelta;
use clap::Parser;
use rust_decimal::Decimal;
use tracing::info;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, Layer};

use crate::engine::{FeatureEngine, FeatureReport};
use crate::models::EnrichedTable;
use crate::storage::CsvStorage;

#[derive(Parser)]
#[command(name = "fraud-feature-engine")]
#[command(about = "Derive fraud indicator columns for card transactions and summarise chargebacks per device")]
struct Cli {
    /// Input transactions CSV
    #[arg(short, long, env = "FRAUD_INPUT")]
    input: PathBuf,

    /// Destination of the enriched transactions CSV
    #[arg(long, env = "FRAUD_ENRICHED_OUTPUT", default_value = "enriched_transaction_analysis.csv")]
    enriched_output: PathBuf,

    /// Destination of the per-device summary CSV
    #[arg(long, env = "FRAUD_SUMMARY_OUTPUT", default_value = "device_summary.csv")]
    summary_output: PathBuf,

    /// Largest gap in minutes between two transactions on a card that counts as high velocity
    #[arg(long, default_value = "3")]
    velocity_minutes: u32,

    /// Percentile level (0 to 1) an amount must exceed to deviate from its card or merchant
    #[arg(long, default_value = "0.95")]
    percentile: Decimal,

    /// Amounts below this are candidate card tests
    #[arg(long, default_value = "5.00")]
    small_amount: Decimal,

    /// The next amount must exceed a candidate test amount by more than this multiple
    #[arg(long, default_value = "8")]
    increase_factor: Decimal,

    /// Number of enriched rows to log once the run completes
    #[arg(long, default_value = "0")]
    preview: usize,

    /// Log level: error, warn, info, debug, trace
    #[arg(long, env = "FRAUD_LOG_LEVEL", default_value = "info", value_parser = parse_log_level)]
    log_level: LevelFilter,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.log_level);

    let storage = CsvStorage::new(&cli.input, &cli.enriched_output, &cli.summary_output);
    let engine = FeatureEngine::new()
        .with_velocity_window(TimeDelta::minutes(i64::from(cli.velocity_minutes)))
        .with_percentile(cli.percentile)
        .with_small_amount_threshold(cli.small_amount)
        .with_increase_factor(cli.increase_factor);

    let timer = Instant::now();
    let output = engine.run(&storage)?;
    let duration = timer.elapsed();

    info!("Processed {} transactions across {} devices in: {duration:?}", output.table.rows.len(), output.summaries.len());

    log_report(&output.report);
    log_preview(&output.table, cli.preview);

    Ok(())
}

fn parse_log_level(level: &str) -> Result<LevelFilter, String> {
    match level.to_lowercase().as_str() {
        "trace" => Ok(LevelFilter::TRACE),
        "debug" => Ok(LevelFilter::DEBUG),
        "info" => Ok(LevelFilter::INFO),
        "warn" => Ok(LevelFilter::WARN),
        "error" => Ok(LevelFilter::ERROR),
        _ => Err(format!("Invalid log level '{level}', expected one of: error, warn, info, debug, trace"))
    }
}

fn setup_logging(level: LevelFilter) {
    //NOTE: stdout is left free so the tool composes with shell pipelines; all logging goes to stderr
    let terminal_log = fmt::layer()
        .with_target(false)
        .with_writer(stderr)
        .with_filter(level);

    tracing_subscriber::registry()
        .with(terminal_log)
        .init();
}

fn log_report(report: &FeatureReport) {
    if let Some(card_tests) = report.feature("is_card_test_attempt") {
        info!("Card testing attempts detected: {}", card_tests.flagged);
    }

    match report.baseline_chargeback_rate() {
        Some(rate) => info!("Chargebacks: {} of {} rows ({:.2}%)", report.chargebacks, report.rows, rate * 100.0),
        None => info!("No transactions to report on")
    }

    for stat in &report.features {
        match stat.chargeback_rate() {
            Some(rate) => info!("{}: {} flagged, {} charged back ({:.2}%)", stat.name, stat.flagged, stat.flagged_chargebacks, rate * 100.0),
            None => info!("{}: nothing flagged", stat.name)
        }
    }
}

fn log_preview(table: &EnrichedTable, rows: usize) {
    for row in table.rows.iter().take(rows) {
        info!(
            "card [{}] has_cbk [{}] is_high_velocity [{}] distinct_cards_per_device [{}] is_card_test_attempt [{}]",
            row.transaction.card_number,
            row.transaction.chargeback,
            row.is_high_velocity,
            row.distinct_cards_per_device,
            row.is_card_test_attempt
        );
    }
}
