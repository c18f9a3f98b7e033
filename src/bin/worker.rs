//! Signal Worker
//!
//! Runs the signal pipeline once over the configured symbols and prints one
//! status line per ticker.

use dotenvy::dotenv;
use idx_signals::logging;
use idx_signals::services::{FileHistoryProvider, HistoryProvider, MemorySink, PersistenceSink};
use idx_signals::{PipelineConfig, SignalPipeline};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env if present
    dotenv().ok();

    let config = Arc::new(PipelineConfig::from_env()?);
    logging::init_logging(&config.environment);

    info!(environment = %config.environment, "Starting signal worker");
    info!(
        symbols = ?config.symbols,
        suffix = %config.exchange_suffix,
        history_dir = %config.history_dir.display(),
        "Symbols: {}",
        config.symbols.join(", ")
    );

    let provider: Arc<dyn HistoryProvider> =
        Arc::new(FileHistoryProvider::new(config.history_dir.clone()));
    // Rows live for this run only; stdout carries the record.
    let sink: Arc<dyn PersistenceSink> = Arc::new(MemorySink::new());

    let pipeline = SignalPipeline::new(config.clone(), provider, sink)?;
    let report = pipeline.process_batch(&config.symbols).await;

    for outcome in &report.outcomes {
        println!("{}", outcome.status_line());
    }
    println!("All done");

    Ok(())
}
