//! Per-ticker pipeline: fetch, normalize, compute, classify, persist.
//!
//! Tickers run one after another. Each ticker's outcome is reported on its
//! own; nothing a single ticker does aborts the batch. Cancelling between
//! tickers is safe, cancelling inside one can leave price rows without their
//! analysis and signal rows.

use crate::config::PipelineConfig;
use crate::error::{PipelineError, SinkError};
use crate::indicators::{IndicatorEngine, IndicatorError};
use crate::models::{AnalysisRow, IndicatorSnapshot, PriceRowKey, SignalVerdict};
use crate::series;
use crate::services::{HistoryProvider, PersistenceSink};
use crate::signals;
use chrono::NaiveDate;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Provider returned no history.
    MissingUpstreamData,
    InsufficientData { required: usize, available: usize },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MissingUpstreamData => f.write_str("no data"),
            SkipReason::InsufficientData { required, available } => write!(
                f,
                "insufficient data (need >={} closes, got {})",
                required, available
            ),
        }
    }
}

#[derive(Debug)]
pub enum ProcessingOutcome {
    Completed {
        ticker: String,
        date: NaiveDate,
        snapshot: IndicatorSnapshot,
        verdict: SignalVerdict,
    },
    Skipped {
        ticker: String,
        reason: SkipReason,
    },
    Failed {
        ticker: String,
        error: PipelineError,
    },
}

impl ProcessingOutcome {
    pub fn ticker(&self) -> &str {
        match self {
            ProcessingOutcome::Completed { ticker, .. }
            | ProcessingOutcome::Skipped { ticker, .. }
            | ProcessingOutcome::Failed { ticker, .. } => ticker,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, ProcessingOutcome::Completed { .. })
    }

    pub fn verdict(&self) -> Option<&SignalVerdict> {
        match self {
            ProcessingOutcome::Completed { verdict, .. } => Some(verdict),
            _ => None,
        }
    }

    /// One human-readable line for the batch summary.
    pub fn status_line(&self) -> String {
        match self {
            ProcessingOutcome::Completed {
                ticker,
                date,
                verdict,
                ..
            } => format!(
                "Processed {} on {}: {} ({})",
                ticker, date, verdict.signal_type, verdict.reason
            ),
            ProcessingOutcome::Skipped { ticker, reason } => {
                format!("Skipped {}: {}", ticker, reason)
            }
            ProcessingOutcome::Failed { ticker, error } => {
                format!("Failed {}: {}", ticker, error)
            }
        }
    }
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<ProcessingOutcome>,
}

impl BatchReport {
    pub fn completed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_completed()).count()
    }

    pub fn skipped(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, ProcessingOutcome::Skipped { .. }))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, ProcessingOutcome::Failed { .. }))
            .count()
    }
}

pub struct SignalPipeline {
    config: Arc<PipelineConfig>,
    engine: IndicatorEngine,
    provider: Arc<dyn HistoryProvider>,
    sink: Arc<dyn PersistenceSink>,
}

impl SignalPipeline {
    pub fn new(
        config: Arc<PipelineConfig>,
        provider: Arc<dyn HistoryProvider>,
        sink: Arc<dyn PersistenceSink>,
    ) -> Result<Self, IndicatorError> {
        let engine = IndicatorEngine::new(config.indicators)?;
        Ok(Self {
            config,
            engine,
            provider,
            sink,
        })
    }

    /// Process every ticker in order, always running to the end.
    pub async fn process_batch(&self, tickers: &[String]) -> BatchReport {
        let mut report = BatchReport::default();
        for ticker in tickers {
            report.outcomes.push(self.process(ticker).await);
        }

        info!(
            completed = report.completed(),
            skipped = report.skipped(),
            failed = report.failed(),
            "batch finished"
        );
        report
    }

    pub async fn process(&self, ticker: &str) -> ProcessingOutcome {
        match self.run(ticker).await {
            Ok(outcome) => outcome,
            Err(error) => {
                error!(symbol = %ticker, error = %error, "ticker processing failed");
                ProcessingOutcome::Failed {
                    ticker: ticker.to_string(),
                    error,
                }
            }
        }
    }

    async fn run(&self, ticker: &str) -> Result<ProcessingOutcome, PipelineError> {
        let quote = self.config.quote_symbol(ticker);
        info!(symbol = %ticker, quote = %quote, "fetching history");

        let raw = self
            .provider
            .fetch(&quote, &self.config.period, &self.config.interval)
            .await?;
        if raw.is_empty() {
            warn!(symbol = %ticker, "no data");
            return Ok(skipped(ticker, SkipReason::MissingUpstreamData));
        }

        let series = series::normalize(&raw);
        debug!(symbol = %ticker, raw = raw.len(), bars = series.len(), "normalized history");

        let snapshot = match self.engine.compute_latest(&series) {
            Ok(snapshot) => snapshot,
            Err(IndicatorError::InsufficientData { required, available }) => {
                warn!(symbol = %ticker, required, available, "insufficient data");
                return Ok(skipped(
                    ticker,
                    SkipReason::InsufficientData { required, available },
                ));
            }
            Err(e) => return Err(e.into()),
        };
        let verdict = signals::classify(&snapshot);
        let date = snapshot.as_of;

        for bar in series.bars() {
            if let Err(e) = self.sink.upsert_price(ticker, bar).await {
                warn!(symbol = %ticker, date = %bar.date, operation = e.operation, error = %e.message, "price upsert failed");
            }
        }

        let key = self.resolve_key(ticker, date).await?;
        self.persist_analysis(ticker, date, key, &snapshot, &verdict)
            .await?;

        info!(
            symbol = %ticker,
            date = %date,
            signal = %verdict.signal_type,
            confidence = verdict.confidence,
            reason = %verdict.reason,
            "signal stored"
        );

        Ok(ProcessingOutcome::Completed {
            ticker: ticker.to_string(),
            date,
            snapshot,
            verdict,
        })
    }

    async fn resolve_key(&self, ticker: &str, date: NaiveDate) -> Result<PriceRowKey, PipelineError> {
        let not_found = || PipelineError::JoinKeyNotFound {
            ticker: ticker.to_string(),
            date,
        };

        match self.sink.price_row_key(ticker, date).await {
            Ok(Some(key)) => Ok(key),
            Ok(None) => Err(not_found()),
            Err(e) => {
                warn!(symbol = %ticker, date = %date, operation = e.operation, error = %e.message, "price row lookup failed");
                Err(not_found())
            }
        }
    }

    /// Both rows are attempted; the first failure is reported.
    async fn persist_analysis(
        &self,
        ticker: &str,
        date: NaiveDate,
        key: PriceRowKey,
        snapshot: &IndicatorSnapshot,
        verdict: &SignalVerdict,
    ) -> Result<(), PipelineError> {
        let analysis = self
            .sink
            .insert_analysis(key, &AnalysisRow::from(snapshot))
            .await;
        let signal = self.sink.insert_signal(key, verdict).await;

        let failures: Vec<SinkError> = [analysis, signal]
            .into_iter()
            .filter_map(Result::err)
            .collect();
        for e in &failures {
            error!(symbol = %ticker, date = %date, key = %key, operation = e.operation, error = %e.message, "insert failed");
        }

        match failures.into_iter().next() {
            Some(source) => Err(PipelineError::Persistence {
                ticker: ticker.to_string(),
                date,
                source,
            }),
            None => Ok(()),
        }
    }
}

fn skipped(ticker: &str, reason: SkipReason) -> ProcessingOutcome {
    ProcessingOutcome::Skipped {
        ticker: ticker.to_string(),
        reason,
    }
}
