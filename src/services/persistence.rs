//! Persistence sink for price rows, analysis rows and signals.

use crate::error::SinkError;
use crate::models::{AnalysisRow, Bar, PriceRowKey, SignalVerdict};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use tokio::sync::RwLock;

#[async_trait]
pub trait PersistenceSink: Send + Sync {
    /// Idempotent write keyed by `(ticker, bar.date)`.
    async fn upsert_price(&self, ticker: &str, bar: &Bar) -> Result<(), SinkError>;

    async fn insert_analysis(&self, key: PriceRowKey, row: &AnalysisRow) -> Result<(), SinkError>;

    async fn insert_signal(&self, key: PriceRowKey, verdict: &SignalVerdict) -> Result<(), SinkError>;

    /// `Ok(None)` when no price row exists for `(ticker, date)`.
    async fn price_row_key(
        &self,
        ticker: &str,
        date: NaiveDate,
    ) -> Result<Option<PriceRowKey>, SinkError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct StoredPrice {
    pub key: PriceRowKey,
    pub ticker: String,
    pub bar: Bar,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StoredSignal {
    pub key: PriceRowKey,
    pub verdict: SignalVerdict,
}

#[derive(Default)]
struct Tables {
    next_key: i64,
    prices: HashMap<(String, NaiveDate), StoredPrice>,
    analysis: Vec<(PriceRowKey, AnalysisRow)>,
    signals: Vec<StoredSignal>,
}

/// In-process sink. Price rows get sequential keys that survive re-upserts.
#[derive(Default)]
pub struct MemorySink {
    tables: RwLock<Tables>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Price rows ordered by key.
    pub async fn prices(&self) -> Vec<StoredPrice> {
        let tables = self.tables.read().await;
        let mut rows: Vec<StoredPrice> = tables.prices.values().cloned().collect();
        rows.sort_by_key(|row| row.key);
        rows
    }

    pub async fn analysis_rows(&self) -> Vec<(PriceRowKey, AnalysisRow)> {
        self.tables.read().await.analysis.clone()
    }

    pub async fn signals(&self) -> Vec<StoredSignal> {
        self.tables.read().await.signals.clone()
    }
}

#[async_trait]
impl PersistenceSink for MemorySink {
    async fn upsert_price(&self, ticker: &str, bar: &Bar) -> Result<(), SinkError> {
        let ticker = ticker.to_uppercase();
        let mut tables = self.tables.write().await;
        let tables = &mut *tables;

        match tables.prices.get_mut(&(ticker.clone(), bar.date)) {
            Some(existing) => existing.bar = bar.clone(),
            None => {
                tables.next_key += 1;
                let row = StoredPrice {
                    key: PriceRowKey(tables.next_key),
                    ticker: ticker.clone(),
                    bar: bar.clone(),
                };
                tables.prices.insert((ticker, bar.date), row);
            }
        }
        Ok(())
    }

    async fn insert_analysis(&self, key: PriceRowKey, row: &AnalysisRow) -> Result<(), SinkError> {
        self.tables.write().await.analysis.push((key, row.clone()));
        Ok(())
    }

    async fn insert_signal(&self, key: PriceRowKey, verdict: &SignalVerdict) -> Result<(), SinkError> {
        self.tables.write().await.signals.push(StoredSignal {
            key,
            verdict: verdict.clone(),
        });
        Ok(())
    }

    async fn price_row_key(
        &self,
        ticker: &str,
        date: NaiveDate,
    ) -> Result<Option<PriceRowKey>, SinkError> {
        let tables = self.tables.read().await;
        Ok(tables
            .prices
            .get(&(ticker.to_uppercase(), date))
            .map(|row| row.key))
    }
}
