use crate::indicators::IndicatorError;
use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value:?} ({reason})")]
    InvalidValue {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error(transparent)]
    Indicator(#[from] IndicatorError),
}

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Failed to read history for {symbol}: {source}")]
    Io {
        symbol: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed history for {symbol}: {source}")]
    Parse {
        symbol: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Provider error: {0}")]
    Other(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{operation} failed: {message}")]
pub struct SinkError {
    pub operation: &'static str,
    pub message: String,
}

impl SinkError {
    pub fn new(operation: &'static str, message: impl Into<String>) -> Self {
        Self {
            operation,
            message: message.into(),
        }
    }
}

/// Per-ticker failure. Never aborts a batch.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Fetch failed: {0}")]
    Fetch(#[from] ProviderError),

    #[error("No price row key for {ticker} on {date}")]
    JoinKeyNotFound { ticker: String, date: NaiveDate },

    #[error("Persistence error for {ticker} on {date}: {source}")]
    Persistence {
        ticker: String,
        date: NaiveDate,
        #[source]
        source: SinkError,
    },

    #[error(transparent)]
    Indicator(#[from] IndicatorError),
}
