//! Daily trend/momentum signals for exchange-listed stocks.
//!
//! Raw history is normalized into a [`models::PriceSeries`], reduced to an
//! [`models::IndicatorSnapshot`] (EMA short/long, RSI), classified into a
//! BUY/SELL/HOLD [`models::SignalVerdict`] and handed to a persistence sink.

pub mod config;
pub mod core;
pub mod error;
pub mod indicators;
pub mod logging;
pub mod models;
pub mod series;
pub mod services;
pub mod signals;

pub use config::PipelineConfig;
pub use crate::core::{BatchReport, ProcessingOutcome, SignalPipeline, SkipReason};
pub use error::{ConfigError, PipelineError, ProviderError, SinkError};
