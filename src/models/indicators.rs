use crate::indicators::IndicatorError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const DEFAULT_EMA_SHORT_PERIOD: usize = 20;
pub const DEFAULT_EMA_LONG_PERIOD: usize = 50;
pub const DEFAULT_RSI_PERIOD: usize = 14;

/// Look-back periods used by the indicator engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorConfig {
    pub ema_short_period: usize,
    pub ema_long_period: usize,
    pub rsi_period: usize,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            ema_short_period: DEFAULT_EMA_SHORT_PERIOD,
            ema_long_period: DEFAULT_EMA_LONG_PERIOD,
            rsi_period: DEFAULT_RSI_PERIOD,
        }
    }
}

impl IndicatorConfig {
    /// Fewest bars the engine accepts.
    pub fn min_window(&self) -> usize {
        self.ema_short_period
    }

    pub fn validate(&self) -> Result<(), IndicatorError> {
        if self.ema_short_period == 0 || self.ema_long_period == 0 || self.rsi_period == 0 {
            return Err(IndicatorError::InvalidConfig(
                "indicator periods must be at least 1".to_string(),
            ));
        }
        if self.ema_short_period >= self.ema_long_period {
            return Err(IndicatorError::InvalidConfig(format!(
                "short EMA period ({}) must be below long EMA period ({})",
                self.ema_short_period, self.ema_long_period
            )));
        }
        // RSI must be available for every series that passes the minimum window.
        if self.rsi_period + 1 > self.min_window() {
            return Err(IndicatorError::InvalidConfig(format!(
                "RSI period ({}) needs {} closes, more than the short EMA period ({})",
                self.rsi_period,
                self.rsi_period + 1,
                self.ema_short_period
            )));
        }
        Ok(())
    }
}

/// Indicator values as of the most recent bar of a series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    pub ema_short: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ema_long: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rsi: Option<f64>,
    pub as_of: NaiveDate,
    pub ema_short_period: usize,
    pub ema_long_period: usize,
    pub rsi_period: usize,
}

impl IndicatorSnapshot {
    /// Snapshot labelled with the default periods.
    pub fn new(ema_short: f64, ema_long: Option<f64>, rsi: Option<f64>, as_of: NaiveDate) -> Self {
        Self {
            ema_short,
            ema_long,
            rsi,
            as_of,
            ema_short_period: DEFAULT_EMA_SHORT_PERIOD,
            ema_long_period: DEFAULT_EMA_LONG_PERIOD,
            rsi_period: DEFAULT_RSI_PERIOD,
        }
    }

    pub fn with_periods(mut self, config: &IndicatorConfig) -> Self {
        self.ema_short_period = config.ema_short_period;
        self.ema_long_period = config.ema_long_period;
        self.rsi_period = config.rsi_period;
        self
    }
}

/// Row written next to a price row. MACD and SMA are not computed yet and
/// stay empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRow {
    pub rsi: Option<f64>,
    pub macd: Option<f64>,
    pub sma: Option<f64>,
    pub ema: Option<f64>,
}

impl From<&IndicatorSnapshot> for AnalysisRow {
    fn from(snapshot: &IndicatorSnapshot) -> Self {
        Self {
            rsi: snapshot.rsi,
            macd: None,
            sma: None,
            ema: Some(snapshot.ema_short),
        }
    }
}
