//! Computes the latest EMA/RSI values for a price series in a single pass.

use crate::indicators::error::IndicatorError;
use crate::indicators::momentum::Rsi;
use crate::indicators::trend::Ema;
use crate::models::{IndicatorConfig, IndicatorSnapshot, PriceSeries};

#[derive(Debug, Clone, Default)]
pub struct IndicatorEngine {
    config: IndicatorConfig,
}

impl IndicatorEngine {
    pub fn new(config: IndicatorConfig) -> Result<Self, IndicatorError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Snapshot as of the last bar.
    ///
    /// Fails with `InsufficientData` when the series is shorter than the short
    /// EMA period. A validated config guarantees the RSI is present past that
    /// point; only the long EMA is `None` for series shorter than its period.
    pub fn compute_latest(&self, series: &PriceSeries) -> Result<IndicatorSnapshot, IndicatorError> {
        let required = self.config.min_window();
        let last = match series.last() {
            Some(bar) if series.len() >= required => bar,
            _ => {
                return Err(IndicatorError::InsufficientData {
                    required,
                    available: series.len(),
                })
            }
        };

        let mut ema_short = Ema::new(self.config.ema_short_period);
        let mut ema_long = Ema::new(self.config.ema_long_period);
        let mut rsi = Rsi::new(self.config.rsi_period);

        for close in series.closes() {
            ema_short.update(close);
            ema_long.update(close);
            rsi.update(close);
        }

        let ema_short = ema_short.value().ok_or(IndicatorError::InsufficientData {
            required,
            available: series.len(),
        })?;

        Ok(IndicatorSnapshot::new(ema_short, ema_long.value(), rsi.value(), last.date)
            .with_periods(&self.config))
    }
}
