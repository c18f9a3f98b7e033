//! EMA (Exponential Moving Average) indicator

/// Streaming EMA.
///
/// The first value is the simple average of the first `period` closes; after
/// that `ema = close * alpha + prev * (1 - alpha)` with `alpha = 2 / (period + 1)`.
#[derive(Debug, Clone)]
pub struct Ema {
    period: usize,
    alpha: f64,
    seed_sum: f64,
    seen: usize,
    value: Option<f64>,
}

impl Ema {
    pub fn new(period: usize) -> Self {
        let period = period.max(1);
        Self {
            period,
            alpha: 2.0 / (period as f64 + 1.0),
            seed_sum: 0.0,
            seen: 0,
            value: None,
        }
    }

    /// Feed the next close; returns the EMA once `period` closes were seen.
    pub fn update(&mut self, close: f64) -> Option<f64> {
        self.seen += 1;
        self.value = match self.value {
            Some(prev) => Some(close * self.alpha + prev * (1.0 - self.alpha)),
            None => {
                self.seed_sum += close;
                (self.seen == self.period).then(|| self.seed_sum / self.period as f64)
            }
        };
        self.value
    }

    pub fn value(&self) -> Option<f64> {
        self.value
    }
}

/// Latest EMA over `closes`, `None` when fewer than `period` closes are given.
pub fn calculate_ema(closes: &[f64], period: usize) -> Option<f64> {
    if period == 0 || closes.len() < period {
        return None;
    }

    let mut ema = Ema::new(period);
    for &close in closes {
        ema.update(close);
    }
    ema.value()
}
