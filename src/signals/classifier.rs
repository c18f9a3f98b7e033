//! Rule-based BUY/SELL/HOLD classification of an indicator snapshot.

use crate::models::{IndicatorSnapshot, SignalType, SignalVerdict};

pub const RSI_BUY_ABOVE: f64 = 50.0;
pub const RSI_SELL_BELOW: f64 = 40.0;

pub const CONFIDENCE_CONFIRMED: u8 = 80;
pub const CONFIDENCE_UNCONFIRMED: u8 = 60;
pub const CONFIDENCE_NO_SIGNAL: u8 = 50;

pub const NO_SIGNAL_REASON: &str = "No strong signal";

/// Classify a snapshot. Rules are checked in order, first match wins:
///
/// 1. short EMA above long EMA and RSI above 50: BUY (80)
/// 2. short EMA below long EMA and RSI below 40: SELL (80)
/// 3. short EMA above long EMA: HOLD (60), uptrend not confirmed
/// 4. otherwise with all values present: HOLD (60), downtrend not confirmed
/// 5. long EMA or RSI missing: HOLD (50)
pub fn classify(snapshot: &IndicatorSnapshot) -> SignalVerdict {
    let (Some(ema_long), Some(rsi)) = (snapshot.ema_long, snapshot.rsi) else {
        return SignalVerdict::new(SignalType::Hold, CONFIDENCE_NO_SIGNAL, NO_SIGNAL_REASON);
    };
    let ema_short = snapshot.ema_short;
    let short = format!("EMA{}", snapshot.ema_short_period);
    let long = format!("EMA{}", snapshot.ema_long_period);

    if ema_short > ema_long && rsi > RSI_BUY_ABOVE {
        SignalVerdict::new(
            SignalType::Buy,
            CONFIDENCE_CONFIRMED,
            format!(
                "{short} ({ema_short:.2}) > {long} ({ema_long:.2}), RSI {rsi:.1} > {}",
                RSI_BUY_ABOVE
            ),
        )
    } else if ema_short < ema_long && rsi < RSI_SELL_BELOW {
        SignalVerdict::new(
            SignalType::Sell,
            CONFIDENCE_CONFIRMED,
            format!(
                "{short} ({ema_short:.2}) < {long} ({ema_long:.2}), RSI {rsi:.1} < {}",
                RSI_SELL_BELOW
            ),
        )
    } else if ema_short > ema_long {
        SignalVerdict::new(
            SignalType::Hold,
            CONFIDENCE_UNCONFIRMED,
            format!("Uptrend {short}>{long} but RSI {rsi:.1} not confirming"),
        )
    } else {
        SignalVerdict::new(
            SignalType::Hold,
            CONFIDENCE_UNCONFIRMED,
            format!("Downtrend {short}<{long} but RSI {rsi:.1} not confirming"),
        )
    }
}
