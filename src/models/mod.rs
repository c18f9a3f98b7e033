//! Shared data models spanning the pipeline layers.

pub mod bar;
pub mod indicators;
pub mod signal;

pub use bar::{Bar, PriceSeries, RawBar};
pub use indicators::{AnalysisRow, IndicatorConfig, IndicatorSnapshot};
pub use signal::{PriceRowKey, SignalType, SignalVerdict};
