//! Momentum indicators: RSI

pub mod rsi;

pub use rsi::*;
