//! Process configuration, read once at startup.

use crate::error::ConfigError;
use crate::models::IndicatorConfig;
use std::path::PathBuf;
use std::str::FromStr;

pub const DEFAULT_SYMBOLS: &str = "BBCA,TLKM,BBRI";
pub const DEFAULT_EXCHANGE_SUFFIX: &str = ".JK";
pub const DEFAULT_PERIOD: &str = "6mo";
pub const DEFAULT_INTERVAL: &str = "1d";
pub const DEFAULT_HISTORY_DIR: &str = "data";
pub const DEFAULT_ENVIRONMENT: &str = "sandbox";

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub symbols: Vec<String>,
    /// Appended to each ticker to form the provider's quote symbol.
    pub exchange_suffix: String,
    pub period: String,
    pub interval: String,
    pub history_dir: PathBuf,
    pub environment: String,
    pub indicators: IndicatorConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            symbols: parse_symbols(DEFAULT_SYMBOLS),
            exchange_suffix: DEFAULT_EXCHANGE_SUFFIX.to_string(),
            period: DEFAULT_PERIOD.to_string(),
            interval: DEFAULT_INTERVAL.to_string(),
            history_dir: PathBuf::from(DEFAULT_HISTORY_DIR),
            environment: DEFAULT_ENVIRONMENT.to_string(),
            indicators: IndicatorConfig::default(),
        }
    }
}

impl PipelineConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable source; unset variables keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let text = |name: &str, default: String| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or(default)
        };

        let symbols = lookup("SYMBOLS")
            .map(|raw| parse_symbols(&raw))
            .filter(|symbols| !symbols.is_empty())
            .unwrap_or(defaults.symbols);

        let indicators = IndicatorConfig {
            ema_short_period: number(&lookup, "EMA_SHORT_PERIOD", defaults.indicators.ema_short_period)?,
            ema_long_period: number(&lookup, "EMA_LONG_PERIOD", defaults.indicators.ema_long_period)?,
            rsi_period: number(&lookup, "RSI_PERIOD", defaults.indicators.rsi_period)?,
        };
        indicators.validate()?;

        Ok(Self {
            symbols,
            // An explicitly empty suffix is allowed.
            exchange_suffix: lookup("EXCHANGE_SUFFIX")
                .map(|v| v.trim().to_string())
                .unwrap_or(defaults.exchange_suffix),
            period: text("HISTORY_PERIOD", defaults.period),
            interval: text("HISTORY_INTERVAL", defaults.interval),
            history_dir: PathBuf::from(text(
                "HISTORY_DIR",
                defaults.history_dir.to_string_lossy().into_owned(),
            )),
            environment: text("ENVIRONMENT", defaults.environment),
            indicators,
        })
    }

    pub fn is_production(&self) -> bool {
        matches!(self.environment.as_str(), "production" | "prod")
    }

    pub fn quote_symbol(&self, ticker: &str) -> String {
        format!("{}{}", ticker, self.exchange_suffix)
    }
}

/// Comma-separated list, trimmed, blanks removed.
pub fn parse_symbols(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn number<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(name) {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            name,
            reason: e.to_string(),
            value,
        }),
    }
}
