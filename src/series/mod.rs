//! Turns raw provider history into a clean daily series.

use crate::models::{Bar, PriceSeries, RawBar};
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::BTreeMap;

/// Sort by date, drop unusable rows and collapse duplicate dates.
///
/// A record is dropped when its date cannot be parsed or its close is
/// missing, non-finite or negative. When a date occurs more than once the
/// record seen last wins. Missing or invalid open/high/low fall back to the
/// close; an invalid volume is dropped.
pub fn normalize(raw: &[RawBar]) -> PriceSeries {
    let mut by_date: BTreeMap<NaiveDate, Bar> = BTreeMap::new();

    for record in raw {
        let Some(bar) = to_bar(record) else {
            continue;
        };
        by_date.insert(bar.date, bar);
    }

    PriceSeries::from_sorted(by_date.into_values().collect())
}

fn to_bar(record: &RawBar) -> Option<Bar> {
    let date = parse_date(&record.date)?;
    let close = valid(record.close)?;

    let bar = Bar::new(
        date,
        valid(record.open).unwrap_or(close),
        valid(record.high).unwrap_or(close),
        valid(record.low).unwrap_or(close),
        close,
    );
    Some(match valid(record.volume) {
        Some(volume) => bar.with_volume(volume),
        None => bar,
    })
}

fn valid(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v >= 0.0)
}

/// Accepts `YYYY-MM-DD` or an RFC 3339 timestamp (reduced to its UTC day).
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date);
    }
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|ts| ts.with_timezone(&Utc).date_naive())
}
