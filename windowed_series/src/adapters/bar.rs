//! OHLCV bars as a data source.
//!
//! [`BarSeries`] groups a vector of [`Bar`]s with their symbol and
//! [`TimeFrame`] and exposes each bar's columns as named fields, so a
//! series can be bound with e.g. `x = "timestamp"`, `y = "close"`.

use std::{fmt, num::NonZeroU32};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::source::{DataSource, FieldValue};

/// Bar interval granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeFrameUnit {
    Minute,
    Hour,
    Day,
    Week,
    Month,
}

/// A timeframe = amount × unit (e.g., 5-Minute, 1-Day).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeFrame {
    pub amount: NonZeroU32,
    pub unit: TimeFrameUnit,
}

impl TimeFrame {
    pub const fn new(amount: NonZeroU32, unit: TimeFrameUnit) -> Self {
        Self { amount, unit }
    }
}

/// Compact form: `"5m"`, `"1h"`, `"1D"`, `"1W"`, `"6M"`.
impl fmt::Display for TimeFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let u = match self.unit {
            TimeFrameUnit::Minute => "m",
            TimeFrameUnit::Hour => "h",
            TimeFrameUnit::Day => "D",
            TimeFrameUnit::Week => "W",
            TimeFrameUnit::Month => "M",
        };
        write!(f, "{}{u}", self.amount)
    }
}

/// A single time-series bar (OHLCV) for a given timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// The timestamp for this bar (UTC).
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    /// Trade count for the bar. Not all providers supply this.
    pub trade_count: Option<u64>,
    /// Volume-weighted average price. Not all providers supply this.
    pub vwap: Option<f64>,
}

/// A complete set of bars for a single symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarSeries {
    /// The symbol this data represents (e.g., "AAPL", "ESU24").
    pub symbol: String,
    pub timeframe: TimeFrame,
    pub bars: Vec<Bar>,
}

impl BarSeries {
    /// `"AAPL 1D"`.
    pub fn title(&self) -> String {
        format!("{} {}", self.symbol, self.timeframe)
    }
}

impl DataSource for BarSeries {
    type Record = Bar;

    fn data(&self) -> &[Bar] {
        &self.bars
    }

    fn field(&self, bar: &Bar, name: &str) -> FieldValue {
        match name {
            "timestamp" => bar.timestamp.into(),
            "open" => bar.open.into(),
            "high" => bar.high.into(),
            "low" => bar.low.into(),
            "close" => bar.close.into(),
            "volume" => bar.volume.into(),
            "trade_count" => bar.trade_count.into(),
            "vwap" => bar.vwap.into(),
            "symbol" => self.symbol.as_str().into(),
            _ => FieldValue::Missing,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    const D1: NonZeroU32 = match NonZeroU32::new(1) {
        Some(nz) => nz,
        None => unreachable!(),
    };

    fn bar(day: u32, close: f64) -> Bar {
        Bar {
            timestamp: Utc.with_ymd_and_hms(2025, 1, day, 0, 0, 0).unwrap(),
            open: close - 1.0,
            high: close + 1.0,
            low: close - 2.0,
            close,
            volume: 1_000.0,
            trade_count: None,
            vwap: Some(close),
        }
    }

    #[test]
    fn exposes_columns_as_fields() {
        let series = BarSeries {
            symbol: "AAPL".into(),
            timeframe: TimeFrame::new(D1, TimeFrameUnit::Day),
            bars: vec![bar(2, 10.0)],
        };
        let b = &series.bars[0];

        assert_eq!(series.field(b, "close"), FieldValue::Number(10.0));
        assert_eq!(series.field(b, "low"), FieldValue::Number(8.0));
        assert_eq!(series.field(b, "trade_count"), FieldValue::Missing);
        assert_eq!(series.field(b, "vwap"), FieldValue::Number(10.0));
        assert_eq!(series.field(b, "symbol"), FieldValue::Text("AAPL".into()));
        assert_eq!(series.field(b, "timestamp"), FieldValue::Timestamp(b.timestamp));
        assert_eq!(series.field(b, "bid"), FieldValue::Missing);
        assert_eq!(series.title(), "AAPL 1D");
    }
}
