#![allow(dead_code)]

use std::num::NonZeroU32;

use chrono::{Duration, TimeZone, Utc};
use windowed_series::adapters::bar::{Bar, BarSeries, TimeFrame, TimeFrameUnit};
use windowed_series::source::{DataSource, FieldValue};

/// Two numeric columns, `a` and `b`.
pub struct Pairs(pub Vec<(f64, f64)>);

impl DataSource for Pairs {
    type Record = (f64, f64);

    fn data(&self) -> &[Self::Record] {
        &self.0
    }

    fn field(&self, record: &Self::Record, name: &str) -> FieldValue {
        match name {
            "a" => FieldValue::Number(record.0),
            "b" => FieldValue::Number(record.1),
            _ => FieldValue::Missing,
        }
    }
}

/// Daily bars starting 2025-01-01 with the given closes.
pub fn daily_bars(symbol: &str, closes: &[f64]) -> BarSeries {
    let start = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    let bars = closes
        .iter()
        .enumerate()
        .map(|(i, &close)| Bar {
            timestamp: start + Duration::days(i as i64),
            open: close,
            high: close,
            low: close,
            close,
            volume: 100.0 * (i + 1) as f64,
            trade_count: Some(i as u64),
            vwap: None,
        })
        .collect();
    BarSeries {
        symbol: symbol.to_string(),
        timeframe: TimeFrame::new(NonZeroU32::new(1).unwrap(), TimeFrameUnit::Day),
        bars,
    }
}
