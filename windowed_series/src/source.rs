//! Data source abstraction for series evaluation.
//!
//! A [`DataSource`] hands out an ordered snapshot of records and resolves
//! named fields on those records into [`FieldValue`]s. Concrete sources
//! live in [`crate::adapters`]; callers can implement the trait for any
//! record store they already have.
//!
//! # Example
//!
//! ```rust
//! # use windowed_series::source::{DataSource, FieldValue};
//! struct Readings(Vec<(u32, f64)>);
//!
//! impl DataSource for Readings {
//!     type Record = (u32, f64);
//!
//!     fn data(&self) -> &[Self::Record] {
//!         &self.0
//!     }
//!
//!     fn field(&self, record: &Self::Record, name: &str) -> FieldValue {
//!         match name {
//!             "tick" => FieldValue::Number(record.0 as f64),
//!             "reading" => FieldValue::Number(record.1),
//!             _ => FieldValue::Missing,
//!         }
//!     }
//! }
//! ```

use std::{cmp::Ordering, fmt};

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Anything a [`Series`](crate::series::Series) can be bound to.
pub trait DataSource {
    /// Opaque record type; only [`DataSource::field`] looks inside it.
    type Record;

    /// The full, ordered record sequence. Treated as a stable snapshot for
    /// the duration of one evaluation.
    fn data(&self) -> &[Self::Record];

    /// Resolve `name` on `record`. Unknown names yield [`FieldValue::Missing`].
    fn field(&self, record: &Self::Record, name: &str) -> FieldValue;
}

/// A single resolved field value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// The field does not exist on the record (or was `null`).
    Missing,
    /// Any numeric value.
    Number(f64),
    /// Free-form text.
    Text(String),
    /// A UTC instant.
    Timestamp(DateTime<Utc>),
}

impl FieldValue {
    /// `false` only for [`FieldValue::Missing`].
    pub fn is_defined(&self) -> bool {
        !matches!(self, FieldValue::Missing)
    }

    /// Numeric view of the value.
    ///
    /// Text is parsed as `f64`, timestamps become epoch milliseconds, and
    /// anything that cannot be read as a number becomes `NaN` so it
    /// propagates silently through arithmetic.
    pub fn as_number(&self) -> f64 {
        match self {
            FieldValue::Number(n) => *n,
            FieldValue::Text(s) => s.trim().parse().unwrap_or(f64::NAN),
            FieldValue::Timestamp(ts) => ts.timestamp_millis() as f64,
            FieldValue::Missing => f64::NAN,
        }
    }

    /// Three-way comparison used to order records along the x axis.
    ///
    /// Values of the same kind compare naturally. NaN sorts after every
    /// other number, and values of different kinds order by kind
    /// (numbers, timestamps, text, missing) so the result is always a
    /// total order.
    pub fn axis_cmp(&self, other: &FieldValue) -> Ordering {
        use FieldValue::*;
        match (self, other) {
            (Number(a), Number(b)) => match (a.is_nan(), b.is_nan()) {
                (false, false) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
                (true, true) => Ordering::Equal,
                (true, false) => Ordering::Greater,
                (false, true) => Ordering::Less,
            },
            (Timestamp(a), Timestamp(b)) => a.cmp(b),
            (Text(a), Text(b)) => a.cmp(b),
            (Missing, Missing) => Ordering::Equal,
            _ => self.kind_rank().cmp(&other.kind_rank()),
        }
    }

    fn kind_rank(&self) -> u8 {
        match self {
            FieldValue::Number(_) => 0,
            FieldValue::Timestamp(_) => 1,
            FieldValue::Text(_) => 2,
            FieldValue::Missing => 3,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Missing => write!(f, "undefined"),
            FieldValue::Number(n) => write!(f, "{n}"),
            FieldValue::Text(s) => write!(f, "{s}"),
            FieldValue::Timestamp(ts) => write!(f, "{}", ts.to_rfc3339()),
        }
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        FieldValue::Number(n)
    }
}

impl From<u64> for FieldValue {
    fn from(n: u64) -> Self {
        FieldValue::Number(n as f64)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(ts: DateTime<Utc>) -> Self {
        FieldValue::Timestamp(ts)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(FieldValue::Missing, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn numeric_coercion() {
        assert_eq!(FieldValue::Number(2.5).as_number(), 2.5);
        assert_eq!(FieldValue::from(" 7 ").as_number(), 7.0);
        assert!(FieldValue::from("seven").as_number().is_nan());
        assert!(FieldValue::Missing.as_number().is_nan());

        let ts = Utc.with_ymd_and_hms(1970, 1, 1, 0, 0, 1).unwrap();
        assert_eq!(FieldValue::from(ts).as_number(), 1000.0);
    }

    #[test]
    fn axis_order_within_and_across_kinds() {
        let one = FieldValue::Number(1.0);
        let two = FieldValue::Number(2.0);
        let nan = FieldValue::Number(f64::NAN);
        assert_eq!(one.axis_cmp(&two), Ordering::Less);
        assert_eq!(two.axis_cmp(&one), Ordering::Greater);
        assert_eq!(FieldValue::Number(-0.0).axis_cmp(&FieldValue::Number(0.0)), Ordering::Equal);
        assert_eq!(nan.axis_cmp(&two), Ordering::Greater);
        assert_eq!(nan.axis_cmp(&nan), Ordering::Equal);

        assert_eq!(FieldValue::from("b").axis_cmp(&FieldValue::from("a")), Ordering::Greater);
        assert_eq!(one.axis_cmp(&FieldValue::from("a")), Ordering::Less);
        assert_eq!(FieldValue::Missing.axis_cmp(&one), Ordering::Greater);
    }

    #[test]
    fn option_conversion() {
        assert_eq!(FieldValue::from(None::<f64>), FieldValue::Missing);
        assert_eq!(FieldValue::from(Some(3u64)), FieldValue::Number(3.0));
        assert!(!FieldValue::from(None::<String>).is_defined());
    }
}
