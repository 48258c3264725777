//! Descriptive statistics over the trailing window of an evaluated series.
//!
//! Every function takes the evaluated sequence and an optional window
//! length. `None` (or `Some(0)`) means the whole sequence. Otherwise the
//! window runs from the last index down to `last - len` inclusive, so it
//! holds `len + 1` observations when the sequence is long enough. An
//! empty sequence yields
//! `0.0` from every statistic. Missing or non-numeric `y` values are `NaN`
//! and propagate through the arithmetic untouched.
//!
//! ```
//! use windowed_series::trends;
//!
//! let ys = [1.0, 2.0, 3.0];
//! assert_eq!(trends::mean(&ys, None), 2.0);
//! assert_eq!(trends::max(&ys, None), 3.0);
//! assert_eq!(trends::mean(&ys, Some(1)), 2.5);
//! ```

use indexmap::IndexMap;
use serde::Serialize;

/// Anything carrying a numeric `y`.
pub trait Observation {
    /// The observed value; `NaN` when absent.
    fn y(&self) -> f64;
}

impl Observation for f64 {
    fn y(&self) -> f64 {
        *self
    }
}

/// Indices `max(last - len, 0)..=last` (everything when `len` is `None` or 0).
fn window<T>(values: &[T], len: Option<usize>) -> Option<&[T]> {
    let last = values.len().checked_sub(1)?;
    let length = match len {
        Some(n) if n > 0 => n,
        _ => values.len(),
    };
    let start = last.saturating_sub(length);
    Some(&values[start..])
}

/// `y` values of the window, newest first.
fn newest_first<T: Observation>(window: &[T]) -> impl Iterator<Item = f64> + '_ {
    window.iter().rev().map(Observation::y)
}

pub fn mean<T: Observation>(values: &[T], len: Option<usize>) -> f64 {
    let Some(w) = window(values, len) else {
        return 0.0;
    };
    newest_first(w).sum::<f64>() / w.len() as f64
}

/// Population variance, `E[y²] - E[y]²`.
pub fn variance<T: Observation>(values: &[T], len: Option<usize>) -> f64 {
    let Some(w) = window(values, len) else {
        return 0.0;
    };
    let count = w.len() as f64;
    let (total, square) = newest_first(w).fold((0.0, 0.0), |(t, s), y| (t + y, s + y * y));
    square / count - (total / count).powi(2)
}

/// Square root of [`variance`]. A slightly negative variance left by
/// rounding reads as 0 rather than NaN.
pub fn standard_deviation<T: Observation>(values: &[T], len: Option<usize>) -> f64 {
    let v = variance(values, len);
    // rounding can leave a constant window slightly below zero
    if v < 0.0 { 0.0 } else { v.sqrt() }
}

pub fn max<T: Observation>(values: &[T], len: Option<usize>) -> f64 {
    let Some(w) = window(values, len) else {
        return 0.0;
    };
    newest_first(w).fold(f64::NEG_INFINITY, |acc, y| extremum(acc, y, f64::max))
}

pub fn min<T: Observation>(values: &[T], len: Option<usize>) -> f64 {
    let Some(w) = window(values, len) else {
        return 0.0;
    };
    newest_first(w).fold(f64::INFINITY, |acc, y| extremum(acc, y, f64::min))
}

/// `f64::max`/`min` skip NaN; a NaN observation poisons the result instead.
fn extremum(acc: f64, y: f64, pick: fn(f64, f64) -> f64) -> f64 {
    if acc.is_nan() || y.is_nan() { f64::NAN } else { pick(acc, y) }
}

/// Upper-middle element of the distinct `y` values, ordered by their
/// lookup-key text.
///
/// This is not the statistical median: values are deduplicated first,
/// ordered as text (`10 < 100 < 9`), and the element at `ceil(n / 2)` is
/// returned. A window holding a single distinct value has no element at
/// that index and yields `NaN`.
pub fn median<T: Observation>(values: &[T], len: Option<usize>) -> f64 {
    let Some(w) = window(values, len) else {
        return 0.0;
    };
    let mut distinct: Vec<f64> = Vec::new();
    for y in newest_first(w) {
        if !distinct.iter().any(|d| *d == y) {
            distinct.push(y);
        }
    }
    if distinct.is_empty() {
        return 0.0;
    }
    distinct.sort_by_cached_key(|y| lookup_key(*y));
    distinct
        .get(distinct.len().div_ceil(2))
        .copied()
        .unwrap_or(f64::NAN)
}

/// Most frequent `y` value. Ties go to the value seen first when scanning
/// from the newest observation backwards.
pub fn mode<T: Observation>(values: &[T], len: Option<usize>) -> f64 {
    let Some(w) = window(values, len) else {
        return 0.0;
    };
    let mut counts: IndexMap<String, (f64, usize)> = IndexMap::new();
    for y in newest_first(w) {
        counts.entry(lookup_key(y)).or_insert((y, 0)).1 += 1;
    }

    let mut best = (0.0, 0);
    for &(y, count) in counts.values() {
        if count > best.1 {
            best = (y, count);
        }
    }
    best.0
}

/// Canonical text for a `y` value; equal numbers share one key.
///
/// Magnitudes of `1e21` and above or below `1e-6` use exponent notation
/// with an explicit sign (`1e+21`, `1.5e-7`); everything else is plain
/// decimal.
pub fn lookup_key(y: f64) -> String {
    if y.is_nan() {
        "NaN".to_string()
    } else if y.is_infinite() {
        let key = if y > 0.0 { "Infinity" } else { "-Infinity" };
        key.to_string()
    } else if y == 0.0 {
        "0".to_string()
    } else if y.abs() >= 1e21 || y.abs() < 1e-6 {
        let sci = format!("{y:e}");
        match sci.split_once('e') {
            Some((mantissa, exp)) if !exp.starts_with('-') => format!("{mantissa}e+{exp}"),
            _ => sci,
        }
    } else {
        format!("{y}")
    }
}

/// All statistics for a single window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendSummary {
    /// Observations inside the window.
    pub count: usize,
    pub mean: f64,
    pub variance: f64,
    pub standard_deviation: f64,
    pub min: f64,
    pub max: f64,
    pub median: f64,
    pub mode: f64,
}

impl TrendSummary {
    /// Every statistic over the same window of `values`.
    pub fn compute<T: Observation>(values: &[T], len: Option<usize>) -> Self {
        Self {
            count: window(values, len).map_or(0, <[T]>::len),
            mean: mean(values, len),
            variance: variance(values, len),
            standard_deviation: standard_deviation(values, len),
            min: min(values, len),
            max: max(values, len),
            median: median(values, len),
            mode: mode(values, len),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EMPTY: [f64; 0] = [];

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn empty_sequence_is_zero_everywhere() {
        assert_eq!(mean(&EMPTY, None), 0.0);
        assert_eq!(variance(&EMPTY, Some(3)), 0.0);
        assert_eq!(standard_deviation(&EMPTY, None), 0.0);
        assert_eq!(max(&EMPTY, None), 0.0);
        assert_eq!(min(&EMPTY, None), 0.0);
        assert_eq!(median(&EMPTY, None), 0.0);
        assert_eq!(mode(&EMPTY, None), 0.0);
        assert_eq!(TrendSummary::compute(&EMPTY, None).count, 0);
    }

    #[test]
    fn basic_moments() {
        let ys = [1.0, 2.0, 3.0];
        assert_eq!(mean(&ys, None), 2.0);
        assert!(close(variance(&ys, None), 2.0 / 3.0));
        assert!(close(standard_deviation(&ys, None), (2.0f64 / 3.0).sqrt()));
        assert_eq!(max(&ys, None), 3.0);
        assert_eq!(min(&ys, None), 1.0);
    }

    #[test]
    fn trailing_window() {
        let ys = [100.0, 1.0, 2.0, 3.0];
        // last index 3, len 3 -> indices 3..=0
        assert_eq!(mean(&ys, Some(3)), 26.5);
        assert_eq!(max(&ys, Some(3)), 100.0);
        // len 2 -> indices 3..=1
        assert_eq!(mean(&ys, Some(2)), 2.0);
        assert_eq!(max(&ys, Some(2)), 3.0);
        assert_eq!(max(&ys, Some(0)), 100.0);
        assert_eq!(mean(&ys, Some(10)), 26.5);

        assert_eq!(mean(&[10.0, 1.0, 2.0, 3.0, 4.0], Some(2)), 3.0);
        assert_eq!(TrendSummary::compute(&[10.0, 1.0, 2.0, 3.0, 4.0], Some(2)).count, 3);
        assert_eq!(mean(&[7.0], Some(1)), 7.0);
    }

    #[test]
    fn extrema_of_negative_values() {
        let ys = [-5.0, -2.0, -9.0];
        assert_eq!(max(&ys, None), -2.0);
        assert_eq!(min(&ys, None), -9.0);
    }

    #[test]
    fn nan_propagates() {
        let ys = [1.0, f64::NAN, 3.0];
        assert!(mean(&ys, None).is_nan());
        assert!(max(&ys, None).is_nan());
        assert!(min(&ys, None).is_nan());
        assert!(mean(&ys, Some(1)).is_nan());
        assert_eq!(mean(&[1.0, f64::NAN, 3.0, 5.0], Some(1)), 4.0);
    }

    #[test]
    fn constant_window_has_zero_deviation() {
        let ys = [0.1, 0.1, 0.1];
        let sd = standard_deviation(&ys, None);
        assert!(!sd.is_nan());
        assert!(sd < 1e-9);
    }

    #[test]
    fn median_uses_text_order_and_upper_index() {
        // distinct, text-ordered: ["1", "2", "3"] -> index 2
        assert_eq!(median(&[3.0, 1.0, 2.0, 2.0], None), 3.0);
        // ["10", "100", "9"] -> index 2
        assert_eq!(median(&[10.0, 9.0, 100.0], None), 9.0);
        // ["1", "2"] -> index 1
        assert_eq!(median(&[1.0, 2.0], None), 2.0);
        // one distinct value -> past the end
        assert!(median(&[4.0, 4.0], None).is_nan());
    }

    #[test]
    fn mode_prefers_highest_count_then_first_seen() {
        assert_eq!(mode(&[1.0, 1.0, 2.0], None), 1.0);
        // scanned newest first: 2 is seen before 1
        assert_eq!(mode(&[1.0, 2.0], None), 2.0);
        assert_eq!(mode(&[5.0, 7.0, 7.0, 5.0, 3.0], None), 5.0);
        assert_eq!(mode(&[0.0, -0.0, 1.0], None), 0.0);
    }

    #[test]
    fn lookup_keys() {
        assert_eq!(lookup_key(1.0), "1");
        assert_eq!(lookup_key(1.5), "1.5");
        assert_eq!(lookup_key(-0.0), "0");
        assert_eq!(lookup_key(f64::NAN), "NaN");
        assert_eq!(lookup_key(f64::NEG_INFINITY), "-Infinity");
        assert_eq!(lookup_key(1e21), "1e+21");
        assert_eq!(lookup_key(-2e22), "-2e+22");
        assert_eq!(lookup_key(1e-7), "1e-7");
        assert_eq!(lookup_key(1.5e-7), "1.5e-7");
        assert_eq!(lookup_key(1e-6), "0.000001");
        assert_eq!(lookup_key(123456789012345680000.0), "123456789012345680000");
    }

    #[test]
    fn median_orders_exponent_keys_as_text() {
        // keys "0.2" < "0.5" < "1e-7" < "3" -> index 2
        assert_eq!(median(&[1e-7, 0.5, 0.2, 3.0], None), 1e-7);
        // keys "1.5" < "1e+21" < "2" -> index 2
        assert_eq!(median(&[2.0, 1e21, 1.5], None), 2.0);
    }

    #[test]
    fn summary_matches_individual_statistics() {
        let ys = [4.0, 8.0, 8.0, 1.0];
        let s = TrendSummary::compute(&ys, Some(2));
        assert_eq!(s.count, 3);
        assert_eq!(s.mean, mean(&ys, Some(2)));
        assert_eq!(s.variance, variance(&ys, Some(2)));
        assert_eq!(s.max, 8.0);
        assert_eq!(s.min, 1.0);
        assert_eq!(s.mode, 8.0);
    }
}
