//! Bind a data source to named fields, project a windowed slice of its
//! records, and compute descriptive statistics over a trailing window.
//!
//! The moving parts:
//! - [`source::DataSource`]: where records and their field values come from
//! - [`series::Series`]: bindings + range evaluation + x-axis ordering
//! - [`trends`]: mean / variance / extrema / median / mode over a trailing window
//! - [`config`]: TOML-backed series definitions
//! - [`adapters`]: ready-made sources for OHLCV bars and JSON rows
//!
//! ```
//! use windowed_series::adapters::json::JsonRows;
//! use windowed_series::series::{EvalRange, Series};
//! use windowed_series::trends;
//!
//! let rows = JsonRows::from_json_str(r#"[{"t":2,"v":4},{"t":1,"v":2},{"t":3,"v":6}]"#).unwrap();
//! let series = Series::new(&rows).with_binding("x", "t").with_binding("y", "v");
//!
//! let points = series.evaluate(Some(EvalRange::Length(-2)));
//! assert_eq!(points.len(), 2);
//! assert_eq!(trends::mean(&points, None), 4.0);
//! ```

pub mod adapters;
pub mod config;
pub mod errors;
pub mod series;
pub mod source;
pub mod trends;
