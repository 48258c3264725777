//! Ready-made [`DataSource`](crate::source::DataSource) implementations.
//!
//! - [`bar`]: OHLCV bars for a single symbol
//! - [`json`]: arrays of JSON objects, keyed by property name

pub mod bar;
pub mod json;
