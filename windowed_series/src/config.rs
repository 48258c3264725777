//! Series definitions: parsing, normalization, and loading.
//!
//! A series definition is a small TOML document describing:
//! - Presentation metadata (`label`, `color`)
//! - The bindings table (output field -> source field)
//! - An optional default evaluation range (`[range]`)
//! - An optional trailing window for the trend statistics (`[trends]`)
//!
//! ```toml
//! label = "AAPL close"
//! color = "#1f77b4"
//!
//! [bindings]
//! x = "timestamp"
//! y = "close"
//!
//! [range]
//! length = -20
//!
//! [trends]
//! window = 10
//! ```
//!
//! Entrypoints:
//! - Parse + normalize from a TOML string: [`load_config_str`]
//! - Parse + normalize from a file path: [`load_config_path`]
//! - Locate the file through the environment: [`config_path_from_env`]

use std::{
    collections::HashSet,
    mem,
    path::{Path, PathBuf},
};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    errors::{Error, Result},
    series::EvalRange,
};

/// Environment variable consulted when no config path is given explicitly.
pub const CONFIG_ENV_VAR: &str = "WINDOWED_SERIES_CONFIG";

/// A complete series definition.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SeriesConfig {
    /// Human-readable series label.
    pub label: Option<String>,
    /// Display color, passed through untouched (e.g. `"#1f77b4"`).
    pub color: Option<String>,
    /// Output field name -> source field name.
    ///
    /// Keys and values are trimmed by [`normalize_config`].
    #[serde(default)]
    pub bindings: IndexMap<String, String>,
    /// Default evaluation range. Absent means the whole source.
    pub range: Option<RangeCfg>,
    /// Trend statistics settings.
    pub trends: Option<TrendsCfg>,
}

/// Either `length = N` or `from = A` / `to = B`, never both.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RangeCfg {
    pub from: Option<i64>,
    pub to: Option<i64>,
    /// Positive: leading records. Negative: trailing records.
    pub length: Option<i64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TrendsCfg {
    /// Trailing window length; absent or 0 uses the whole evaluation.
    pub window: Option<usize>,
}

impl SeriesConfig {
    /// The configured default range, if any.
    pub fn eval_range(&self) -> Option<EvalRange> {
        self.range.map(|r| match r.length {
            Some(length) => EvalRange::Length(length),
            None => EvalRange::Span {
                from: r.from.unwrap_or(0),
                to: r.to,
            },
        })
    }

    /// The configured trend window, if any.
    pub fn trend_window(&self) -> Option<usize> {
        self.trends.and_then(|t| t.window)
    }
}

/// Summary of changes performed during normalization.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct NormalizationReport {
    /// Binding entries whose name or source field changed when trimming.
    pub bindings_trimmed: usize,
    /// `label`/`color` values dropped because they were blank.
    pub metadata_cleared: usize,
}

/// Normalize a series definition in place.
///
/// - Trim binding names and source fields; reject empty ones and names
///   that collide after trimming
/// - Trim `label`/`color`, dropping blank values
/// - Reject a `[range]` that mixes `length` with `from`/`to`
pub fn normalize_config(cfg: &mut SeriesConfig) -> Result<NormalizationReport> {
    let mut report = NormalizationReport::default();

    let mut rebuilt = IndexMap::with_capacity(cfg.bindings.len());
    let mut seen = HashSet::new();
    for (raw_name, raw_field) in mem::take(&mut cfg.bindings) {
        let name = raw_name.trim().to_string();
        let field = raw_field.trim().to_string();
        if name.is_empty() {
            return Err(Error::Config("binding name cannot be empty after trimming".into()));
        }
        if field.is_empty() {
            return Err(Error::Config(format!(
                "binding '{name}' has an empty source field"
            )));
        }
        if !seen.insert(name.clone()) {
            return Err(Error::Config(format!(
                "duplicate binding after normalization: {name}"
            )));
        }
        if name != raw_name || field != raw_field {
            report.bindings_trimmed += 1;
        }
        rebuilt.insert(name, field);
    }
    cfg.bindings = rebuilt;

    for slot in [&mut cfg.label, &mut cfg.color] {
        if let Some(value) = slot.take() {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                report.metadata_cleared += 1;
            } else {
                *slot = Some(trimmed.to_string());
            }
        }
    }

    if let Some(range) = cfg.range {
        if range.length.is_some() && (range.from.is_some() || range.to.is_some()) {
            return Err(Error::Config(
                "range takes either `length` or `from`/`to`, not both".into(),
            ));
        }
    }

    Ok(report)
}

/// Parse and normalize a series definition from a TOML string.
pub fn load_config_str(toml_str: &str) -> Result<SeriesConfig> {
    let mut cfg: SeriesConfig = toml::from_str(toml_str)?;
    let report = normalize_config(&mut cfg)?;
    info!(
        bindings = cfg.bindings.len(),
        trimmed = report.bindings_trimmed,
        cleared = report.metadata_cleared,
        "series config loaded"
    );
    Ok(cfg)
}

/// Read a series definition from disk, parse, and normalize it.
pub fn load_config_path(path: impl AsRef<Path>) -> Result<SeriesConfig> {
    let text = std::fs::read_to_string(path.as_ref())?;
    load_config_str(&text)
}

/// Read the config path from [`CONFIG_ENV_VAR`].
pub fn config_path_from_env() -> Result<PathBuf> {
    std::env::var_os(CONFIG_ENV_VAR)
        .map(PathBuf::from)
        .ok_or_else(|| Error::Config(format!("missing environment variable: {CONFIG_ENV_VAR}")))
}
