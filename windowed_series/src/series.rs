//! Series: a data source bound to named output fields.
//!
//! A [`Series`] does not own its data. It borrows a [`DataSource`], keeps a
//! mapping of output-field-name to source-field-name (the *bindings*), and
//! on [`Series::evaluate`] projects a window of the source's records into
//! fresh [`ProjectedRecord`]s. When the projection carries an `x` field the
//! result is ordered along that axis.

use std::{cmp::Ordering, fmt, ops::Range};

use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::{
    config::SeriesConfig,
    source::{DataSource, FieldValue},
    trends::Observation,
};

/// Output field name -> source field name.
pub type Bindings = IndexMap<String, String>;

/// Output field that drives ordering.
pub const X_FIELD: &str = "x";
/// Output field the trend statistics read.
pub const Y_FIELD: &str = "y";

static MISSING: FieldValue = FieldValue::Missing;

/// Which slice of the source sequence to evaluate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvalRange {
    /// Half-open `[from, to)` index range. `to = None` runs to the end.
    Span {
        /// First index (clamped to `[0, len]`).
        from: i64,
        /// Exclusive end (clamped to `[from, len]`).
        to: Option<i64>,
    },
    /// Positive: the first `n` records. Negative: the last `|n|` records.
    /// Zero selects everything.
    Length(i64),
}

impl EvalRange {
    /// Resolve an optional range against a sequence of `len` records.
    ///
    /// The returned range is always within `0..len`.
    pub fn resolve(range: Option<EvalRange>, len: usize) -> Range<usize> {
        let n = len as i64;
        let (start, end) = match range {
            None | Some(EvalRange::Length(0)) => (0, n),
            Some(EvalRange::Span { from, to }) => {
                let start = from.clamp(0, n);
                let end = to.map_or(n, |to| to.clamp(start, n));
                (start, end)
            }
            Some(EvalRange::Length(length)) if length < 0 => (n.saturating_add(length).max(0), n),
            Some(EvalRange::Length(length)) => (0, length.min(n)),
        };
        start as usize..end as usize
    }
}

/// A data source plus bindings and presentation metadata.
pub struct Series<'a, D: DataSource + ?Sized> {
    source: &'a D,
    bindings: Bindings,
    color: Option<String>,
    label: Option<String>,
    on_bind: Option<Box<dyn FnMut() + 'a>>,
}

impl<'a, D: DataSource + ?Sized> Series<'a, D> {
    /// A series over `source` with no bindings.
    pub fn new(source: &'a D) -> Self {
        Self {
            source,
            bindings: Bindings::new(),
            color: None,
            label: None,
            on_bind: None,
        }
    }

    /// Build a series from a loaded [`SeriesConfig`].
    pub fn from_config(source: &'a D, config: &SeriesConfig) -> Self {
        let mut series = Self::new(source);
        for (name, field) in &config.bindings {
            series.add_binding(name, field);
        }
        series.color = config.color.clone();
        series.label = config.label.clone();
        series
    }

    /// Builder form of [`Series::add_binding`].
    pub fn with_binding(mut self, name: impl Into<String>, source_field: impl Into<String>) -> Self {
        self.add_binding(name, source_field);
        self
    }

    /// Set the display color.
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Set the human-readable label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Install the observer invoked at the end of every [`Series::bind`].
    pub fn set_on_bind(&mut self, callback: impl FnMut() + 'a) {
        self.on_bind = Some(Box::new(callback));
    }

    /// Replace the data source and the whole bindings mapping, then notify
    /// the `on_bind` observer.
    pub fn bind<I, K, V>(&mut self, source: &'a D, bindings: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.source = source;
        self.bindings = bindings
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        debug!(
            label = self.label.as_deref().unwrap_or(""),
            bindings = self.bindings.len(),
            "series bound"
        );
        if let Some(on_bind) = self.on_bind.as_mut() {
            on_bind();
        }
    }

    /// Insert or overwrite a single binding.
    pub fn add_binding(&mut self, name: impl Into<String>, source_field: impl Into<String>) {
        self.bindings.insert(name.into(), source_field.into());
    }

    /// Current output-field -> source-field mapping.
    pub fn bindings(&self) -> &Bindings {
        &self.bindings
    }

    /// The bound data source.
    pub fn source(&self) -> &'a D {
        self.source
    }

    /// Display color, if set.
    pub fn color(&self) -> Option<&str> {
        self.color.as_deref()
    }

    /// Label, if set.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Project the records selected by `range`.
    ///
    /// Every binding is resolved against every selected record. If any
    /// projected record defines `x`, the result is sorted ascending by
    /// `x`; otherwise source order is kept.
    pub fn evaluate(&self, range: Option<EvalRange>) -> Vec<ProjectedRecord<'_, 'a, D>> {
        let source: &'a D = self.source;
        let data = source.data();
        let window = EvalRange::resolve(range, data.len());
        debug!(
            label = self.label.as_deref().unwrap_or(""),
            start = window.start,
            end = window.end,
            total = data.len(),
            "evaluating series"
        );

        let mut out: Vec<_> = data[window].iter().map(|record| self.project(record)).collect();

        if out.iter().any(|p| p.x().is_defined()) {
            trace!(records = out.len(), "ordering projection by x");
            out.sort_by(|a, b| a.cmp_x(b));
        }
        out
    }

    /// [`Series::evaluate`] with the default range from `config`.
    pub fn evaluate_configured(&self, config: &SeriesConfig) -> Vec<ProjectedRecord<'_, 'a, D>> {
        self.evaluate(config.eval_range())
    }

    fn project(&self, record: &'a D::Record) -> ProjectedRecord<'_, 'a, D> {
        let fields = self
            .bindings
            .iter()
            .map(|(name, source_field)| (name.clone(), self.source.field(record, source_field)))
            .collect();
        ProjectedRecord {
            src: record,
            series: self,
            fields,
        }
    }
}

impl<D: DataSource + ?Sized> fmt::Debug for Series<'_, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Series")
            .field("bindings", &self.bindings)
            .field("color", &self.color)
            .field("label", &self.label)
            .field("records", &self.source.data().len())
            .finish_non_exhaustive()
    }
}

/// One evaluated record: the bound field values, the source record, and
/// the series that produced it.
pub struct ProjectedRecord<'s, 'a, D: DataSource + ?Sized> {
    src: &'a D::Record,
    series: &'s Series<'a, D>,
    fields: IndexMap<String, FieldValue>,
}

impl<'s, 'a, D: DataSource + ?Sized> ProjectedRecord<'s, 'a, D> {
    /// The bound value for `name`, or [`FieldValue::Missing`] if unbound.
    pub fn get(&self, name: &str) -> &FieldValue {
        self.fields.get(name).unwrap_or(&MISSING)
    }

    /// The `x` field; drives ordering.
    pub fn x(&self) -> &FieldValue {
        self.get(X_FIELD)
    }

    /// The `y` field as a number (`NaN` when missing or non-numeric).
    pub fn y(&self) -> f64 {
        self.get(Y_FIELD).as_number()
    }

    /// Every bound field, in binding order.
    pub fn fields(&self) -> &IndexMap<String, FieldValue> {
        &self.fields
    }

    /// The source record this projection came from.
    pub fn src(&self) -> &'a D::Record {
        self.src
    }

    /// The series that produced this record.
    pub fn series(&self) -> &'s Series<'a, D> {
        self.series
    }
}

impl<D: DataSource + ?Sized> Observation for ProjectedRecord<'_, '_, D> {
    fn y(&self) -> f64 {
        ProjectedRecord::y(self)
    }
}

impl<D: DataSource + ?Sized> fmt::Debug for ProjectedRecord<'_, '_, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProjectedRecord")
            .field("fields", &self.fields)
            .finish_non_exhaustive()
    }
}

impl<D: DataSource + ?Sized> PartialEq for ProjectedRecord<'_, '_, D> {
    fn eq(&self, other: &Self) -> bool {
        self.fields == other.fields
    }
}

impl<D: DataSource + ?Sized> ProjectedRecord<'_, '_, D> {
    /// Compare two records along the x axis.
    pub fn cmp_x(&self, other: &Self) -> Ordering {
        self.x().axis_cmp(other.x())
    }
}
