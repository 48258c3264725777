//! JSON row sets as a data source.
//!
//! The input is a JSON array of objects. Each object is one record and
//! its top-level properties are the fields:
//! - numbers -> [`FieldValue::Number`]
//! - strings -> [`FieldValue::Text`]
//! - booleans -> `1.0` / `0.0`
//! - `null`, nested arrays/objects, and absent keys -> [`FieldValue::Missing`]

use std::{fs::File, io::BufReader, path::Path};

use serde_json::{Map, Value};

use crate::{
    errors::Result,
    source::{DataSource, FieldValue},
};

/// One JSON object per record.
pub type Row = Map<String, Value>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct JsonRows {
    rows: Vec<Row>,
}

impl JsonRows {
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(Self::new(serde_json::from_str(s)?))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let reader = BufReader::new(File::open(path.as_ref())?);
        Ok(Self::new(serde_json::from_reader(reader)?))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl DataSource for JsonRows {
    type Record = Row;

    fn data(&self) -> &[Row] {
        &self.rows
    }

    fn field(&self, row: &Row, name: &str) -> FieldValue {
        match row.get(name) {
            Some(Value::Number(n)) => n.as_f64().map_or(FieldValue::Missing, FieldValue::Number),
            Some(Value::String(s)) => FieldValue::Text(s.clone()),
            Some(Value::Bool(b)) => FieldValue::Number(if *b { 1.0 } else { 0.0 }),
            _ => FieldValue::Missing,
        }
    }
}
