use std::fmt;

use serde::Serialize;

use crate::error::{DatasetError, Result};

// ---------------------------------------------------------------------------
// Value – a single typed cell
// ---------------------------------------------------------------------------

/// A cell after type inference. Cells inside one column always share the
/// column's [`DataType`] or are [`Value::Missing`].
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Integer(i64),
    Float(f64),
    Text(String),
    Missing,
}

impl Value {
    pub fn is_missing(&self) -> bool {
        match self {
            Value::Missing => true,
            Value::Float(v) => v.is_nan(),
            _ => false,
        }
    }

    /// Numeric view of the cell, `None` for text and missing cells.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(v) if !v.is_nan() => Some(*v),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// Text rendering shared by every summary: floats always carry a fractional
/// part (`22.0`), missing cells render as `nan`.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(i) => write!(f, "{i}"),
            Value::Float(v) if v.is_nan() => write!(f, "nan"),
            Value::Float(v) => {
                let text = v.to_string();
                if v.is_finite() && !text.contains('.') {
                    write!(f, "{text}.0")
                } else {
                    write!(f, "{text}")
                }
            }
            Value::Text(s) => write!(f, "{s}"),
            Value::Missing => write!(f, "nan"),
        }
    }
}

// ---------------------------------------------------------------------------
// DataType – inferred column type
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DataType {
    #[serde(rename = "int64")]
    Integer,
    #[serde(rename = "float64")]
    Float,
    #[serde(rename = "object")]
    Text,
}

impl DataType {
    /// The dtype name clients see (`int64`, `float64`, `object`).
    pub fn name(self) -> &'static str {
        match self {
            DataType::Integer => "int64",
            DataType::Float => "float64",
            DataType::Text => "object",
        }
    }

    pub fn is_numeric(self) -> bool {
        matches!(self, DataType::Integer | DataType::Float)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Column / Table – the parsed, request-scoped form of a dataset
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub dtype: DataType,
    pub values: Vec<Value>,
}

impl Column {
    pub fn new(name: impl Into<String>, dtype: DataType, values: Vec<Value>) -> Self {
        Column {
            name: name.into(),
            dtype,
            values,
        }
    }
}

/// Columns in header order; every column holds the same number of rows.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    columns: Vec<Column>,
    rows: usize,
}

impl Table {
    /// Build a table from columns of equal length.
    pub fn from_columns(columns: Vec<Column>) -> Result<Self> {
        let rows = columns.first().map_or(0, |c| c.values.len());
        if let Some(odd) = columns.iter().find(|c| c.values.len() != rows) {
            return Err(DatasetError::InvalidInput(format!(
                "column '{}' has {} rows, expected {rows}",
                odd.name,
                odd.values.len()
            )));
        }
        Ok(Table { columns, rows })
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// Insert a column, replacing one of the same name in place. The column
    /// must match the table's row count unless the table has no columns yet.
    pub fn upsert_column(&mut self, column: Column) -> Result<()> {
        if self.columns.is_empty() {
            self.rows = column.values.len();
        } else if column.values.len() != self.rows {
            return Err(DatasetError::InvalidInput(format!(
                "column '{}' has {} rows, expected {}",
                column.name,
                column.values.len(),
                self.rows
            )));
        }
        match self.columns.iter_mut().find(|c| c.name == column.name) {
            Some(existing) => *existing = column,
            None => self.columns.push(column),
        }
        Ok(())
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }
}
