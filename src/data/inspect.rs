use std::collections::BTreeSet;

use serde::Serialize;

use super::model::{DataType, Table};
use crate::error::{DatasetError, Result};

// ---------------------------------------------------------------------------
// Summaries handed back to callers
// ---------------------------------------------------------------------------

/// One column of a full table dump: every row's value, in row order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnReport {
    pub name: String,
    pub datatype: DataType,
    pub items: Vec<String>,
}

/// Per-column reports in the table's column order.
pub type TableSummary = Vec<ColumnReport>;

/// Datatype plus the sorted distinct text values of a single column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSummary {
    pub datatype: DataType,
    pub items: Vec<String>,
}

// ---------------------------------------------------------------------------
// Inspection
// ---------------------------------------------------------------------------

/// Dump every column: name, datatype and every value rendered as text.
/// Nothing is deduplicated or reordered.
pub fn describe_table(table: &Table) -> TableSummary {
    table
        .columns()
        .iter()
        .map(|column| ColumnReport {
            name: column.name.clone(),
            datatype: column.dtype,
            items: column.values.iter().map(|v| v.to_string()).collect(),
        })
        .collect()
}

/// Datatype and lexicographically sorted distinct values of one column.
/// Missing cells contribute a single `"nan"` entry.
pub fn describe_column(table: &Table, column: &str) -> Result<ColumnSummary> {
    let column = table
        .column(column)
        .ok_or_else(|| DatasetError::NotFound(format!("column '{column}'")))?;

    let distinct: BTreeSet<String> = column.values.iter().map(|v| v.to_string()).collect();
    Ok(ColumnSummary {
        datatype: column.dtype,
        items: distinct.into_iter().collect(),
    })
}
