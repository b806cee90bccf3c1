use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::{debug, warn};

use super::model::{Column, DataType, Table, Value};
use crate::error::{DatasetError, Result};

/// Cell texts treated as missing data, in addition to the empty cell.
const MISSING_MARKERS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Parse a delimited text file into a typed [`Table`].
pub fn load_file(path: &Path) -> Result<Table> {
    let file = File::open(path)?;
    let table = read_table(file)?;
    debug!(
        "loaded {}: {} columns, {} rows",
        path.display(),
        table.columns().len(),
        table.len()
    );
    Ok(table)
}

/// Parse CSV from any reader. The first record is the header.
///
/// Parsing is permissive: short rows are padded with missing cells, surplus
/// fields are dropped and invalid UTF-8 is replaced. The only hard failure is
/// input with no header record at all.
pub fn read_table<R: Read>(input: R) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(input);

    let mut records = reader.byte_records();
    let header = match records.next() {
        Some(record) => record?,
        None => return Err(DatasetError::Parse("no columns to parse from file".into())),
    };
    let names = column_names(&header);
    let width = names.len();

    let mut cells: Vec<Vec<Option<String>>> = vec![Vec::new(); width];
    let mut padded = 0usize;
    let mut truncated = 0usize;

    for result in records {
        let record = result?;
        if record.len() < width {
            padded += 1;
        } else if record.len() > width {
            truncated += 1;
        }
        for (col_idx, column) in cells.iter_mut().enumerate() {
            let cell = record
                .get(col_idx)
                .map(|raw| String::from_utf8_lossy(raw).into_owned())
                .filter(|text| !is_missing_marker(text));
            column.push(cell);
        }
    }

    if padded > 0 {
        warn!("{padded} row(s) shorter than the header were padded with missing cells");
    }
    if truncated > 0 {
        warn!("{truncated} row(s) longer than the header had surplus fields dropped");
    }

    let columns = names
        .into_iter()
        .zip(cells)
        .map(|(name, raw)| infer_column(name, raw))
        .collect();
    Table::from_columns(columns)
}

// ---------------------------------------------------------------------------
// Header handling
// ---------------------------------------------------------------------------

/// Resolve header cells into unique column names: blanks become
/// `Unnamed: {index}`, repeats become `name.1`, `name.2`, ...
fn column_names(header: &csv::ByteRecord) -> Vec<String> {
    let mut used: HashSet<String> = HashSet::new();
    let mut repeats: HashMap<String, usize> = HashMap::new();
    let mut names = Vec::with_capacity(header.len());

    for (idx, raw) in header.iter().enumerate() {
        let mut base = String::from_utf8_lossy(raw).into_owned();
        if idx == 0 {
            base = base.trim_start_matches('\u{feff}').to_string();
        }
        if base.is_empty() {
            base = format!("Unnamed: {idx}");
        }

        let mut name = base.clone();
        while used.contains(&name) {
            let count = repeats.entry(base.clone()).or_insert(0);
            *count += 1;
            name = format!("{base}.{count}");
        }
        used.insert(name.clone());
        names.push(name);
    }
    names
}

// ---------------------------------------------------------------------------
// Type inference
// ---------------------------------------------------------------------------

fn is_missing_marker(text: &str) -> bool {
    text.is_empty() || MISSING_MARKERS.contains(&text)
}

/// Decide the column type from every present cell, then coerce the cells.
///
/// Integer when every cell is a whole number, float when every cell is
/// numeric, text otherwise. A column with rows but no present cells is float;
/// a column without rows is text.
fn infer_column(name: String, raw: Vec<Option<String>>) -> Column {
    let dtype = infer_dtype(&raw);
    let values = raw
        .into_iter()
        .map(|cell| match cell {
            None => Value::Missing,
            Some(text) => coerce(text, dtype),
        })
        .collect();
    Column::new(name, dtype, values)
}

fn infer_dtype(raw: &[Option<String>]) -> DataType {
    if raw.is_empty() {
        return DataType::Text;
    }
    let mut dtype = DataType::Integer;
    for text in raw.iter().flatten() {
        let trimmed = text.trim();
        if trimmed.parse::<i64>().is_ok() {
            continue;
        }
        if trimmed.parse::<f64>().is_ok() {
            dtype = DataType::Float;
            continue;
        }
        return DataType::Text;
    }
    if raw.iter().all(Option::is_none) {
        return DataType::Float;
    }
    dtype
}

fn coerce(text: String, dtype: DataType) -> Value {
    let parsed = match dtype {
        DataType::Integer => text.trim().parse::<i64>().ok().map(Value::Integer),
        DataType::Float => text.trim().parse::<f64>().ok().map(Value::Float),
        DataType::Text => None,
    };
    parsed.unwrap_or(Value::Text(text))
}
