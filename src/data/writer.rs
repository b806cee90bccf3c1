use std::io::Write;

use super::model::{Table, Value};
use crate::error::Result;

/// Serialize `table` as CSV with a header row. Missing cells are written
/// empty so the output re-reads with the same missing positions.
pub fn write_csv<W: Write>(table: &Table, output: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(output);
    writer.write_record(table.columns().iter().map(|c| c.name.as_str()))?;

    for row in 0..table.len() {
        let record = table.columns().iter().map(|c| match &c.values[row] {
            Value::Missing => String::new(),
            Value::Float(v) if v.is_nan() => String::new(),
            value => value.to_string(),
        });
        writer.write_record(record)?;
    }
    writer.flush()?;
    Ok(())
}
