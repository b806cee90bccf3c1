use super::model::{Column, DataType, Table, Value};
use crate::error::{DatasetError, Result};

pub const IS_MARRIED: &str = "Is_married";
pub const CABIN_TYPE: &str = "Cabin_type";

/// Add the derived passenger columns to `table`:
///
/// * `Is_married` – `1` when the title in `Name` is `Mrs`, else `0`
/// * `Cabin_type` – first letter of `Cabin`, `unknown` when missing
///
/// Columns that already exist under those names are replaced.
pub fn passenger_features(table: &mut Table) -> Result<()> {
    let names = required(table, "Name")?;
    let cabins = required(table, "Cabin")?;

    let married: Vec<Value> = names
        .values
        .iter()
        .map(|v| {
            let is_mrs = v.as_str().and_then(title) == Some("Mrs");
            Value::Integer(i64::from(is_mrs))
        })
        .collect();

    let cabin_types: Vec<Value> = cabins
        .values
        .iter()
        .map(|v| {
            let kind = if v.is_missing() {
                "unknown".to_string()
            } else {
                v.to_string().chars().next().map(String::from).unwrap_or_default()
            };
            Value::Text(kind)
        })
        .collect();

    table.upsert_column(Column::new(IS_MARRIED, DataType::Integer, married))?;
    table.upsert_column(Column::new(CABIN_TYPE, DataType::Text, cabin_types))?;
    Ok(())
}

/// Column names after [`passenger_features`] has run on a table with
/// `input` columns.
pub fn feature_names_out(input: &[String]) -> Vec<String> {
    let mut out = input.to_vec();
    out.extend([IS_MARRIED.to_string(), CABIN_TYPE.to_string()]);
    out
}

/// Title between the surname comma and the following period:
/// `"Cumings, Mrs. John Bradley"` → `"Mrs"`.
fn title(name: &str) -> Option<&str> {
    let (_, rest) = name.split_once(',')?;
    let title = rest.split('.').next()?.trim();
    Some(title)
}

fn required<'t>(table: &'t Table, name: &str) -> Result<&'t Column> {
    table
        .column(name)
        .ok_or_else(|| DatasetError::NotFound(format!("column '{name}'")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::read_table;

    const PASSENGERS: &str = "Name,Cabin\n\
        \"Braund, Mr. Owen Harris\",\n\
        \"Cumings, Mrs. John Bradley (Florence Briggs Thayer)\",C85\n\
        \"Heikkinen, Miss. Laina\",\n\
        Nobody,E46\n";

    #[test]
    fn derives_marital_flag_and_cabin_letter() {
        let mut table = read_table(PASSENGERS.as_bytes()).unwrap();
        passenger_features(&mut table).unwrap();

        let married = &table.column(IS_MARRIED).unwrap().values;
        assert_eq!(
            married,
            &vec![Value::Integer(0), Value::Integer(1), Value::Integer(0), Value::Integer(0)]
        );

        let cabins: Vec<String> = table
            .column(CABIN_TYPE)
            .unwrap()
            .values
            .iter()
            .map(|v| v.to_string())
            .collect();
        assert_eq!(cabins, vec!["unknown", "C", "unknown", "E"]);
    }

    #[test]
    fn running_twice_replaces_columns() {
        let mut table = read_table(PASSENGERS.as_bytes()).unwrap();
        passenger_features(&mut table).unwrap();
        passenger_features(&mut table).unwrap();
        assert_eq!(
            table.column_names(),
            feature_names_out(&["Name".to_string(), "Cabin".to_string()])
        );
    }

    #[test]
    fn missing_source_column_is_not_found() {
        let mut table = read_table("Name\nx\n".as_bytes()).unwrap();
        let err = passenger_features(&mut table).unwrap_err();
        assert!(matches!(err, DatasetError::NotFound(_)));
    }

    #[test]
    fn title_extraction() {
        assert_eq!(title("Allen, Mr. William Henry"), Some("Mr"));
        assert_eq!(title("Rothes, the Countess. of (Lucy)"), Some("the Countess"));
        assert_eq!(title("no comma"), None);
    }
}
