use crate::error::DataError;
use serde_json::{Map, Number, Value};
use std::path::Path;
use tracing::debug;

/// One exchange reported candle, keyed by the exchange's native column names.
///
/// No schema is enforced across exchanges, eg/ FTX reports `startTime, time, open, ...` while
/// Poloniex reports `low, high, open, close, amount, ...`.
pub type CandleRecord = Map<String, Value>;

/// Ordered table of [`CandleRecord`]s with a shared column set.
///
/// Rows are kept in insertion order, which for fetched data is request (ie/ chronological)
/// order. Cells absent from a record are stored as [`Value::Null`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CryptoTable {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl CryptoTable {
    /// Build a table whose columns are the union of all record keys, in first-seen order.
    pub fn from_records<Iter>(records: Iter) -> Self
    where
        Iter: IntoIterator<Item = CandleRecord>,
    {
        let records = records.into_iter().collect::<Vec<_>>();

        let mut columns: Vec<String> = Vec::new();
        for record in &records {
            for key in record.keys() {
                if !columns.iter().any(|column| column == key) {
                    columns.push(key.clone());
                }
            }
        }

        let mut table = Self {
            columns,
            rows: Vec::with_capacity(records.len()),
        };
        table.extend(records);
        table
    }

    /// Build a table with a fixed column set. Record keys outside `columns` are dropped.
    pub fn with_columns<Iter, S>(columns: &[S], records: Iter) -> Self
    where
        Iter: IntoIterator<Item = CandleRecord>,
        S: AsRef<str>,
    {
        let mut table = Self {
            columns: columns.iter().map(|c| c.as_ref().to_owned()).collect(),
            rows: Vec::new(),
        };
        table.extend(records);
        table
    }

    /// Append records, projecting each onto the existing column set.
    pub fn extend<Iter>(&mut self, records: Iter)
    where
        Iter: IntoIterator<Item = CandleRecord>,
    {
        for mut record in records {
            let row = self
                .columns
                .iter()
                .map(|column| record.remove(column).unwrap_or(Value::Null))
                .collect();
            self.rows.push(row);
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    pub fn row(&self, index: usize) -> Option<&[Value]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Value]> + '_ {
        self.rows.iter().map(Vec::as_slice)
    }

    pub fn value(&self, row: usize, column: &str) -> Option<&Value> {
        let column = self.column_index(column)?;
        self.rows.get(row).and_then(|row| row.get(column))
    }

    /// Rename columns in place. Renames for columns not present are ignored.
    pub fn rename_columns(&mut self, renames: &[(&str, &str)]) {
        for column in self.columns.iter_mut() {
            if let Some((_, to)) = renames.iter().find(|(from, _)| from == column) {
                *column = (*to).to_owned();
            }
        }
    }

    /// Drop columns and their cells in place. Names not present are ignored.
    pub fn drop_columns(&mut self, names: &[&str]) {
        let keep = self
            .columns
            .iter()
            .map(|column| !names.contains(&column.as_str()))
            .collect::<Vec<_>>();

        for row in self.rows.iter_mut() {
            let mut keep = keep.iter();
            row.retain(|_| keep.next().copied().unwrap_or(true));
        }

        let mut keep = keep.iter();
        self.columns.retain(|_| keep.next().copied().unwrap_or(true));
    }

    /// Write the table as comma delimited text with a header row and no index column.
    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> Result<(), DataError> {
        let path = path.as_ref();
        let mut writer = csv::Writer::from_path(path)?;

        writer.write_record(&self.columns)?;
        for row in &self.rows {
            writer.write_record(row.iter().map(cell_to_field))?;
        }
        writer.flush()?;

        debug!(path = %path.display(), rows = self.rows.len(), "wrote table csv");
        Ok(())
    }

    /// Read a table previously written with [`CryptoTable::write_csv`].
    ///
    /// Empty cells become [`Value::Null`], numeric cells become [`Value::Number`] and everything
    /// else is kept as a [`Value::String`].
    pub fn read_csv<P: AsRef<Path>>(path: P) -> Result<Self, DataError> {
        let mut reader = csv::Reader::from_path(path)?;

        let columns = reader
            .headers()?
            .iter()
            .map(str::to_owned)
            .collect::<Vec<_>>();

        let rows = reader
            .records()
            .map(|record| record.map(|record| record.iter().map(field_to_cell).collect()))
            .collect::<Result<Vec<Vec<Value>>, _>>()?;

        Ok(Self { columns, rows })
    }
}

fn cell_to_field(cell: &Value) -> String {
    match cell {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn field_to_cell(field: &str) -> Value {
    if field.is_empty() {
        return Value::Null;
    }
    if let Ok(integer) = field.parse::<i64>() {
        return Value::Number(integer.into());
    }
    field
        .parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
        .unwrap_or_else(|| Value::String(field.to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> CandleRecord {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn test_from_records_unions_columns_in_first_seen_order() {
        let table = CryptoTable::from_records([
            record(json!({"time": 1, "open": 10.0})),
            record(json!({"time": 2, "close": 11.0, "open": 10.5})),
        ]);

        assert_eq!(table.columns(), ["time", "open", "close"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.value(0, "close"), Some(&Value::Null));
        assert_eq!(table.value(1, "open"), Some(&json!(10.5)));
    }

    #[test]
    fn test_with_columns_drops_unknown_keys() {
        let table = CryptoTable::with_columns(
            &["open", "close"],
            [record(json!({"open": "1.5", "close": "2.5", "extra": true}))],
        );

        assert_eq!(table.columns(), ["open", "close"]);
        assert_eq!(table.row(0), Some(&[json!("1.5"), json!("2.5")][..]));
    }

    #[test]
    fn test_rename_and_drop_columns() {
        let mut table = CryptoTable::from_records([record(
            json!({"date": 1, "open": 2, "quoteVolume": 3, "weightedAverage": 4}),
        )]);

        table.rename_columns(&[("date", "Date"), ("open", "Open"), ("missing", "Nope")]);
        table.drop_columns(&["quoteVolume", "weightedAverage", "missing"]);

        assert_eq!(table.columns(), ["Date", "Open"]);
        assert_eq!(table.row(0), Some(&[json!(1), json!(2)][..]));
    }

    #[test]
    fn test_csv_roundtrip_preserves_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("table.csv");

        let table = CryptoTable::from_records([
            record(json!({"time": 1_600_000_000, "open": 1.25, "pair": "BTC/USDT"})),
            record(json!({"time": 1_600_000_300, "open": null, "pair": "BTC/USDT"})),
        ]);
        table.write_csv(&path).unwrap();

        let read = CryptoTable::read_csv(&path).unwrap();
        assert_eq!(read, table);
    }
}
