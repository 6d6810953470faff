use crate::{error::DataError, table::CryptoTable};
use ndarray::{Array2, s};
use serde_json::Value;
use std::{fmt, sync::Arc};

/// Function applied to every window returned by [`CryptoCandleDataset::get`].
pub type WindowTransform = Arc<dyn Fn(Array2<f64>) -> Array2<f64> + Send + Sync>;

/// Read-only view over a [`CryptoTable`] serving fixed-length historical windows.
///
/// Sample `idx` is rows `idx..idx + history_seq_len` of the `mapping` columns, as an
/// `[history_seq_len, mapping.len()]` matrix. The mapped columns are converted to `f64` once on
/// construction; `null` cells become `NaN`.
#[derive(Clone)]
pub struct CryptoCandleDataset {
    values: Array2<f64>,
    history_seq_len: usize,
    mapping: Vec<String>,
    transform: Option<WindowTransform>,
}

impl fmt::Debug for CryptoCandleDataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CryptoCandleDataset")
            .field("rows", &self.values.nrows())
            .field("history_seq_len", &self.history_seq_len)
            .field("mapping", &self.mapping)
            .field("transform", &self.transform.is_some())
            .finish()
    }
}

impl CryptoCandleDataset {
    /// Construct a dataset over `table`, projecting the `mapping` columns in the given order.
    pub fn new<Iter, S>(
        table: &CryptoTable,
        history_seq_len: usize,
        mapping: Iter,
    ) -> Result<Self, DataError>
    where
        Iter: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mapping = mapping.into_iter().map(Into::into).collect::<Vec<String>>();
        if mapping.is_empty() {
            return Err(DataError::EmptyMapping);
        }

        // A table without rows may not carry any columns at all, eg/ every window was rejected.
        if table.is_empty() {
            return Ok(Self {
                values: Array2::zeros((0, mapping.len())),
                history_seq_len,
                mapping,
                transform: None,
            });
        }

        let indices = mapping
            .iter()
            .map(|column| {
                table
                    .column_index(column)
                    .ok_or_else(|| DataError::UnknownColumn(column.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut values = Array2::<f64>::zeros((table.len(), mapping.len()));
        for (row_index, row) in table.rows().enumerate() {
            for (col, (&index, column)) in indices.iter().zip(&mapping).enumerate() {
                let cell = row.get(index).unwrap_or(&Value::Null);
                values[[row_index, col]] = cell_to_f64(cell).ok_or_else(|| {
                    DataError::NonNumeric {
                        column: column.clone(),
                        row: row_index,
                        value: cell.to_string(),
                    }
                })?;
            }
        }

        Ok(Self {
            values,
            history_seq_len,
            mapping,
            transform: None,
        })
    }

    /// Apply `transform` to every window returned from now on.
    pub fn with_transform<F>(self, transform: F) -> Self
    where
        F: Fn(Array2<f64>) -> Array2<f64> + Send + Sync + 'static,
    {
        Self {
            transform: Some(Arc::new(transform)),
            ..self
        }
    }

    /// Number of samples, ie/ `rows - history_seq_len` floored at zero.
    pub fn len(&self) -> usize {
        self.values.nrows().saturating_sub(self.history_seq_len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn history_seq_len(&self) -> usize {
        self.history_seq_len
    }

    pub fn mapping(&self) -> &[String] {
        &self.mapping
    }

    /// Sample `idx`, shaped `[history_seq_len, mapping.len()]`.
    pub fn get(&self, idx: usize) -> Result<Array2<f64>, DataError> {
        let len = self.len();
        if idx >= len {
            return Err(DataError::IndexOutOfRange { index: idx, len });
        }
        Ok(self.window(idx))
    }

    /// Every sample in index order.
    pub fn iter(&self) -> impl Iterator<Item = Array2<f64>> + '_ {
        (0..self.len()).map(|idx| self.window(idx))
    }

    fn window(&self, idx: usize) -> Array2<f64> {
        let window = self
            .values
            .slice(s![idx..idx + self.history_seq_len, ..])
            .to_owned();

        match &self.transform {
            Some(transform) => transform(window),
            None => window,
        }
    }
}

fn cell_to_f64(cell: &Value) -> Option<f64> {
    match cell {
        Value::Null => Some(f64::NAN),
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse().ok(),
        Value::Bool(_) | Value::Array(_) | Value::Object(_) => None,
    }
}
