use crate::{
    crawl::parse_window_file_name,
    error::DataError,
    exchange::CandleServer,
    rest::Window,
    table::CryptoTable,
};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Column renames applied by [`to_training_columns`].
pub const TRAINING_COLUMN_RENAMES: [(&str, &str); 6] = [
    ("date", "Date"),
    ("high", "High"),
    ("low", "Low"),
    ("open", "Open"),
    ("close", "Close"),
    ("volume", "Volume"),
];

/// Columns dropped by [`to_training_columns`].
pub const TRAINING_COLUMN_DROPS: [&str; 2] = ["quoteVolume", "weightedAverage"];

/// Merge every `<start>-<end>.json` window file in `dir` into one table, in window order.
///
/// Each file is decoded with the `Server` response envelope, so this reads back exactly what a
/// [`Crawler<Server>`](crate::crawl::Crawler) wrote. Files with other names are ignored.
pub fn merge_window_files<Server>(dir: &Path) -> Result<CryptoTable, DataError>
where
    Server: CandleServer,
{
    let mut files = std::fs::read_dir(dir)?
        .map(|entry| entry.map(|entry| entry.path()))
        .collect::<Result<Vec<PathBuf>, _>>()?
        .into_iter()
        .filter_map(|path| {
            let window = path
                .file_name()
                .and_then(|name| name.to_str())
                .and_then(parse_window_file_name)?;
            Some((window, path))
        })
        .collect::<Vec<(Window, PathBuf)>>();

    files.sort_by_key(|(window, _)| *window);

    let mut records = Vec::new();
    for (window, path) in &files {
        let body = std::fs::read(path)?;
        let response = serde_json::from_slice::<Server::Response>(&body).map_err(|error| {
            DataError::Deserialise {
                window: window.to_string(),
                error,
            }
        })?;

        let batch = Server::records(response);
        debug!(%window, count = batch.len(), "merged window file");
        records.extend(batch);
    }

    let table = match Server::columns() {
        Some(columns) => CryptoTable::with_columns(columns, records),
        None => CryptoTable::from_records(records),
    };

    info!(
        dir = %dir.display(),
        files = files.len(),
        rows = table.len(),
        "merged window files"
    );

    Ok(table)
}

/// Rename the OHLCV columns to their capitalised training names and drop the columns the
/// training pipeline does not consume.
pub fn to_training_columns(mut table: CryptoTable) -> CryptoTable {
    table.rename_columns(&TRAINING_COLUMN_RENAMES);
    table.drop_columns(&TRAINING_COLUMN_DROPS);
    table
}
