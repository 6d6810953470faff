use thiserror::Error;

/// All errors generated in `tnb-data`.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("exchange is not supported here: {0}")]
    UnsupportedExchange(String),

    #[error("{exchange} cannot encode a candle resolution of {resolution}s")]
    UnsupportedResolution { exchange: String, resolution: u32 },

    #[error("invalid pagination: {0}")]
    InvalidPagination(String),

    #[cfg(feature = "rest")]
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),

    #[cfg(feature = "rest")]
    #[error("transport fault: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("failed to deserialise response for window {window}: {error}")]
    Deserialise {
        window: String,
        error: serde_json::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("column not present in table: {0}")]
    UnknownColumn(String),

    #[error("non-numeric value {value} in column {column} at row {row}")]
    NonNumeric {
        column: String,
        row: usize,
        value: String,
    },

    #[error("dataset mapping must name at least one column")]
    EmptyMapping,

    #[error("index {index} out of range for dataset of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("failed to install tracing subscriber: {0}")]
    Subscriber(#[from] tracing_subscriber::util::TryInitError),
}
