use crate::table::CandleRecord;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Column names of a Poloniex candle row, in response order.
pub const POLONIEX_CANDLE_COLUMNS: [&str; 14] = [
    "low",
    "high",
    "open",
    "close",
    "amount",
    "quantity",
    "buyTakerAmount",
    "buyTakerQuantity",
    "tradeCount",
    "ts",
    "weightedAverage",
    "interval",
    "startTime",
    "closeTime",
];

/// Query parameters for a Poloniex candles request.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct GetPoloniexCandlesParams {
    pub interval: String,
    pub limit: u32,
    #[serde(rename = "startTime")]
    pub start_time: i64,
    #[serde(rename = "endTime")]
    pub end_time: i64,
}

/// Raw candle row returned by the Poloniex candles API.
///
/// Poloniex returns each candle as a positional array of mixed types:
/// `["45218.2", "47289.82", "46775.14", "46424.48", "1340.5", "0.0289", "0", "0", 0, 1648726287000, "46396.29", "DAY_1", 1648684800000, 1648771199999]`
///
/// Keyed objects are accepted as well and pass through unchanged.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum PoloniexCandleRaw {
    Positional(Vec<Value>),
    Keyed(CandleRecord),
}

impl PoloniexCandleRaw {
    /// Convert into a [`CandleRecord`], naming positional cells by
    /// [`POLONIEX_CANDLE_COLUMNS`]. Surplus trailing cells are dropped.
    pub fn into_record(self) -> CandleRecord {
        match self {
            PoloniexCandleRaw::Positional(cells) => POLONIEX_CANDLE_COLUMNS
                .iter()
                .zip(cells)
                .map(|(column, cell)| ((*column).to_owned(), cell))
                .collect(),
            PoloniexCandleRaw::Keyed(record) => record,
        }
    }
}
