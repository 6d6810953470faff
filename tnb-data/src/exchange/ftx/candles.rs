use crate::table::CandleRecord;
use serde::{Deserialize, Serialize};

/// Query parameters for an FTX historical prices request.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct GetFtxCandlesParams {
    /// Candle width in seconds.
    pub resolution: u32,
    pub start_time: i64,
    pub end_time: i64,
}

/// FTX historical prices response.
///
/// ```json
/// {
///   "success": true,
///   "result": [
///     {
///       "startTime": "2019-06-24T17:15:00+00:00",
///       "time": 1561396500000.0,
///       "open": 11059.25, "high": 11059.25, "low": 11059.25, "close": 11059.25,
///       "volume": 0.0
///     }
///   ]
/// }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct FtxCandlesResponse {
    #[serde(default)]
    pub success: Option<bool>,
    pub result: Vec<CandleRecord>,
}
