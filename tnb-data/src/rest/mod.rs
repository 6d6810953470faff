use crate::{
    error::DataError,
    table::{CandleRecord, CryptoTable},
};
use chrono::{DateTime, Utc};
use derive_more::Constructor;
use futures::Stream;
use reqwest::StatusCode;
use std::future::Future;

/// Generic REST candle client driven by a [`CandleServer`](crate::exchange::CandleServer)
/// descriptor.
pub mod client;

/// Splits a time range into contiguous request [`Window`](paginator::Window)s.
pub mod paginator;

pub use client::RestCandleClient;
pub use paginator::{IntervalPaginator, TimeUnit, Window};

/// Default candle width in seconds.
pub const DEFAULT_RESOLUTION: u32 = 300;

/// Default number of candles requested per window.
pub const DEFAULT_PAGE_SIZE: u32 = 300;

/// Request parameters for fetching a historical candle range.
#[derive(Clone, Debug, Constructor)]
pub struct CandleRequest {
    /// Exchange-specific market string (e.g., "BTC/USDT" or "BTC_USDT").
    pub market: String,
    /// Inclusive start of the range.
    pub start: DateTime<Utc>,
    /// Exclusive end of the range.
    pub end: DateTime<Utc>,
    /// Candle width in seconds.
    pub resolution: u32,
    /// Number of candles per request window.
    pub page_size: u32,
}

/// Result of requesting one [`Window`].
#[derive(Clone, Debug, PartialEq)]
pub enum WindowOutcome {
    /// HTTP 200, with the records unwrapped from the response envelope.
    Records(Vec<CandleRecord>),
    /// Any other status. The window's data is absent from the output.
    Missing(StatusCode),
}

/// One [`Window`] and its [`WindowOutcome`], as yielded by [`CandleFetcher::stream_candles`].
#[derive(Clone, Debug, PartialEq)]
pub struct WindowBatch {
    pub window: Window,
    pub outcome: WindowOutcome,
}

/// A [`Window`] that was dropped because the exchange answered with a non-200 status.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct MissingWindow {
    pub window: Window,
    pub status: StatusCode,
}

/// Every record fetched for a [`CandleRequest`], plus the manifest of dropped windows.
#[derive(Clone, Debug, PartialEq)]
pub struct CandleFetch {
    pub table: CryptoTable,
    pub missing: Vec<MissingWindow>,
}

/// Trait for fetching a historical candle range from an exchange, one window at a time.
pub trait CandleFetcher {
    /// Fetch every window of the request in order and collect the records into a table.
    ///
    /// Windows answered with a non-200 status are skipped and listed in
    /// [`CandleFetch::missing`]. Transport faults and undecodable 200 bodies abort the fetch.
    fn fetch_candles(
        &self,
        request: CandleRequest,
    ) -> impl Future<Output = Result<CandleFetch, DataError>> + Send;

    /// Stream one [`WindowBatch`] per window, in increasing time order.
    ///
    /// The stream terminates after the last window or after yielding the first error.
    fn stream_candles(
        &self,
        request: CandleRequest,
    ) -> impl Stream<Item = Result<WindowBatch, DataError>> + Send;
}
