use crate::{
    error::DataError,
    rest::paginator::{TimeUnit, Window},
    table::CandleRecord,
};
use serde::{Serialize, de::DeserializeOwned};
use tnb_instrument::exchange::ExchangeId;

/// FTX `markets/{market}/candles` API descriptor.
pub mod ftx;

/// Poloniex `markets/{symbol}/candles` and legacy `returnChartData` API descriptors.
pub mod poloniex;

/// Describes one exchange candle API so a single
/// [`RestCandleClient`](crate::rest::client::RestCandleClient) can drive it.
///
/// Implementors supply the exchange specific pieces of a paged history request: where to send
/// it, which query parameters name the window, and how to unwrap the response envelope into
/// [`CandleRecord`]s.
pub trait CandleServer
where
    Self: Send + Sync + 'static,
{
    const ID: ExchangeId;

    /// Unit of the timestamps the API expects in its window parameters.
    const TIME_UNIT: TimeUnit;

    /// Query parameters for one window.
    type Params: Serialize + Send + Sync;

    /// Deserialised response envelope.
    type Response: DeserializeOwned;

    fn rest_base_url() -> &'static str;

    fn candles_path(market: &str) -> String;

    /// Build fresh query parameters for one window.
    fn params(
        market: &str,
        window: Window,
        resolution: u32,
        page_size: u32,
    ) -> Result<Self::Params, DataError>;

    /// Unwrap the response envelope into records, preserving response order.
    fn records(response: Self::Response) -> Vec<CandleRecord>;

    /// Fixed column set of the resulting table, if the API has one.
    fn columns() -> Option<&'static [&'static str]> {
        None
    }
}
