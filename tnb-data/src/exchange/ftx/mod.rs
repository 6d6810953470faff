use crate::{
    error::DataError,
    exchange::CandleServer,
    rest::paginator::{TimeUnit, Window},
    table::CandleRecord,
};
use tnb_instrument::exchange::ExchangeId;

/// FTX historical prices request parameters and response envelope.
pub mod candles;

/// [`Ftx`](FtxServer) REST base url.
///
/// See docs: <https://docs.ftx.com/#get-historical-prices>
pub const REST_BASE_URL_FTX: &str = "https://ftx.com/api";

/// FTX historical prices [`CandleServer`].
///
/// Window boundaries are unix seconds and the candle rows are nested under the `result` key.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
pub struct FtxServer;

impl CandleServer for FtxServer {
    const ID: ExchangeId = ExchangeId::Ftx;
    const TIME_UNIT: TimeUnit = TimeUnit::Seconds;

    type Params = candles::GetFtxCandlesParams;
    type Response = candles::FtxCandlesResponse;

    fn rest_base_url() -> &'static str {
        REST_BASE_URL_FTX
    }

    fn candles_path(market: &str) -> String {
        format!("/markets/{market}/candles")
    }

    fn params(
        _: &str,
        window: Window,
        resolution: u32,
        _: u32,
    ) -> Result<Self::Params, DataError> {
        Ok(candles::GetFtxCandlesParams {
            resolution,
            start_time: window.start,
            end_time: window.end,
        })
    }

    fn records(response: Self::Response) -> Vec<CandleRecord> {
        response.result
    }
}
