use crate::{
    error::DataError,
    exchange::CandleServer,
    rest::paginator::{TimeUnit, Window},
    table::CandleRecord,
};
use serde::Serialize;
use tnb_instrument::exchange::ExchangeId;

/// [`PoloniexLegacy`](PoloniexLegacyServer) REST base url.
pub const REST_BASE_URL_POLONIEX_LEGACY: &str = "https://poloniex.com";

/// Candle widths, in seconds, accepted by `returnChartData`.
pub const POLONIEX_LEGACY_PERIODS: [u32; 6] = [300, 900, 1_800, 7_200, 14_400, 86_400];

/// Query parameters for a `returnChartData` request.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct GetChartDataParams {
    pub command: &'static str,
    #[serde(rename = "currencyPair")]
    pub currency_pair: String,
    pub period: u32,
    pub start: i64,
    pub end: i64,
}

/// Retired Poloniex `public?command=returnChartData` [`CandleServer`].
///
/// Window boundaries are unix seconds, the market is a query parameter (eg/ `USDT_BTC`), and the
/// response is a bare array of objects:
/// `[{"date": 1495033200, "high": 1800.0, "low": 1790.0, "open": 1795.0, "close": 1798.0,
///   "volume": 12.3, "quoteVolume": 0.0068, "weightedAverage": 1796.1}]`
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
pub struct PoloniexLegacyServer;

impl CandleServer for PoloniexLegacyServer {
    const ID: ExchangeId = ExchangeId::PoloniexLegacy;
    const TIME_UNIT: TimeUnit = TimeUnit::Seconds;

    type Params = GetChartDataParams;
    type Response = Vec<CandleRecord>;

    fn rest_base_url() -> &'static str {
        REST_BASE_URL_POLONIEX_LEGACY
    }

    fn candles_path(_: &str) -> String {
        "/public".to_string()
    }

    fn params(
        market: &str,
        window: Window,
        resolution: u32,
        _: u32,
    ) -> Result<Self::Params, DataError> {
        if !POLONIEX_LEGACY_PERIODS.contains(&resolution) {
            return Err(DataError::UnsupportedResolution {
                exchange: ExchangeId::PoloniexLegacy.to_string(),
                resolution,
            });
        }

        Ok(GetChartDataParams {
            command: "returnChartData",
            currency_pair: market.to_string(),
            period: resolution,
            start: window.start,
            end: window.end,
        })
    }

    fn records(response: Self::Response) -> Vec<CandleRecord> {
        response
    }
}
