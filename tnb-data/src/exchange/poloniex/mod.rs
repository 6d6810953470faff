use crate::{
    error::DataError,
    exchange::CandleServer,
    rest::paginator::{TimeUnit, Window},
    table::CandleRecord,
};
use tnb_instrument::exchange::ExchangeId;

/// Poloniex candles request parameters, raw row DTO and column set.
pub mod candles;

/// Retired Poloniex `public?command=returnChartData` API descriptor.
pub mod legacy;

/// [`Poloniex`](PoloniexServer) REST base url.
///
/// See docs: <https://docs.poloniex.com/#public-endpoints-market-data-candles>
pub const REST_BASE_URL_POLONIEX: &str = "https://api.poloniex.com";

/// Convert a candle width in seconds to the Poloniex interval name.
///
/// Poloniex supports: MINUTE_1, MINUTE_5, MINUTE_10, MINUTE_15, MINUTE_30, HOUR_1, HOUR_2,
/// HOUR_4, HOUR_6, HOUR_12, DAY_1, DAY_3, WEEK_1 and MONTH_1.
pub fn poloniex_interval(resolution: u32) -> Result<&'static str, DataError> {
    match resolution {
        60 => Ok("MINUTE_1"),
        300 => Ok("MINUTE_5"),
        600 => Ok("MINUTE_10"),
        900 => Ok("MINUTE_15"),
        1_800 => Ok("MINUTE_30"),
        3_600 => Ok("HOUR_1"),
        7_200 => Ok("HOUR_2"),
        14_400 => Ok("HOUR_4"),
        21_600 => Ok("HOUR_6"),
        43_200 => Ok("HOUR_12"),
        86_400 => Ok("DAY_1"),
        259_200 => Ok("DAY_3"),
        604_800 => Ok("WEEK_1"),
        2_592_000 => Ok("MONTH_1"),
        _ => Err(DataError::UnsupportedResolution {
            exchange: ExchangeId::Poloniex.to_string(),
            resolution,
        }),
    }
}

/// Poloniex `markets/{symbol}/candles` [`CandleServer`].
///
/// Window boundaries are unix milliseconds and the response is a bare array of positional rows.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
pub struct PoloniexServer;

impl CandleServer for PoloniexServer {
    const ID: ExchangeId = ExchangeId::Poloniex;
    const TIME_UNIT: TimeUnit = TimeUnit::Milliseconds;

    type Params = candles::GetPoloniexCandlesParams;
    type Response = Vec<candles::PoloniexCandleRaw>;

    fn rest_base_url() -> &'static str {
        REST_BASE_URL_POLONIEX
    }

    fn candles_path(market: &str) -> String {
        format!("/markets/{market}/candles")
    }

    fn params(
        _: &str,
        window: Window,
        resolution: u32,
        page_size: u32,
    ) -> Result<Self::Params, DataError> {
        Ok(candles::GetPoloniexCandlesParams {
            interval: poloniex_interval(resolution)?.to_string(),
            limit: page_size,
            start_time: window.start,
            end_time: window.end,
        })
    }

    fn records(response: Self::Response) -> Vec<CandleRecord> {
        response
            .into_iter()
            .map(candles::PoloniexCandleRaw::into_record)
            .collect()
    }

    fn columns() -> Option<&'static [&'static str]> {
        let columns: &'static [&'static str] = &candles::POLONIEX_CANDLE_COLUMNS;
        Some(columns)
    }
}
