use crate::{
    error::DataError,
    exchange::CandleServer,
    rest::{
        CandleFetch, CandleFetcher, CandleRequest, MissingWindow, WindowBatch, WindowOutcome,
        paginator::{IntervalPaginator, Window},
    },
    table::CryptoTable,
};
use futures::{
    StreamExt,
    stream::{self, Stream},
};
use reqwest::StatusCode;
use std::{fmt, future::Future, marker::PhantomData, time::Duration};
use tracing::{Instrument, debug, info, warn};
use url::{ParseError, Url};

/// Default timeout applied to every window request.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Raw HTTP answer for one [`Window`].
#[derive(Clone, Debug, PartialEq)]
pub struct WindowResponse {
    pub window: Window,
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl WindowResponse {
    /// Decode the body with the `Server` response envelope.
    ///
    /// Only HTTP 200 bodies are decoded; any other status yields [`WindowOutcome::Missing`].
    pub fn decode<Server>(self) -> Result<WindowOutcome, DataError>
    where
        Server: CandleServer,
    {
        if self.status != StatusCode::OK {
            return Ok(WindowOutcome::Missing(self.status));
        }

        let response = serde_json::from_slice::<Server::Response>(&self.body).map_err(|error| {
            DataError::Deserialise {
                window: self.window.to_string(),
                error,
            }
        })?;

        Ok(WindowOutcome::Records(Server::records(response)))
    }
}

/// Generic REST candle client for every [`CandleServer`].
///
/// The `Server` type parameter supplies the base url, path, per-window query parameters and
/// response envelope, so one sequential paging loop serves every exchange.
pub struct RestCandleClient<Server> {
    http: reqwest::Client,
    base_url: Url,
    _server: PhantomData<Server>,
}

impl<Server> Clone for RestCandleClient<Server> {
    fn clone(&self) -> Self {
        Self {
            http: self.http.clone(),
            base_url: self.base_url.clone(),
            _server: PhantomData,
        }
    }
}

impl<Server> fmt::Debug for RestCandleClient<Server> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RestCandleClient")
            .field("base_url", &self.base_url.as_str())
            .finish()
    }
}

impl<Server> RestCandleClient<Server>
where
    Server: CandleServer,
{
    /// Construct a new [`RestCandleClient`] using the base URL from
    /// [`Server::rest_base_url()`](CandleServer::rest_base_url).
    pub fn new() -> Result<Self, DataError> {
        Self::with_base_url(Server::rest_base_url())
    }

    /// Construct a [`RestCandleClient`] with a custom base URL.
    ///
    /// Useful for testing with a mock server where the URL is not known at compile time.
    pub fn with_base_url<S: AsRef<str>>(base_url: S) -> Result<Self, DataError> {
        let http = reqwest::Client::builder()
            .timeout(DEFAULT_REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            base_url: Url::parse(base_url.as_ref())?,
            _server: PhantomData,
        })
    }

    /// Replace the per-request timeout. A timed out request is a transport fault.
    pub fn with_timeout(self, timeout: Duration) -> Result<Self, DataError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http, ..self })
    }

    /// Full candles url for `market`, keeping any path prefix of the base url.
    ///
    /// Each `/` separated part of the candles path is pushed as its own percent-encoded segment,
    /// so a market name can never reach the query or fragment.
    pub fn candles_url(&self, market: &str) -> Result<Url, DataError> {
        let path = Server::candles_path(market);

        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| DataError::Url(ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .extend(path.split('/').filter(|segment| !segment.is_empty()));

        Ok(url)
    }

    /// Issue exactly one GET for `window` and return the raw answer, whatever its status.
    ///
    /// Transport faults (connection errors, timeouts) are returned as
    /// [`DataError::Transport`].
    pub async fn fetch_window(
        &self,
        market: &str,
        window: Window,
        resolution: u32,
        page_size: u32,
    ) -> Result<WindowResponse, DataError> {
        let url = self.candles_url(market)?;
        let params = Server::params(market, window, resolution, page_size)?;

        let response = self.http.get(url).query(&params).send().await?;
        let status = response.status();
        let body = response.bytes().await?.to_vec();

        debug!(%status, bytes = body.len(), "received window response");

        Ok(WindowResponse {
            window,
            status,
            body,
        })
    }
}

/// Internal pagination state used by [`CandleFetcher::stream_candles`].
struct PaginationState<Server> {
    client: RestCandleClient<Server>,
    market: String,
    resolution: u32,
    page_size: u32,
    windows: Option<IntervalPaginator>,
    error: Option<DataError>,
}

impl<Server> CandleFetcher for RestCandleClient<Server>
where
    Server: CandleServer,
{
    fn fetch_candles(
        &self,
        request: CandleRequest,
    ) -> impl Future<Output = Result<CandleFetch, DataError>> + Send {
        let this = self.clone();
        let span = tracing::info_span!(
            "fetch_candles",
            exchange = %Server::ID,
            market = %request.market,
            resolution = request.resolution,
        );
        async move {
            let mut records = Vec::new();
            let mut missing = Vec::new();

            let mut batches = std::pin::pin!(this.stream_candles(request));
            while let Some(batch) = batches.next().await {
                let WindowBatch { window, outcome } = batch?;
                match outcome {
                    WindowOutcome::Records(batch) => records.extend(batch),
                    WindowOutcome::Missing(status) => {
                        missing.push(MissingWindow { window, status })
                    }
                }
            }

            let table = match Server::columns() {
                Some(columns) => CryptoTable::with_columns(columns, records),
                None => CryptoTable::from_records(records),
            };

            info!(
                rows = table.len(),
                missing = missing.len(),
                "fetched candle range"
            );

            Ok(CandleFetch { table, missing })
        }
        .instrument(span)
    }

    fn stream_candles(
        &self,
        request: CandleRequest,
    ) -> impl Stream<Item = Result<WindowBatch, DataError>> + Send {
        let (windows, error) = match IntervalPaginator::from_range(
            request.start,
            request.end,
            request.resolution,
            request.page_size,
            Server::TIME_UNIT,
        ) {
            Ok(windows) => (Some(windows), None),
            Err(error) => (None, Some(error)),
        };

        let state = PaginationState {
            client: self.clone(),
            market: request.market,
            resolution: request.resolution,
            page_size: request.page_size,
            windows,
            error,
        };

        stream::unfold(state, |mut state| async move {
            if let Some(error) = state.error.take() {
                state.windows = None;
                return Some((Err(error), state));
            }

            let window = state.windows.as_mut()?.next()?;

            let span = tracing::info_span!(
                "fetch_window",
                exchange = %Server::ID,
                market = %state.market,
                %window,
            );

            let outcome = state
                .client
                .fetch_window(&state.market, window, state.resolution, state.page_size)
                .instrument(span)
                .await
                .and_then(WindowResponse::decode::<Server>);

            match outcome {
                Err(error) => {
                    warn!(%window, ?error, "window fetch failed, aborting pagination");
                    state.windows = None;
                    Some((Err(error), state))
                }
                Ok(outcome) => {
                    if let WindowOutcome::Missing(status) = &outcome {
                        warn!(%window, %status, "window rejected, skipping");
                    }
                    Some((Ok(WindowBatch { window, outcome }), state))
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exchange::{ftx::FtxServer, poloniex::PoloniexServer};
    use serde_json::json;

    #[test]
    fn test_candles_url_keeps_base_path_prefix() {
        let client = RestCandleClient::<FtxServer>::new().unwrap();
        assert_eq!(
            client.candles_url("BTC/USDT").unwrap().as_str(),
            "https://ftx.com/api/markets/BTC/USDT/candles"
        );

        let client =
            RestCandleClient::<PoloniexServer>::with_base_url("http://127.0.0.1:8080/").unwrap();
        assert_eq!(
            client.candles_url("BTC_USDT").unwrap().as_str(),
            "http://127.0.0.1:8080/markets/BTC_USDT/candles"
        );
    }

    #[test]
    fn test_candles_url_escapes_market() {
        let client = RestCandleClient::<PoloniexServer>::new().unwrap();
        let url = client.candles_url("BTC_USDT?limit=1#x").unwrap();

        assert_eq!(url.query(), None);
        assert_eq!(url.fragment(), None);
        assert_eq!(
            url.as_str(),
            "https://api.poloniex.com/markets/BTC_USDT%3Flimit=1%23x/candles"
        );
    }

    #[test]
    fn test_decode_non_200_is_missing() {
        let response = WindowResponse {
            window: Window::new(0, 10),
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: b"not json".to_vec(),
        };

        assert_eq!(
            response.decode::<FtxServer>().unwrap(),
            WindowOutcome::Missing(StatusCode::INTERNAL_SERVER_ERROR)
        );
    }

    #[test]
    fn test_decode_unwraps_result_envelope() {
        let body = json!({"success": true, "result": [{"time": 1.0, "open": 2.0}]});
        let response = WindowResponse {
            window: Window::new(0, 10),
            status: StatusCode::OK,
            body: serde_json::to_vec(&body).unwrap(),
        };

        match response.decode::<FtxServer>().unwrap() {
            WindowOutcome::Records(records) => {
                assert_eq!(records.len(), 1);
                assert_eq!(records[0]["open"], json!(2.0));
            }
            other => panic!("expected records, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_malformed_200_body_is_an_error() {
        let response = WindowResponse {
            window: Window::new(0, 10),
            status: StatusCode::OK,
            body: b"<html>".to_vec(),
        };

        let error = response.decode::<PoloniexServer>().unwrap_err();
        assert!(matches!(error, DataError::Deserialise { ref window, .. } if window == "0-10"));
    }
}
