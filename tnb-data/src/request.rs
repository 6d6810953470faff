use crate::{
    error::DataError,
    exchange::{ftx::FtxServer, poloniex::PoloniexServer},
    rest::{CandleFetch, CandleFetcher, CandleRequest, DEFAULT_PAGE_SIZE, RestCandleClient},
    table::CryptoTable,
};
use chrono::{DateTime, Utc};
use std::path::Path;
use tnb_instrument::exchange::ExchangeId;
use tracing::{info, warn};

/// Single entry point for requesting a historical candle range from any supported exchange.
///
/// Supported exchange names are `"ftx"` and `"poloniex"`. Each call pages through the range
/// sequentially with a fresh set of query parameters per window.
#[derive(Debug, Clone)]
pub struct CryptoDataRequest {
    ftx: RestCandleClient<FtxServer>,
    poloniex: RestCandleClient<PoloniexServer>,
    page_size: u32,
}

impl CryptoDataRequest {
    /// Construct a [`CryptoDataRequest`] against the production exchange APIs.
    pub fn new() -> Result<Self, DataError> {
        Ok(Self {
            ftx: RestCandleClient::new()?,
            poloniex: RestCandleClient::new()?,
            page_size: DEFAULT_PAGE_SIZE,
        })
    }

    /// Construct a [`CryptoDataRequest`] from pre-built clients, eg/ pointed at mock servers.
    pub fn with_clients(
        ftx: RestCandleClient<FtxServer>,
        poloniex: RestCandleClient<PoloniexServer>,
    ) -> Self {
        Self {
            ftx,
            poloniex,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Override the number of candles requested per window.
    pub fn with_page_size(self, page_size: u32) -> Self {
        Self { page_size, ..self }
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Fetch `currency` over `[start, end)` from `exchange` and return the resulting table.
    ///
    /// If `file_path` is provided the table is also written there as comma delimited text.
    /// Windows rejected by the exchange are skipped; use
    /// [`request_with_gaps`](Self::request_with_gaps) to see which.
    pub async fn request(
        &self,
        currency: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        exchange: &str,
        resolution: u32,
        file_path: Option<&Path>,
    ) -> Result<CryptoTable, DataError> {
        self.request_with_gaps(currency, start, end, exchange, resolution, file_path)
            .await
            .map(|fetch| fetch.table)
    }

    /// As [`request`](Self::request), also returning the manifest of windows the exchange
    /// rejected.
    pub async fn request_with_gaps(
        &self,
        currency: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        exchange: &str,
        resolution: u32,
        file_path: Option<&Path>,
    ) -> Result<CandleFetch, DataError> {
        let exchange = supported_exchange(exchange)?;
        let request = CandleRequest::new(
            currency.to_string(),
            start,
            end,
            resolution,
            self.page_size,
        );

        let fetch = match exchange {
            ExchangeId::Ftx => self.ftx.fetch_candles(request).await?,
            ExchangeId::Poloniex => self.poloniex.fetch_candles(request).await?,
            ExchangeId::PoloniexLegacy => {
                return Err(DataError::UnsupportedExchange(exchange.to_string()));
            }
        };

        for gap in &fetch.missing {
            warn!(
                %exchange,
                currency,
                window = %gap.window,
                status = %gap.status,
                "candle window missing from output"
            );
        }

        if let Some(path) = file_path {
            fetch.table.write_csv(path)?;
            info!(%exchange, currency, path = %path.display(), "persisted candle table");
        }

        Ok(fetch)
    }
}

/// Resolve an exchange name accepted by [`CryptoDataRequest`].
fn supported_exchange(name: &str) -> Result<ExchangeId, DataError> {
    match name.parse::<ExchangeId>() {
        Ok(exchange @ (ExchangeId::Ftx | ExchangeId::Poloniex)) => Ok(exchange),
        _ => Err(DataError::UnsupportedExchange(name.to_string())),
    }
}
