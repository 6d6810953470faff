use crate::error::DataError;
use chrono::{DateTime, Utc};
use dotenv::dotenv;
use std::{path::PathBuf, str::FromStr, time::Duration};
use tnb_instrument::{exchange::ExchangeId, pair::CurrencyPair};
use tracing::debug;

pub const DEFAULT_EXCHANGE: ExchangeId = ExchangeId::Ftx;
pub const DEFAULT_PAIRS: &str =
    "btc/usdt,eth/usdt,bnb/usdt,xrp/usdt,ada/usdt,sol/usdt,doge/usdt,dot/usdt,avax/usdt";
pub const DEFAULT_START_TIME: i64 = 1_495_032_490;
pub const DEFAULT_END_TIME: i64 = 1_652_798_890;
pub const DEFAULT_FTX_RESOLUTION: u32 = 15;
pub const DEFAULT_RESOLUTION: u32 = 300;
pub const DEFAULT_CRAWL_PAGE_SIZE: u32 = 10_000;
pub const DEFAULT_OUTPUT_DIR: &str = "./data/crawl";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Settings for the `crawl` binary, read from the environment (and `.env` if present).
#[derive(Debug, Clone, PartialEq)]
pub struct CrawlConfig {
    pub exchange: ExchangeId,
    pub pairs: Vec<CurrencyPair>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Candle width in seconds.
    pub resolution: u32,
    pub page_size: u32,
    pub output_dir: PathBuf,
    pub request_timeout: Duration,
}

impl CrawlConfig {
    pub fn from_env() -> Result<Self, DataError> {
        dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a [`CrawlConfig`] from any key lookup, falling back to the defaults for absent keys.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, DataError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let exchange = parse_or(&lookup, "TNB_EXCHANGE", DEFAULT_EXCHANGE)?;

        let pairs = lookup("TNB_PAIRS")
            .unwrap_or_else(|| DEFAULT_PAIRS.to_string())
            .split(',')
            .filter(|pair| !pair.trim().is_empty())
            .map(|pair| pair.parse::<CurrencyPair>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|error| DataError::Config(format!("TNB_PAIRS: {error}")))?;

        let start = timestamp(&lookup, "TNB_START_TIME", DEFAULT_START_TIME)?;
        let end = timestamp(&lookup, "TNB_END_TIME", DEFAULT_END_TIME)?;

        let default_resolution = match exchange {
            ExchangeId::Ftx => DEFAULT_FTX_RESOLUTION,
            ExchangeId::Poloniex | ExchangeId::PoloniexLegacy => DEFAULT_RESOLUTION,
        };

        let config = Self {
            exchange,
            pairs,
            start,
            end,
            resolution: parse_or(&lookup, "TNB_RESOLUTION", default_resolution)?,
            page_size: parse_or(&lookup, "TNB_PAGE_SIZE", DEFAULT_CRAWL_PAGE_SIZE)?,
            output_dir: lookup("TNB_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR)),
            request_timeout: Duration::from_secs(parse_or(
                &lookup,
                "TNB_REQUEST_TIMEOUT_SECS",
                DEFAULT_REQUEST_TIMEOUT_SECS,
            )?),
        };

        debug!(?config, "loaded crawl configuration");
        Ok(config)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, DataError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|error| DataError::Config(format!("{key}={raw}: {error}"))),
    }
}

fn timestamp<F>(lookup: &F, key: &str, default: i64) -> Result<DateTime<Utc>, DataError>
where
    F: Fn(&str) -> Option<String>,
{
    let secs = parse_or(lookup, key, default)?;
    DateTime::from_timestamp(secs, 0)
        .ok_or_else(|| DataError::Config(format!("{key}={secs}: timestamp out of range")))
}
