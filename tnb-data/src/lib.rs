#![warn(
    unused,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    rust_2018_idioms
)]

//! # tnb-data
//! Historical crypto candle data for offline model training.
//!
//! * **Fetch**: page through a time range one window at a time against an exchange candle API,
//!   collecting the returned rows into a [`CryptoTable`](table::CryptoTable).
//! * **Crawl**: dump every raw window response to disk, then [`merge`] the files back into a
//!   table later.
//! * **Train**: wrap a table in a [`CryptoCandleDataset`](dataset::CryptoCandleDataset) that
//!   serves fixed-length historical windows as `ndarray` matrices.
//!
//! ## Examples
//! ```rust,ignore
//! use chrono::DateTime;
//! use tnb_data::{dataset::CryptoCandleDataset, request::CryptoDataRequest};
//!
//! let table = CryptoDataRequest::new()?
//!     .request("BTC/USDT", start, end, "ftx", 300, None)
//!     .await?;
//!
//! let dataset = CryptoCandleDataset::new(&table, 32, ["open", "close"])?;
//! let first = dataset.get(0)?; // shape [32, 2]
//! ```

/// All [`Error`](std::error::Error)s generated in tnb-data.
pub mod error;

/// Exchange specific candle API descriptors.
#[cfg(feature = "rest")]
pub mod exchange;

/// Interval paging, the generic REST candle client and the [`CandleFetcher`](rest::CandleFetcher)
/// interface.
#[cfg(feature = "rest")]
pub mod rest;

/// Unified [`CryptoDataRequest`](request::CryptoDataRequest) facade over the supported exchanges.
#[cfg(feature = "rest")]
pub mod request;

/// Raw per-window response crawler.
#[cfg(feature = "rest")]
pub mod crawl;

/// Merge crawled window files back into a single table.
#[cfg(feature = "rest")]
pub mod merge;

/// Schema-less candle table with CSV persistence.
pub mod table;

/// Fixed-length historical window dataset for training loops.
pub mod dataset;

/// Environment driven crawl configuration.
pub mod config;

/// Tracing subscriber initialisation for binaries.
pub mod logging;
