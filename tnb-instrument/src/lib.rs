#![warn(
    unused,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    rust_2018_idioms
)]

//! # tnb-instrument
//! Vocabulary shared by the tnb crates: which exchange API is being spoken to ([`ExchangeId`])
//! and which market is being fetched ([`CurrencyPair`]).

/// Defines the [`ExchangeId`](exchange::ExchangeId) of every supported candle API.
pub mod exchange;

/// Defines the exchange-agnostic [`CurrencyPair`](pair::CurrencyPair).
pub mod pair;

pub use exchange::ExchangeId;
pub use pair::CurrencyPair;
