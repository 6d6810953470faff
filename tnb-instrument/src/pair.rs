use crate::exchange::ExchangeId;
use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Exchange-agnostic currency pair, eg/ `btc/usdt`.
///
/// Both legs are stored lowercase. Use [`CurrencyPair::market`] to render the exchange specific
/// market name used in request paths and query parameters.
#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Deserialize, Serialize, Display)]
#[display("{base}/{quote}")]
pub struct CurrencyPair {
    pub base: String,
    pub quote: String,
}

impl CurrencyPair {
    pub fn new<S: AsRef<str>>(base: S, quote: S) -> Self {
        Self {
            base: base.as_ref().to_ascii_lowercase(),
            quote: quote.as_ref().to_ascii_lowercase(),
        }
    }

    /// Render the market name the given [`ExchangeId`] expects.
    ///
    /// ```text
    /// Ftx            -> BTC/USDT
    /// Poloniex       -> BTC_USDT
    /// PoloniexLegacy -> USDT_BTC
    /// ```
    pub fn market(&self, exchange: ExchangeId) -> String {
        let base = self.base.to_ascii_uppercase();
        let quote = self.quote.to_ascii_uppercase();
        match exchange {
            ExchangeId::Ftx => format!("{base}/{quote}"),
            ExchangeId::Poloniex => format!("{base}_{quote}"),
            ExchangeId::PoloniexLegacy => format!("{quote}_{base}"),
        }
    }
}

impl FromStr for CurrencyPair {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (base, quote) = trimmed
            .split_once(['/', '_', '-'])
            .ok_or_else(|| format!("currency pair must be base/quote: {s}"))?;

        if base.is_empty() || quote.is_empty() {
            return Err(format!("currency pair must be base/quote: {s}"));
        }

        Ok(Self::new(base, quote))
    }
}
