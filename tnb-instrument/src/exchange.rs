use serde::{Deserialize, Serialize};

/// Unique identifier for an exchange candle API.
///
/// ### Notes
/// An exchange may expose more than one historical candle API with distinct parameter names,
/// time units and response envelopes.
///
/// For example, the Poloniex `markets/{symbol}/candles` API and the retired Poloniex
/// `public?command=returnChartData` API are represented as unique variants.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Deserialize, Serialize)]
#[serde(rename = "exchange", rename_all = "snake_case")]
pub enum ExchangeId {
    Ftx,
    Poloniex,
    PoloniexLegacy,
}

impl ExchangeId {
    /// Return the &str representation of this [`ExchangeId`]
    pub fn as_str(&self) -> &'static str {
        match self {
            ExchangeId::Ftx => "ftx",
            ExchangeId::Poloniex => "poloniex",
            ExchangeId::PoloniexLegacy => "poloniex_legacy",
        }
    }
}

impl std::fmt::Display for ExchangeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ExchangeId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        match lower.as_str() {
            "ftx" => Ok(ExchangeId::Ftx),
            "poloniex" => Ok(ExchangeId::Poloniex),
            "poloniex_legacy" | "poloniexlegacy" => Ok(ExchangeId::PoloniexLegacy),
            _ => Err(format!("unrecognised ExchangeId: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_de_exchange_id() {
        assert_eq!(
            serde_json::from_str::<ExchangeId>(r#""ftx""#).unwrap(),
            ExchangeId::Ftx
        );
        assert_eq!(
            serde_json::from_str::<ExchangeId>(r#""poloniex_legacy""#).unwrap(),
            ExchangeId::PoloniexLegacy
        );
    }

    #[test]
    fn test_from_str_roundtrip() {
        for variant in [
            ExchangeId::Ftx,
            ExchangeId::Poloniex,
            ExchangeId::PoloniexLegacy,
        ] {
            let parsed: ExchangeId = variant.as_str().parse().unwrap_or_else(|e: String| {
                panic!("failed to parse {:?} from {:?}: {e}", variant, variant.as_str())
            });
            assert_eq!(parsed, variant, "roundtrip failed for {:?}", variant);
            assert_eq!(variant.to_string(), variant.as_str());
        }
    }

    #[test]
    fn test_from_str_case_insensitive() {
        assert_eq!("FTX".parse::<ExchangeId>().unwrap(), ExchangeId::Ftx);
        assert_eq!(
            "PoloniexLegacy".parse::<ExchangeId>().unwrap(),
            ExchangeId::PoloniexLegacy
        );
    }

    #[test]
    fn test_from_str_invalid() {
        let result = "binance".parse::<ExchangeId>();
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("binance"));
    }
}
