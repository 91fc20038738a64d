//! Precomputed curve quotes held in memory.
//!
//! Used by tests and by the binary, which loads a table exported by the curve SDK:
//!
//! ```json
//! [{"side": "sell", "price": "1100", "token_amount": "1000", "quote": [0, "1600000000"]}]
//! ```

use super::{CurveError, CurveQuote, CurveQuoter, QuoteSide};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// Curve quoter answering from a fixed table.
#[derive(Debug, Clone, Default)]
pub struct StaticCurveQuoter {
    quotes: HashMap<(QuoteSide, u128, u128), CurveQuote>,
}

#[derive(Debug, Deserialize)]
struct TableEntry {
    side: QuoteSide,
    price: serde_json::Value,
    token_amount: serde_json::Value,
    quote: serde_json::Value,
}

impl StaticCurveQuoter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sell_quote(mut self, price: u128, token_amount: u128, quote: CurveQuote) -> Self {
        self.quotes
            .insert((QuoteSide::Sell, price, token_amount), quote);
        self
    }

    pub fn with_buy_quote(mut self, price: u128, token_amount: u128, quote: CurveQuote) -> Self {
        self.quotes.insert((QuoteSide::Buy, price, token_amount), quote);
        self
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    /// Parse a JSON array of table entries.
    pub fn from_json_str(s: &str) -> Result<Self, CurveError> {
        let entries: Vec<TableEntry> =
            serde_json::from_str(s).map_err(|e| CurveError::Malformed(e.to_string()))?;

        let mut quotes = HashMap::with_capacity(entries.len());
        for entry in entries {
            let price = match CurveQuote::from_json(&entry.price)? {
                CurveQuote::Amount(p) => p,
                CurveQuote::Pair(..) => {
                    return Err(CurveError::Malformed("price must be a scalar".to_string()))
                }
            };
            let token_amount = match CurveQuote::from_json(&entry.token_amount)? {
                CurveQuote::Amount(a) => a,
                CurveQuote::Pair(..) => {
                    return Err(CurveError::Malformed(
                        "token_amount must be a scalar".to_string(),
                    ))
                }
            };
            let quote = CurveQuote::from_json(&entry.quote)?;
            quotes.insert((entry.side, price, token_amount), quote);
        }

        tracing::debug!("Loaded {} curve quotes", quotes.len());
        Ok(Self { quotes })
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CurveError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| CurveError::Io(format!("{}: {}", path.display(), e)))?;
        Self::from_json_str(&content)
    }

    fn lookup(
        &self,
        side: QuoteSide,
        price: u128,
        token_amount: u128,
    ) -> Result<CurveQuote, CurveError> {
        self.quotes
            .get(&(side, price, token_amount))
            .copied()
            .ok_or(CurveError::NoQuote {
                side,
                price,
                token_amount,
            })
    }
}

impl CurveQuoter for StaticCurveQuoter {
    fn sell_for_proceeds(
        &self,
        price: u128,
        token_amount: u128,
    ) -> Result<CurveQuote, CurveError> {
        self.lookup(QuoteSide::Sell, price, token_amount)
    }

    fn buy_for_cost(&self, price: u128, token_amount: u128) -> Result<CurveQuote, CurveError> {
        self.lookup(QuoteSide::Buy, price, token_amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_lookup_by_side() {
        let quoter = StaticCurveQuoter::new()
            .with_sell_quote(1100, 1000, CurveQuote::Amount(10))
            .with_buy_quote(1100, 1000, CurveQuote::Pair(1, 20));

        assert_eq!(quoter.sell_for_proceeds(1100, 1000).unwrap().settled_amount(), 10);
        assert_eq!(quoter.buy_for_cost(1100, 1000).unwrap().settled_amount(), 20);
        assert_eq!(
            quoter.buy_for_cost(1000, 1000),
            Err(CurveError::NoQuote {
                side: QuoteSide::Buy,
                price: 1000,
                token_amount: 1000
            })
        );
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[
                {{"side": "sell", "price": "1100", "token_amount": 1000, "quote": [0, "1600000000"]}},
                {{"side": "buy", "price": 1000, "token_amount": "1000", "quote": 900000000}}
            ]"#
        )
        .unwrap();

        let quoter = StaticCurveQuoter::from_path(file.path()).unwrap();
        assert_eq!(quoter.len(), 2);
        assert_eq!(
            quoter.sell_for_proceeds(1100, 1000).unwrap(),
            CurveQuote::Pair(0, 1_600_000_000)
        );
        assert_eq!(
            quoter.buy_for_cost(1000, 1000).unwrap(),
            CurveQuote::Amount(900_000_000)
        );
    }

    #[test]
    fn test_missing_file() {
        let err = StaticCurveQuoter::from_path("/nonexistent/quotes.json").unwrap_err();
        assert!(matches!(err, CurveError::Io(_)));
    }

    #[test]
    fn test_malformed_entry() {
        let err = StaticCurveQuoter::from_json_str(r#"[{"side": "sell", "price": 1}]"#).unwrap_err();
        assert!(matches!(err, CurveError::Malformed(_)));
    }
}
