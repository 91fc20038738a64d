//! Bonding-curve quote abstraction.
//!
//! The curve pricing formula lives outside this crate. Valuation only needs two
//! questions answered: how much SOL selling a token quantity at a price yields,
//! and how much SOL buying it costs.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub mod table;

pub use table::StaticCurveQuoter;

/// Quote source for hypothetical closes against the curve.
pub trait CurveQuoter: Send + Sync + fmt::Debug {
    /// SOL proceeds (lamports) from selling `token_amount` at `price`.
    fn sell_for_proceeds(&self, price: u128, token_amount: u128)
        -> Result<CurveQuote, CurveError>;

    /// SOL cost (lamports) of buying `token_amount` at `price`.
    fn buy_for_cost(&self, price: u128, token_amount: u128) -> Result<CurveQuote, CurveError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuoteSide {
    Sell,
    Buy,
}

impl fmt::Display for QuoteSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuoteSide::Sell => write!(f, "sell"),
            QuoteSide::Buy => write!(f, "buy"),
        }
    }
}

/// A curve answer: either a bare lamport amount, or a pair whose second element
/// is the lamport amount actually consumed or produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurveQuote {
    Amount(u128),
    Pair(u128, u128),
}

impl CurveQuote {
    /// The settlement amount to value with.
    pub fn settled_amount(&self) -> u128 {
        match self {
            CurveQuote::Amount(amount) => *amount,
            CurveQuote::Pair(_, amount) => *amount,
        }
    }

    /// Parse either shape from JSON. Integers may be numbers or decimal strings.
    pub fn from_json(value: &serde_json::Value) -> Result<Self, CurveError> {
        match value {
            serde_json::Value::Array(items) => match items.as_slice() {
                [first, second, ..] => Ok(CurveQuote::Pair(
                    parse_amount(first)?,
                    parse_amount(second)?,
                )),
                _ => Err(CurveError::Malformed(format!(
                    "pair quote needs two elements, got {}",
                    items.len()
                ))),
            },
            other => parse_amount(other).map(CurveQuote::Amount),
        }
    }
}

fn parse_amount(value: &serde_json::Value) -> Result<u128, CurveError> {
    let parsed = match value {
        serde_json::Value::Number(n) => n.to_string().parse().ok(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| CurveError::Malformed(format!("not an unsigned amount: {}", value)))
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CurveError {
    #[error("no {side} quote for price {price}, token amount {token_amount}")]
    NoQuote {
        side: QuoteSide,
        price: u128,
        token_amount: u128,
    },
    #[error("malformed curve quote: {0}")]
    Malformed(String),
    #[error("curve quote table unreadable: {0}")]
    Io(String),
}
