//! Order records as delivered by the orderbook API.
//!
//! Raw integers arrive either as JSON numbers or as decimal strings (prices exceed
//! 2^53), so every integer field goes through a tolerant deserializer.

use super::CloseReason;
use serde::{Deserialize, Deserializer, Serialize};

/// An open (or, inside a [`ClosedOrderRecord`], formerly open) leveraged order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    #[serde(deserialize_with = "de_id")]
    pub order_id: String,
    /// Raw direction code; see [`super::OrderTypeMapping`].
    pub order_type: u8,
    /// Entry price, fixed-point.
    #[serde(deserialize_with = "de_u128")]
    pub open_price: u128,
    /// Stop-loss trigger price, fixed-point.
    #[serde(deserialize_with = "de_u128")]
    pub lock_lp_start_price: u128,
    /// Locked token quantity, raw token units.
    #[serde(deserialize_with = "de_u128")]
    pub lock_lp_token_amount: u128,
    /// Current margin, lamports.
    #[serde(deserialize_with = "de_u64")]
    pub margin_sol_amount: u64,
    /// Margin posted at entry, lamports.
    #[serde(deserialize_with = "de_u64")]
    pub margin_init_sol_amount: u64,
    #[serde(deserialize_with = "de_u64")]
    pub borrow_amount: u64,
    /// Realized P&L so far, lamports. Negative for realized losses.
    #[serde(default, deserialize_with = "de_opt_i64")]
    pub realized_sol_amount: Option<i64>,
    /// Unix seconds.
    #[serde(deserialize_with = "de_i64")]
    pub start_time: i64,
    /// Mark price injected by the caller before valuation.
    #[serde(default, deserialize_with = "de_opt_u128")]
    pub latest_price: Option<u128>,
}

/// Closed orders carry the same entry-side fields.
pub type Order = Position;

impl Position {
    /// Copy of this position carrying the given mark price.
    pub fn with_latest_price(&self, latest_price: u128) -> Self {
        Self {
            latest_price: Some(latest_price),
            ..self.clone()
        }
    }

    /// Realized amount with a missing value read as zero.
    pub fn realized_lamports(&self) -> i64 {
        self.realized_sol_amount.unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloseInfo {
    #[serde(deserialize_with = "de_u128")]
    pub close_price: u128,
    pub close_reason: CloseReason,
    /// Unix seconds.
    #[serde(deserialize_with = "de_i64")]
    pub close_timestamp: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClosedOrderRecord {
    pub order: Order,
    pub close_info: CloseInfo,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawInt {
    Num(serde_json::Number),
    Str(String),
}

impl RawInt {
    fn parse<T: std::str::FromStr>(&self) -> Option<T> {
        match self {
            RawInt::Num(n) => n.to_string().parse().ok(),
            RawInt::Str(s) => s.trim().parse().ok(),
        }
    }

    fn describe(&self) -> String {
        match self {
            RawInt::Num(n) => n.to_string(),
            RawInt::Str(s) => format!("{:?}", s),
        }
    }
}

fn parse_raw<'de, D, T>(deserializer: D, what: &str) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: std::str::FromStr,
{
    let raw = RawInt::deserialize(deserializer)?;
    raw.parse().ok_or_else(|| {
        serde::de::Error::custom(format!("expected {}, got {}", what, raw.describe()))
    })
}

pub(crate) fn de_u128<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u128, D::Error> {
    parse_raw(deserializer, "unsigned integer")
}

pub(crate) fn de_u64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    parse_raw(deserializer, "unsigned 64-bit integer")
}

pub(crate) fn de_i64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    parse_raw(deserializer, "64-bit integer")
}

pub(crate) fn de_opt_i64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    match Option::<RawInt>::deserialize(deserializer)? {
        None => Ok(None),
        Some(raw) => raw.parse().map(Some).ok_or_else(|| {
            serde::de::Error::custom(format!("expected 64-bit integer, got {}", raw.describe()))
        }),
    }
}

pub(crate) fn de_opt_u128<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u128>, D::Error> {
    match Option::<RawInt>::deserialize(deserializer)? {
        None => Ok(None),
        Some(raw) => raw.parse().map(Some).ok_or_else(|| {
            serde::de::Error::custom(format!("expected unsigned integer, got {}", raw.describe()))
        }),
    }
}

pub(crate) fn de_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match RawInt::deserialize(deserializer)? {
        RawInt::Num(n) => n.to_string(),
        RawInt::Str(s) => s,
    })
}
