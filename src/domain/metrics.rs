//! Presentation-ready metrics records, dual-denominated in SOL and USDT.

use super::{CloseReason, Decimal, Direction};
use serde::Serialize;

/// Metrics for one open position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionMetrics {
    pub order_id: String,
    pub order_type: u8,
    pub direction: Direction,
    /// Age since open, e.g. "5s", "3h".
    pub open_time: String,
    pub leverage: Decimal,
    pub margin_in_sol: Decimal,
    #[serde(rename = "marginInUSDT")]
    pub margin_in_usdt: Decimal,
    pub gross_profit_in_sol: Decimal,
    pub net_profit_in_sol: Decimal,
    #[serde(rename = "netProfitInUSDT")]
    pub net_profit_in_usdt: Decimal,
    pub profit_percentage: Decimal,
    pub stop_loss_percentage: Decimal,
    pub realized_in_sol: Decimal,
    #[serde(rename = "realizedInUSDT")]
    pub realized_in_usdt: Decimal,
}

/// Metrics for one closed position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryMetrics {
    pub order_id: String,
    pub order_type: u8,
    pub direction: Direction,
    /// Time between open and close, e.g. "2d".
    pub holding_time: String,
    pub leverage: Decimal,
    pub margin_in_sol: Decimal,
    #[serde(rename = "marginInUSDT")]
    pub margin_in_usdt: Decimal,
    pub realized_in_sol: Decimal,
    #[serde(rename = "realizedInUSDT")]
    pub realized_in_usdt: Decimal,
    pub profit_percentage: Decimal,
    /// Raw fixed-point close price, as a string to survive JSON number limits.
    pub close_price: String,
    pub close_reason: CloseReason,
    pub close_reason_label: &'static str,
    pub close_timestamp: i64,
}
