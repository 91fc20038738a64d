//! Merges valuations, leverage and age into dual-denominated metrics records.

use super::{format_elapsed, leverage_or_zero, ClosedValuation, EngineConfig, OpenValuation};
use crate::domain::{ClosedOrderRecord, Decimal, HistoryMetrics, Position, PositionMetrics};

/// Applies a SOL to USDT spot rate to engine results.
#[derive(Debug, Clone, Copy)]
pub struct DisplayAggregator {
    config: EngineConfig,
    spot_rate: Decimal,
}

impl DisplayAggregator {
    pub fn new(config: EngineConfig, spot_rate: Decimal) -> Self {
        Self { config, spot_rate }
    }

    /// SOL amount in USDT. A product beyond the decimal range is clamped to the
    /// nearest representable bound and logged.
    fn to_usdt(&self, sol: Decimal) -> Decimal {
        sol.checked_mul(self.spot_rate).unwrap_or_else(|| {
            tracing::warn!(
                "USDT conversion of {} SOL at {} overflowed, clamping",
                sol,
                self.spot_rate
            );
            sol.saturating_mul(self.spot_rate)
        })
    }

    /// Build the open-position record.
    pub fn open_metrics(
        &self,
        position: &Position,
        valuation: &OpenValuation,
        now: i64,
    ) -> PositionMetrics {
        let leverage = leverage_or_zero(
            &self.config.units,
            self.config.order_types,
            position.order_type,
            position.open_price,
            position.lock_lp_start_price,
        );

        PositionMetrics {
            order_id: position.order_id.clone(),
            order_type: position.order_type,
            direction: valuation.direction,
            open_time: format_elapsed(position.start_time, now),
            leverage,
            margin_in_sol: valuation.margin,
            margin_in_usdt: self.to_usdt(valuation.margin),
            gross_profit_in_sol: valuation.gross_profit,
            net_profit_in_sol: valuation.net_profit,
            net_profit_in_usdt: self.to_usdt(valuation.net_profit),
            profit_percentage: valuation.profit_percentage,
            stop_loss_percentage: valuation.stop_loss_percentage,
            realized_in_sol: valuation.realized,
            realized_in_usdt: self.to_usdt(valuation.realized),
        }
    }

    /// Build the closed-position record.
    pub fn history_metrics(
        &self,
        record: &ClosedOrderRecord,
        valuation: &ClosedValuation,
    ) -> HistoryMetrics {
        let order = &record.order;
        let close = &record.close_info;
        let leverage = leverage_or_zero(
            &self.config.units,
            self.config.order_types,
            order.order_type,
            order.open_price,
            order.lock_lp_start_price,
        );

        HistoryMetrics {
            order_id: order.order_id.clone(),
            order_type: order.order_type,
            direction: valuation.direction,
            holding_time: format_elapsed(order.start_time, close.close_timestamp),
            leverage,
            margin_in_sol: valuation.margin,
            margin_in_usdt: self.to_usdt(valuation.margin),
            realized_in_sol: valuation.realized,
            realized_in_usdt: self.to_usdt(valuation.realized),
            profit_percentage: valuation.profit_percentage,
            close_price: close.close_price.to_string(),
            close_reason: close.close_reason,
            close_reason_label: close.close_reason.label(),
            close_timestamp: close.close_timestamp,
        }
    }
}
