//! Realized P&L of closed positions.
//!
//! The settlement amount is already recorded on the order, so no curve quote is
//! needed. Forced liquidations report zero whatever the record carries.

use super::{percent, EngineConfig, ValuationError};
use crate::domain::{ClosedOrderRecord, Decimal, Direction};
use tracing::debug;

/// Realized result for one closed position, amounts in SOL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClosedValuation {
    pub direction: Direction,
    /// Initial margin.
    pub margin: Decimal,
    pub realized: Decimal,
    pub profit_percentage: Decimal,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HistoryValuator {
    config: EngineConfig,
}

impl HistoryValuator {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn value(&self, record: &ClosedOrderRecord) -> Result<ClosedValuation, ValuationError> {
        let order = &record.order;
        let direction = self
            .config
            .order_types
            .direction(order.order_type)
            .ok_or(ValuationError::UnknownOrderType(order.order_type))?;

        let units = &self.config.units;
        let margin = units.to_settlement_units(order.margin_init_sol_amount.into())?;

        let reason = record.close_info.close_reason;
        let (realized, profit_percentage) = if reason.zeroes_realized() {
            debug!(
                "Order {} closed by {}, realized P&L forced to 0",
                order.order_id,
                reason.label()
            );
            (Decimal::zero(), Decimal::zero())
        } else {
            let realized = units.to_settlement_units(order.realized_lamports().into())?;
            (realized, percent(realized, margin, "initial margin")?)
        };

        debug!(
            "Closed {} ({}): margin {} SOL, realized {} SOL, {}%",
            order.order_id,
            reason.label(),
            margin,
            realized,
            profit_percentage
        );

        Ok(ClosedValuation {
            direction,
            margin,
            realized,
            profit_percentage,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CloseInfo, CloseReason, OrderTypeMapping, Position};

    fn d(s: &str) -> Decimal {
        Decimal::from_str_canonical(s).unwrap()
    }

    fn record(reason: u8, margin_init: u64, realized: Option<i64>) -> ClosedOrderRecord {
        ClosedOrderRecord {
            order: Position {
                order_id: "7".to_string(),
                order_type: 1,
                open_price: 1000,
                lock_lp_start_price: 1100,
                lock_lp_token_amount: 1_000_000,
                margin_sol_amount: margin_init,
                margin_init_sol_amount: margin_init,
                borrow_amount: 0,
                realized_sol_amount: realized,
                start_time: 1_000,
                latest_price: None,
            },
            close_info: CloseInfo {
                close_price: 1050,
                close_reason: CloseReason::from(reason),
                close_timestamp: 4_600,
            },
        }
    }

    #[test]
    fn test_user_close_uses_recorded_amount() {
        let v = HistoryValuator::default();
        for reason in [1, 3, 4, 5] {
            let result = v
                .value(&record(reason, 2_000_000_000, Some(500_000_000)))
                .unwrap();
            assert_eq!(result.realized, d("0.5"));
            assert_eq!(result.profit_percentage, d("25"));
            assert_eq!(result.margin, d("2"));
        }
    }

    #[test]
    fn test_liquidation_forces_zero() {
        let v = HistoryValuator::default();
        let result = v
            .value(&record(2, 2_000_000_000, Some(-1_700_000_000)))
            .unwrap();
        assert_eq!(result.realized, Decimal::zero());
        assert_eq!(result.profit_percentage, Decimal::zero());

        // even with nothing to divide by
        let result = v.value(&record(2, 0, Some(123))).unwrap();
        assert_eq!(result.realized, Decimal::zero());
    }

    #[test]
    fn test_zero_initial_margin() {
        let err = HistoryValuator::default()
            .value(&record(1, 0, Some(1)))
            .unwrap_err();
        assert_eq!(err, ValuationError::DivisionByZero("initial margin"));
    }

    #[test]
    fn test_null_realized_reads_as_zero() {
        let result = HistoryValuator::default()
            .value(&record(3, 1_000_000_000, None))
            .unwrap();
        assert_eq!(result.realized, Decimal::zero());
        assert_eq!(result.profit_percentage, Decimal::zero());
    }

    #[test]
    fn test_direction_follows_mapping() {
        let config = EngineConfig {
            order_types: OrderTypeMapping::ShortIsOne,
            ..EngineConfig::default()
        };
        let result = HistoryValuator::new(config)
            .value(&record(1, 1_000_000_000, None))
            .unwrap();
        assert_eq!(result.direction, Direction::Short);
    }
}
