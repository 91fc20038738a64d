//! Unrealized P&L of open positions.
//!
//! Longs close by selling the locked tokens back into the curve; shorts close by
//! buying them back. The two sides are margined differently: long returns are
//! measured against current margin, short returns against initial margin.

use super::{add, percent, sub, EngineConfig, ValuationError};
use crate::config::{LongPnlVariant, ShortPnlVariant};
use crate::curve::CurveQuoter;
use crate::domain::{Decimal, Direction, Position};
use std::sync::Arc;
use tracing::debug;

/// Unrealized result for one open position, all amounts in SOL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenValuation {
    pub direction: Direction,
    pub gross_profit: Decimal,
    pub net_profit: Decimal,
    pub profit_percentage: Decimal,
    pub stop_loss_percentage: Decimal,
    pub realized: Decimal,
    /// Current margin.
    pub margin: Decimal,
}

#[derive(Debug, Clone)]
pub struct PositionValuator {
    config: EngineConfig,
    curve: Arc<dyn CurveQuoter>,
}

/// Position amounts converted to SOL.
struct Amounts {
    margin: Decimal,
    margin_init: Decimal,
    borrowed: Decimal,
    realized: Decimal,
}

impl PositionValuator {
    pub fn new(config: EngineConfig, curve: Arc<dyn CurveQuoter>) -> Self {
        Self { config, curve }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Value an open position at its injected `latest_price`.
    pub fn value(&self, position: &Position) -> Result<OpenValuation, ValuationError> {
        let direction = self
            .config
            .order_types
            .direction(position.order_type)
            .ok_or(ValuationError::UnknownOrderType(position.order_type))?;
        let latest_price = position
            .latest_price
            .ok_or(ValuationError::MissingMarkPrice)?;

        let units = &self.config.units;
        let amounts = Amounts {
            margin: units.to_settlement_units(position.margin_sol_amount.into())?,
            margin_init: units.to_settlement_units(position.margin_init_sol_amount.into())?,
            borrowed: units.to_settlement_units(position.borrow_amount.into())?,
            realized: units.to_settlement_units(position.realized_lamports().into())?,
        };

        match direction {
            Direction::Long => self.value_long(position, latest_price, amounts),
            Direction::Short => self.value_short(position, latest_price, amounts),
        }
    }

    fn value_long(
        &self,
        position: &Position,
        latest_price: u128,
        amounts: Amounts,
    ) -> Result<OpenValuation, ValuationError> {
        let sell_quote = self
            .curve
            .sell_for_proceeds(latest_price, position.lock_lp_token_amount)?;
        let sell_income = self
            .config
            .units
            .to_settlement_units_u128(sell_quote.settled_amount())?;

        let (gross_profit, net_profit) = match self.config.long_variant {
            LongPnlVariant::InitialMargin => {
                let gross = sub(
                    add(sell_income, amounts.margin_init, "gross profit")?,
                    amounts.borrowed,
                    "gross profit",
                )?;
                (gross, sub(gross, amounts.margin, "net profit")?)
            }
            LongPnlVariant::CreditRealized => {
                let gross = sub(
                    add(sell_income, amounts.margin, "gross profit")?,
                    amounts.borrowed,
                    "gross profit",
                )?;
                let net = add(
                    sub(gross, amounts.margin, "net profit")?,
                    amounts.realized,
                    "net profit",
                )?;
                (gross, net)
            }
        };

        let profit_percentage = percent(net_profit, amounts.margin, "current margin")?;
        let stop_loss_percentage = self.stop_loss_percentage(
            position.lock_lp_start_price,
            latest_price,
            Direction::Long,
        )?;

        debug!(
            "Long {}: sell income {} SOL, gross {} SOL, net {} SOL, profit {}%, stop loss {}%",
            position.order_id,
            sell_income,
            gross_profit,
            net_profit,
            profit_percentage,
            stop_loss_percentage
        );

        Ok(OpenValuation {
            direction: Direction::Long,
            gross_profit,
            net_profit,
            profit_percentage,
            stop_loss_percentage,
            realized: amounts.realized,
            margin: amounts.margin,
        })
    }

    fn value_short(
        &self,
        position: &Position,
        latest_price: u128,
        amounts: Amounts,
    ) -> Result<OpenValuation, ValuationError> {
        let units = &self.config.units;
        let close_quote = self
            .curve
            .buy_for_cost(latest_price, position.lock_lp_token_amount)?;
        let close_cost = units.to_settlement_units_u128(close_quote.settled_amount())?;

        let unlock_quote = self
            .curve
            .buy_for_cost(position.lock_lp_start_price, position.lock_lp_token_amount)?;
        let unlock_amount = units.to_settlement_units_u128(unlock_quote.settled_amount())?;

        let gross_profit = sub(unlock_amount, close_cost, "gross profit")?;
        let net_profit = sub(gross_profit, amounts.margin_init, "net profit")?;
        let credited = match self.config.short_variant {
            ShortPnlVariant::CreditRealized => add(amounts.realized, net_profit, "total profit")?,
            ShortPnlVariant::NetOnly => net_profit,
        };
        let profit_percentage = percent(credited, amounts.margin_init, "initial margin")?;
        let stop_loss_percentage = self.stop_loss_percentage(
            position.lock_lp_start_price,
            latest_price,
            Direction::Short,
        )?;

        debug!(
            "Short {}: close cost {} SOL, unlock {} SOL, gross {} SOL, net {} SOL, profit {}%, stop loss {}%",
            position.order_id,
            close_cost,
            unlock_amount,
            gross_profit,
            net_profit,
            profit_percentage,
            stop_loss_percentage
        );

        Ok(OpenValuation {
            direction: Direction::Short,
            gross_profit,
            net_profit,
            profit_percentage,
            stop_loss_percentage,
            realized: amounts.realized,
            margin: amounts.margin,
        })
    }

    /// Distance from the stop trigger price to the mark, in percent of the trigger
    /// price. Positive while the position is on the safe side.
    fn stop_loss_percentage(
        &self,
        stop_price: u128,
        latest_price: u128,
        direction: Direction,
    ) -> Result<Decimal, ValuationError> {
        let units = &self.config.units;
        let stop = units.to_display_price(stop_price)?;
        let latest = units.to_display_price(latest_price)?;
        let distance = match direction {
            Direction::Long => sub(latest, stop, "stop-loss distance")?,
            Direction::Short => sub(stop, latest, "stop-loss distance")?,
        };
        percent(distance, stop, "stop-loss price")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::{CurveQuote, StaticCurveQuoter};

    const SOL: u64 = 1_000_000_000;
    const TOKENS: u128 = 1_000_000;

    fn d(s: &str) -> Decimal {
        Decimal::from_str_canonical(s).unwrap()
    }

    fn position(order_type: u8) -> Position {
        Position {
            order_id: "1".to_string(),
            order_type,
            open_price: 1000,
            lock_lp_start_price: 1000,
            lock_lp_token_amount: TOKENS,
            margin_sol_amount: SOL,
            margin_init_sol_amount: SOL,
            borrow_amount: SOL / 2,
            realized_sol_amount: None,
            start_time: 0,
            latest_price: Some(1100),
        }
    }

    fn valuator(curve: StaticCurveQuoter, variant: LongPnlVariant) -> PositionValuator {
        let config = EngineConfig {
            long_variant: variant,
            ..EngineConfig::default()
        };
        PositionValuator::new(config, Arc::new(curve))
    }

    fn long_curve() -> StaticCurveQuoter {
        StaticCurveQuoter::new().with_sell_quote(1100, TOKENS, CurveQuote::Amount(1_600_000_000))
    }

    #[test]
    fn test_long_scenario() {
        let v = valuator(long_curve(), LongPnlVariant::InitialMargin);
        let result = v.value(&position(1)).unwrap();
        assert_eq!(result.direction, Direction::Long);
        assert_eq!(result.gross_profit, d("2.1"));
        assert_eq!(result.net_profit, d("1.1"));
        assert_eq!(result.profit_percentage, d("110"));
        assert_eq!(result.stop_loss_percentage, d("10"));
        assert_eq!(result.margin, d("1"));
    }

    #[test]
    fn test_long_margin_asymmetry() {
        let mut p = position(1);
        p.margin_sol_amount = 2 * SOL;
        let result = valuator(long_curve(), LongPnlVariant::InitialMargin)
            .value(&p)
            .unwrap();
        // gross uses initial margin, net and percentage use current margin
        assert_eq!(result.gross_profit, d("2.1"));
        assert_eq!(result.net_profit, d("0.1"));
        assert_eq!(result.profit_percentage, d("5"));
    }

    #[test]
    fn test_long_credit_realized_variant() {
        let mut p = position(1);
        p.margin_sol_amount = 2 * SOL;
        p.realized_sol_amount = Some(250_000_000);
        let result = valuator(long_curve(), LongPnlVariant::CreditRealized)
            .value(&p)
            .unwrap();
        assert_eq!(result.gross_profit, d("3.1"));
        assert_eq!(result.net_profit, d("1.35"));
        assert_eq!(result.profit_percentage, d("67.5"));
        assert_eq!(result.realized, d("0.25"));
    }

    #[test]
    fn test_long_zero_current_margin() {
        let mut p = position(1);
        p.margin_sol_amount = 0;
        let err = valuator(long_curve(), LongPnlVariant::InitialMargin)
            .value(&p)
            .unwrap_err();
        assert_eq!(err, ValuationError::DivisionByZero("current margin"));
    }

    #[test]
    fn test_pair_quote_uses_second_element() {
        let curve = StaticCurveQuoter::new().with_sell_quote(
            1100,
            TOKENS,
            CurveQuote::Pair(999_999_999_999, 1_600_000_000),
        );
        let result = valuator(curve, LongPnlVariant::InitialMargin)
            .value(&position(1))
            .unwrap();
        assert_eq!(result.net_profit, d("1.1"));
    }

    fn short_curve() -> StaticCurveQuoter {
        StaticCurveQuoter::new()
            .with_buy_quote(1100, TOKENS, CurveQuote::Amount(1_200_000_000))
            .with_buy_quote(1000, TOKENS, CurveQuote::Pair(0, 2_500_000_000))
    }

    #[test]
    fn test_short_scenario() {
        let mut p = position(2);
        p.realized_sol_amount = Some(100_000_000);
        let result = valuator(short_curve(), LongPnlVariant::InitialMargin)
            .value(&p)
            .unwrap();
        assert_eq!(result.direction, Direction::Short);
        assert_eq!(result.gross_profit, d("1.3"));
        assert_eq!(result.net_profit, d("0.3"));
        // (0.1 + 0.3) / 1
        assert_eq!(result.profit_percentage, d("40"));
        assert_eq!(result.stop_loss_percentage, d("-10"));
    }

    #[test]
    fn test_short_net_only_variant() {
        let mut p = position(2);
        p.realized_sol_amount = Some(100_000_000);
        let config = EngineConfig {
            short_variant: ShortPnlVariant::NetOnly,
            ..EngineConfig::default()
        };
        let result = PositionValuator::new(config, Arc::new(short_curve()))
            .value(&p)
            .unwrap();
        assert_eq!(result.net_profit, d("0.3"));
        // realized is reported but not credited
        assert_eq!(result.profit_percentage, d("30"));
        assert_eq!(result.realized, d("0.1"));
    }

    #[test]
    fn test_short_zero_initial_margin() {
        let mut p = position(2);
        p.margin_init_sol_amount = 0;
        let err = valuator(short_curve(), LongPnlVariant::InitialMargin)
            .value(&p)
            .unwrap_err();
        assert_eq!(err, ValuationError::DivisionByZero("initial margin"));
        assert!(err.is_computation());
    }

    #[test]
    fn test_missing_quote_is_a_failure() {
        let err = valuator(StaticCurveQuoter::new(), LongPnlVariant::InitialMargin)
            .value(&position(2))
            .unwrap_err();
        assert!(matches!(err, ValuationError::Curve(_)));
    }

    #[test]
    fn test_unknown_order_type() {
        let err = valuator(long_curve(), LongPnlVariant::InitialMargin)
            .value(&position(9))
            .unwrap_err();
        assert_eq!(err, ValuationError::UnknownOrderType(9));
    }

    #[test]
    fn test_missing_mark_price() {
        let mut p = position(1);
        p.latest_price = None;
        let err = valuator(long_curve(), LongPnlVariant::InitialMargin)
            .value(&p)
            .unwrap_err();
        assert_eq!(err, ValuationError::MissingMarkPrice);
    }
}
