//! Effective leverage from the entry-to-stop-loss distance.

use super::{div, sub, UnitConverter, ValuationError};
use crate::domain::{Decimal, Direction, OrderTypeMapping};

/// `1 / (|entry - stop| / entry)`, rounded for display.
///
/// Both directions reduce to the same absolute distance; the direction code is still
/// resolved so unknown codes are rejected before any arithmetic.
pub fn leverage(
    units: &UnitConverter,
    mapping: OrderTypeMapping,
    order_type: u8,
    open_price: u128,
    stop_price: u128,
) -> Result<Decimal, ValuationError> {
    let direction = mapping
        .direction(order_type)
        .ok_or(ValuationError::UnknownOrderType(order_type))?;

    let entry = units.to_display_price(open_price)?;
    let stop = units.to_display_price(stop_price)?;

    let distance = match direction {
        Direction::Long => sub(entry, stop, "stop-loss distance")?,
        Direction::Short => sub(stop, entry, "stop-loss distance")?,
    };
    let stop_loss_ratio = div(distance, entry, "entry price")?.abs();
    let raw = div(Decimal::one(), stop_loss_ratio, "stop-loss distance")?;

    Ok(round_leverage(raw))
}

/// Like [`leverage`], but any failure (unknown direction, zero entry price, stop
/// equal to entry) degrades to 0 so the rest of the record is still reported.
pub fn leverage_or_zero(
    units: &UnitConverter,
    mapping: OrderTypeMapping,
    order_type: u8,
    open_price: u128,
    stop_price: u128,
) -> Decimal {
    match leverage(units, mapping, order_type, open_price, stop_price) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(
                "Leverage undefined for order type {} (entry {}, stop {}): {}, reporting 0",
                order_type,
                open_price,
                stop_price,
                e
            );
            Decimal::zero()
        }
    }
}

/// One decimal place below 1x, whole numbers otherwise.
pub fn round_leverage(raw: Decimal) -> Decimal {
    if raw < Decimal::one() {
        raw.round_half_up(1)
    } else {
        raw.round_half_up(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        Decimal::from_str_canonical(s).unwrap()
    }

    fn lev(order_type: u8, open: u128, stop: u128) -> Result<Decimal, ValuationError> {
        leverage(
            &UnitConverter::default(),
            OrderTypeMapping::LongIsOne,
            order_type,
            open,
            stop,
        )
    }

    #[test]
    fn test_round_leverage() {
        assert_eq!(round_leverage(d("0.37")), d("0.4"));
        assert_eq!(round_leverage(d("24.6")), d("25"));
        assert_eq!(round_leverage(d("24.4")), d("24"));
        assert_eq!(round_leverage(d("0.95")), d("1"));
        assert_eq!(round_leverage(d("1")), d("1"));
    }

    #[test]
    fn test_long_leverage() {
        // 10% below entry -> 10x
        assert_eq!(lev(1, 1000, 900).unwrap(), d("10"));
        // 406/10000 -> 24.63x
        assert_eq!(lev(1, 10_000, 9_594).unwrap(), d("25"));
    }

    #[test]
    fn test_short_leverage_below_one() {
        // stop 270% above entry -> 0.370x
        assert_eq!(lev(2, 100, 370).unwrap(), d("0.4"));
    }

    #[test]
    fn test_sign_of_distance_is_irrelevant() {
        assert_eq!(lev(1, 1000, 1100).unwrap(), lev(2, 1000, 1100).unwrap());
    }

    #[test]
    fn test_zero_entry_price() {
        assert_eq!(
            lev(1, 0, 900),
            Err(ValuationError::DivisionByZero("entry price"))
        );
    }

    #[test]
    fn test_stop_equal_to_entry() {
        assert_eq!(
            lev(1, 1000, 1000),
            Err(ValuationError::DivisionByZero("stop-loss distance"))
        );
    }

    #[test]
    fn test_unknown_direction() {
        assert_eq!(lev(3, 1000, 900), Err(ValuationError::UnknownOrderType(3)));
        let degraded = leverage_or_zero(
            &UnitConverter::default(),
            OrderTypeMapping::LongIsOne,
            3,
            0,
            900,
        );
        assert_eq!(degraded, Decimal::zero());
    }

    #[test]
    fn test_undefined_leverage_degrades_to_zero() {
        let units = UnitConverter::default();
        assert_eq!(
            leverage_or_zero(&units, OrderTypeMapping::LongIsOne, 1, 0, 900),
            Decimal::zero()
        );
        assert_eq!(
            leverage_or_zero(&units, OrderTypeMapping::LongIsOne, 2, 1000, 1000),
            Decimal::zero()
        );
        assert_eq!(
            leverage_or_zero(&units, OrderTypeMapping::LongIsOne, 1, 1000, 900),
            d("10")
        );
    }

    #[test]
    fn test_realistic_fixed_point_prices() {
        let l = lev(1, 4_970_352_901_831_056, 4_473_317_611_647_950).unwrap();
        assert_eq!(l, d("10"));
    }
}
