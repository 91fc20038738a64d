//! Conversion between raw on-chain integers and decimal SOL / price values.

use super::ValuationError;
use crate::domain::Decimal;
use thiserror::Error;

/// Fractional exponent of SOL (lamports per SOL = 10^9).
pub const DEFAULT_LAMPORT_DECIMALS: u32 = 9;
/// Fixed-point exponent of curve prices.
pub const DEFAULT_PRICE_DECIMALS: u32 = 23;
/// Largest scale a rust_decimal can carry.
pub const MAX_DECIMALS: u32 = 28;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("scale exponent {0} exceeds 28")]
pub struct ScaleTooLarge(pub u32);

/// Owns the two scale exponents. Conversions are exact: a raw integer becomes the
/// decimal mantissa and the exponent becomes its scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitConverter {
    lamport_decimals: u32,
    price_decimals: u32,
}

impl UnitConverter {
    pub fn new(lamport_decimals: u32, price_decimals: u32) -> Result<Self, ScaleTooLarge> {
        for decimals in [lamport_decimals, price_decimals] {
            if decimals > MAX_DECIMALS {
                return Err(ScaleTooLarge(decimals));
            }
        }
        Ok(Self {
            lamport_decimals,
            price_decimals,
        })
    }

    pub fn lamport_decimals(&self) -> u32 {
        self.lamport_decimals
    }

    pub fn price_decimals(&self) -> u32 {
        self.price_decimals
    }

    /// `lamports / 10^lamport_decimals`.
    pub fn to_settlement_units(&self, lamports: i128) -> Result<Decimal, ValuationError> {
        Decimal::from_scaled(lamports, self.lamport_decimals)
            .map_err(|_| ValuationError::Overflow("lamport amount"))
    }

    /// Unsigned variant for curve quotes and other u128 amounts.
    pub fn to_settlement_units_u128(&self, lamports: u128) -> Result<Decimal, ValuationError> {
        let lamports =
            i128::try_from(lamports).map_err(|_| ValuationError::Overflow("lamport amount"))?;
        self.to_settlement_units(lamports)
    }

    /// Inverse of [`Self::to_settlement_units`], truncating sub-lamport dust.
    pub fn to_lamports(&self, sol: Decimal) -> Result<i128, ValuationError> {
        let per_unit = Decimal::from_scaled(10i128.pow(self.lamport_decimals), 0)
            .map_err(|_| ValuationError::Overflow("lamports per unit"))?;
        sol.checked_mul(per_unit)
            .and_then(|lamports| lamports.to_i128())
            .ok_or(ValuationError::Overflow("lamport amount"))
    }

    /// `raw / 10^price_decimals`.
    pub fn to_display_price(&self, raw: u128) -> Result<Decimal, ValuationError> {
        let raw = i128::try_from(raw).map_err(|_| ValuationError::Overflow("price"))?;
        Decimal::from_scaled(raw, self.price_decimals).map_err(|_| ValuationError::Overflow("price"))
    }
}

impl Default for UnitConverter {
    fn default() -> Self {
        Self {
            lamport_decimals: DEFAULT_LAMPORT_DECIMALS,
            price_decimals: DEFAULT_PRICE_DECIMALS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        Decimal::from_str_canonical(s).unwrap()
    }

    #[test]
    fn test_lamports_to_sol() {
        let units = UnitConverter::default();
        assert_eq!(units.to_settlement_units(1_000_000_000).unwrap(), d("1"));
        assert_eq!(units.to_settlement_units(1).unwrap(), d("0.000000001"));
        assert_eq!(units.to_settlement_units(-250_000_000).unwrap(), d("-0.25"));
    }

    #[test]
    fn test_lamport_roundtrip() {
        let units = UnitConverter::default();
        for lamports in [0i128, 1, 999, 1_000_000_000, 18_446_744_073_709_551_615, -42] {
            let sol = units.to_settlement_units(lamports).unwrap();
            assert_eq!(units.to_lamports(sol).unwrap(), lamports);
        }
    }

    #[test]
    fn test_to_lamports_truncates_dust() {
        let units = UnitConverter::default();
        assert_eq!(units.to_lamports(d("1.0000000019")).unwrap(), 1_000_000_001);
    }

    #[test]
    fn test_display_price() {
        let units = UnitConverter::default();
        assert_eq!(
            units.to_display_price(100_000_000_000_000_000_000_000).unwrap(),
            d("1")
        );
        assert_eq!(units.to_display_price(1000).unwrap(), d("0.00000000000000000001"));
    }

    #[test]
    fn test_price_beyond_96_bits_overflows() {
        let units = UnitConverter::default();
        assert_eq!(
            units.to_display_price(u128::MAX),
            Err(ValuationError::Overflow("price"))
        );
    }

    #[test]
    fn test_rejects_scale_above_28() {
        assert_eq!(UnitConverter::new(9, 29), Err(ScaleTooLarge(29)));
        assert!(UnitConverter::new(28, 28).is_ok());
    }
}
