//! Pure valuation engine for leveraged curve positions.
//!
//! Nothing here performs I/O. Curve quotes come in through [`crate::curve::CurveQuoter`],
//! everything else is a function of the position record, the mark price, the spot
//! rate and the clock value handed in by the caller.

use crate::config::{LongPnlVariant, ShortPnlVariant};
use crate::curve::CurveError;
use crate::domain::{Decimal, OrderTypeMapping};
use thiserror::Error;

pub mod batch;
pub mod display;
pub mod duration;
pub mod history;
pub mod leverage;
pub mod position;
pub mod units;

pub use batch::{value_closed_records, value_open_positions, BatchReport, SkippedPosition};
pub use display::DisplayAggregator;
pub use duration::{format_duration, format_elapsed};
pub use history::{ClosedValuation, HistoryValuator};
pub use leverage::{leverage, leverage_or_zero, round_leverage};
pub use position::{OpenValuation, PositionValuator};
pub use units::{
    ScaleTooLarge, UnitConverter, DEFAULT_LAMPORT_DECIMALS, DEFAULT_PRICE_DECIMALS, MAX_DECIMALS,
};

/// Settings shared by every valuator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EngineConfig {
    pub units: UnitConverter,
    pub order_types: OrderTypeMapping,
    pub long_variant: LongPnlVariant,
    pub short_variant: ShortPnlVariant,
}

/// Why a single position could not be valued. Never aborts a batch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValuationError {
    #[error("division by zero: {0} is zero")]
    DivisionByZero(&'static str),
    #[error("arithmetic overflow computing {0}")]
    Overflow(&'static str),
    #[error("position has no mark price")]
    MissingMarkPrice,
    #[error("curve quote failed: {0}")]
    Curve(#[from] CurveError),
    #[error("unknown order type {0}")]
    UnknownOrderType(u8),
}

impl ValuationError {
    /// Arithmetic or quote-shape failures, as opposed to unrecognised directions.
    pub fn is_computation(&self) -> bool {
        !matches!(self, ValuationError::UnknownOrderType(_))
    }
}

pub(crate) fn add(a: Decimal, b: Decimal, what: &'static str) -> Result<Decimal, ValuationError> {
    a.checked_add(b).ok_or(ValuationError::Overflow(what))
}

pub(crate) fn sub(a: Decimal, b: Decimal, what: &'static str) -> Result<Decimal, ValuationError> {
    a.checked_sub(b).ok_or(ValuationError::Overflow(what))
}

pub(crate) fn div(
    a: Decimal,
    b: Decimal,
    divisor: &'static str,
) -> Result<Decimal, ValuationError> {
    if b.is_zero() {
        return Err(ValuationError::DivisionByZero(divisor));
    }
    a.checked_div(b).ok_or(ValuationError::Overflow(divisor))
}

/// `part / whole * 100`.
pub(crate) fn percent(
    part: Decimal,
    whole: Decimal,
    divisor: &'static str,
) -> Result<Decimal, ValuationError> {
    div(part, whole, divisor)?
        .checked_mul(Decimal::hundred())
        .ok_or(ValuationError::Overflow("percentage"))
}
