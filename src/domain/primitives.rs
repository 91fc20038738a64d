//! Domain primitives: Direction, OrderTypeMapping, CloseReason.

use serde::{Deserialize, Serialize};

/// Position direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Long,
    Short,
}

impl Direction {
    pub fn label(&self) -> &'static str {
        match self {
            Direction::Long => "LONG",
            Direction::Short => "SHORT",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// How raw `order_type` codes map onto directions.
///
/// The active-order and history feeds have disagreed on this in the past, so the
/// mapping is chosen once in configuration and passed to every valuator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderTypeMapping {
    /// `1 = LONG`, `2 = SHORT`.
    #[default]
    LongIsOne,
    /// `1 = SHORT`, `2 = LONG`.
    ShortIsOne,
}

impl OrderTypeMapping {
    /// Resolve a raw code, or None if it is neither 1 nor 2.
    pub fn direction(&self, order_type: u8) -> Option<Direction> {
        match (self, order_type) {
            (OrderTypeMapping::LongIsOne, 1) | (OrderTypeMapping::ShortIsOne, 2) => {
                Some(Direction::Long)
            }
            (OrderTypeMapping::LongIsOne, 2) | (OrderTypeMapping::ShortIsOne, 1) => {
                Some(Direction::Short)
            }
            _ => None,
        }
    }
}

/// Why a position was closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CloseReason {
    UserClose,
    Liquidation,
    Expired,
    UserHalfClose,
    ExpiredHalfClose,
    /// Code outside 1..=5, preserved as received.
    Other(u8),
}

impl CloseReason {
    pub fn code(&self) -> u8 {
        match self {
            CloseReason::UserClose => 1,
            CloseReason::Liquidation => 2,
            CloseReason::Expired => 3,
            CloseReason::UserHalfClose => 4,
            CloseReason::ExpiredHalfClose => 5,
            CloseReason::Other(code) => *code,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CloseReason::UserClose => "user close",
            CloseReason::Liquidation => "forced liquidation",
            CloseReason::Expired => "expired close",
            CloseReason::UserHalfClose => "user half close",
            CloseReason::ExpiredHalfClose => "expired half close",
            CloseReason::Other(_) => "unknown",
        }
    }

    /// Liquidated positions report zero realized P&L whatever the record says.
    pub fn zeroes_realized(&self) -> bool {
        matches!(self, CloseReason::Liquidation)
    }
}

impl From<u8> for CloseReason {
    fn from(code: u8) -> Self {
        match code {
            1 => CloseReason::UserClose,
            2 => CloseReason::Liquidation,
            3 => CloseReason::Expired,
            4 => CloseReason::UserHalfClose,
            5 => CloseReason::ExpiredHalfClose,
            other => CloseReason::Other(other),
        }
    }
}

impl Serialize for CloseReason {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

impl<'de> Deserialize<'de> for CloseReason {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        u8::deserialize(deserializer).map(CloseReason::from)
    }
}
