//! Domain types for leveraged position valuation.
//!
//! This module provides:
//! - Lossless numeric handling via Decimal wrapper
//! - Domain primitives: Direction, OrderTypeMapping, CloseReason
//! - Wire records for open and closed orders
//! - Output metrics records

pub mod decimal;
pub mod metrics;
pub mod order;
pub mod primitives;

pub use decimal::Decimal;
pub use metrics::{HistoryMetrics, PositionMetrics};
pub use order::{CloseInfo, ClosedOrderRecord, Order, Position};
pub use primitives::{CloseReason, Direction, OrderTypeMapping};
