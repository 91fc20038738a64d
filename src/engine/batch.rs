//! Per-position failure isolation across a batch.

use super::{DisplayAggregator, HistoryValuator, PositionValuator, ValuationError};
use crate::domain::{ClosedOrderRecord, HistoryMetrics, Position, PositionMetrics};
use serde::Serialize;
use tracing::{info, warn};

/// A position that produced no metrics, and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedPosition {
    pub order_id: String,
    pub reason: String,
    #[serde(skip)]
    pub error: ValuationError,
}

/// Successful metrics in input order, plus the positions that were skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchReport<T> {
    pub metrics: Vec<T>,
    pub skipped: Vec<SkippedPosition>,
}

impl<T> BatchReport<T> {
    pub fn new() -> Self {
        Self {
            metrics: Vec::new(),
            skipped: Vec::new(),
        }
    }

    fn record(&mut self, order_id: &str, result: Result<T, ValuationError>) {
        match result {
            Ok(metrics) => self.metrics.push(metrics),
            Err(error) => {
                warn!("Skipping order {}: {}", order_id, error);
                self.skipped.push(SkippedPosition {
                    order_id: order_id.to_string(),
                    reason: error.to_string(),
                    error,
                });
            }
        }
    }

    pub fn total(&self) -> usize {
        self.metrics.len() + self.skipped.len()
    }
}

impl<T> Default for BatchReport<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Value every open position at `mark_price`. Source records are not modified.
pub fn value_open_positions(
    valuator: &PositionValuator,
    aggregator: &DisplayAggregator,
    positions: &[Position],
    mark_price: u128,
    now: i64,
) -> BatchReport<PositionMetrics> {
    let mut report = BatchReport::new();
    for position in positions {
        let marked = position.with_latest_price(mark_price);
        let result = valuator
            .value(&marked)
            .map(|valuation| aggregator.open_metrics(&marked, &valuation, now));
        report.record(&position.order_id, result);
    }
    info!(
        "Valued {} of {} open positions",
        report.metrics.len(),
        report.total()
    );
    report
}

/// Value every closed record.
pub fn value_closed_records(
    valuator: &HistoryValuator,
    aggregator: &DisplayAggregator,
    records: &[ClosedOrderRecord],
) -> BatchReport<HistoryMetrics> {
    let mut report = BatchReport::new();
    for record in records {
        let result = valuator
            .value(record)
            .map(|valuation| aggregator.history_metrics(record, &valuation));
        report.record(&record.order.order_id, result);
    }
    info!(
        "Valued {} of {} closed orders",
        report.metrics.len(),
        report.total()
    );
    report
}
