//! Fetch gating and batch valuation for one user and market.

use crate::curve::CurveQuoter;
use crate::datasource::{ApiResponse, DataSource};
use crate::domain::{Decimal, HistoryMetrics, PositionMetrics};
use crate::engine::{
    value_closed_records, value_open_positions, BatchReport, DisplayAggregator, EngineConfig,
    HistoryValuator, PositionValuator,
};
use crate::error::ReportError;
use futures::future::{try_join, try_join3};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

/// Valuation of every open position of a user in one market.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveReport {
    pub user: String,
    pub mint: String,
    /// SOL price in USDT used for every USDT figure.
    pub sol_price: Decimal,
    /// Raw fixed-point mark price, as a string to keep full precision.
    pub mark_price: String,
    pub display_mark_price: Option<Decimal>,
    #[serde(flatten)]
    pub positions: BatchReport<PositionMetrics>,
}

/// Valuation of a user's closed orders in one market.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryReport {
    pub user: String,
    pub mint: String,
    pub sol_price: Decimal,
    /// Server-side record count, which may exceed the records returned.
    pub total: u64,
    #[serde(flatten)]
    pub orders: BatchReport<HistoryMetrics>,
}

#[derive(Debug, Clone)]
pub struct Reporter {
    datasource: Arc<dyn DataSource>,
    config: EngineConfig,
    success_code: i64,
    curve: Option<Arc<dyn CurveQuoter>>,
}

impl Reporter {
    pub fn new(datasource: Arc<dyn DataSource>, config: EngineConfig, success_code: i64) -> Self {
        Self {
            datasource,
            config,
            success_code,
            curve: None,
        }
    }

    pub fn with_curve(mut self, curve: Arc<dyn CurveQuoter>) -> Self {
        self.curve = Some(curve);
        self
    }

    /// Fetch positions, spot rate and mark price concurrently, then value each
    /// position on its own. Any failed read aborts the report before valuation.
    pub async fn active_report(
        &self,
        user: &str,
        mint: &str,
        now: i64,
    ) -> Result<ActiveReport, ReportError> {
        let curve = self.curve.clone().ok_or(ReportError::MissingCurve)?;

        let (orders, spot, mark) = try_join3(
            self.datasource.fetch_active_orders(user, mint),
            self.datasource.fetch_sol_price(),
            self.datasource.fetch_mark_price(mint),
        )
        .await?;

        let orders = self.payload("active orders", orders)?.orders;
        let sol_price = self.payload("sol price", spot)?.price;
        let mark_price = self.payload("mark price", mark)?.price;
        debug!(
            "Fetched {} active orders, SOL price {}, mark price {}",
            orders.len(),
            sol_price,
            mark_price
        );

        let valuator = PositionValuator::new(self.config, curve);
        let aggregator = DisplayAggregator::new(self.config, sol_price);
        let positions = value_open_positions(&valuator, &aggregator, &orders, mark_price, now);

        info!(
            "Active report for {} on {}: {} valued, {} skipped",
            user,
            mint,
            positions.metrics.len(),
            positions.skipped.len()
        );

        Ok(ActiveReport {
            user: user.to_string(),
            mint: mint.to_string(),
            sol_price,
            mark_price: mark_price.to_string(),
            display_mark_price: self.config.units.to_display_price(mark_price).ok(),
            positions,
        })
    }

    /// Fetch closed orders and the spot rate concurrently, then value each record.
    pub async fn history_report(&self, user: &str, mint: &str) -> Result<HistoryReport, ReportError> {
        let (history, spot) = try_join(
            self.datasource.fetch_history(user, mint),
            self.datasource.fetch_sol_price(),
        )
        .await?;

        let page = self.payload("order history", history)?;
        let sol_price = self.payload("sol price", spot)?.price;
        debug!(
            "Fetched {} of {} closed orders, SOL price {}",
            page.records.len(),
            page.total,
            sol_price
        );

        let valuator = HistoryValuator::new(self.config);
        let aggregator = DisplayAggregator::new(self.config, sol_price);
        let orders = value_closed_records(&valuator, &aggregator, &page.records);

        info!(
            "History report for {} on {}: {} valued, {} skipped, {} total on server",
            user,
            mint,
            orders.metrics.len(),
            orders.skipped.len(),
            page.total
        );

        Ok(HistoryReport {
            user: user.to_string(),
            mint: mint.to_string(),
            sol_price,
            total: page.total,
            orders,
        })
    }

    fn payload<T>(&self, endpoint: &'static str, response: ApiResponse<T>) -> Result<T, ReportError> {
        if response.code != self.success_code {
            return Err(ReportError::ApiStatus {
                endpoint,
                code: response.code,
                message: response.msg.unwrap_or_default(),
            });
        }
        response
            .data
            .ok_or(ReportError::MissingPayload { endpoint })
    }
}
