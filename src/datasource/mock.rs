//! Mock data source for testing without network calls.

use super::{
    ActiveOrders, ApiResponse, DataSource, DataSourceError, HistoryPage, MarkPrice, SpotPrice,
    TokenInfo,
};
use crate::domain::{ClosedOrderRecord, Decimal, Position};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Which read a canned status or failure applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    ActiveOrders,
    History,
    SolPrice,
    TokenInfo,
    MarkPrice,
}

/// Mock data source that returns predefined test data.
#[derive(Debug, Clone)]
pub struct MockDataSource {
    orders: Vec<Position>,
    records: Vec<ClosedOrderRecord>,
    history_total: Option<u64>,
    sol_price: Decimal,
    latest_price: u128,
    codes: HashMap<Endpoint, i64>,
    failures: HashMap<Endpoint, DataSourceError>,
    calls: Arc<AtomicUsize>,
}

impl MockDataSource {
    /// Create a new mock data source with empty data and status 200 everywhere.
    pub fn new() -> Self {
        Self {
            orders: Vec::new(),
            records: Vec::new(),
            history_total: None,
            sol_price: Decimal::zero(),
            latest_price: 0,
            codes: HashMap::new(),
            failures: HashMap::new(),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_order(mut self, order: Position) -> Self {
        self.orders.push(order);
        self
    }

    pub fn with_orders(mut self, orders: Vec<Position>) -> Self {
        self.orders.extend(orders);
        self
    }

    pub fn with_record(mut self, record: ClosedOrderRecord) -> Self {
        self.records.push(record);
        self
    }

    /// Override the reported history total (defaults to the record count).
    pub fn with_history_total(mut self, total: u64) -> Self {
        self.history_total = Some(total);
        self
    }

    pub fn with_sol_price(mut self, price: Decimal) -> Self {
        self.sol_price = price;
        self
    }

    /// Mark price served by both the token info and price query reads.
    pub fn with_latest_price(mut self, price: u128) -> Self {
        self.latest_price = price;
        self
    }

    /// Answer `endpoint` with the given status code and no payload.
    pub fn with_status(mut self, endpoint: Endpoint, code: i64) -> Self {
        self.codes.insert(endpoint, code);
        self
    }

    /// Fail `endpoint` at the transport level.
    pub fn with_failure(mut self, endpoint: Endpoint, error: DataSourceError) -> Self {
        self.failures.insert(endpoint, error);
        self
    }

    /// Number of reads issued so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn respond<T>(&self, endpoint: Endpoint, data: T) -> Result<ApiResponse<T>, DataSourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = self.failures.get(&endpoint) {
            return Err(error.clone());
        }
        match self.codes.get(&endpoint) {
            Some(&code) => Ok(ApiResponse::status(code, "mock status")),
            None => Ok(ApiResponse::ok(200, data)),
        }
    }
}

impl Default for MockDataSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DataSource for MockDataSource {
    async fn fetch_active_orders(
        &self,
        _user: &str,
        _mint: &str,
    ) -> Result<ApiResponse<ActiveOrders>, DataSourceError> {
        self.respond(
            Endpoint::ActiveOrders,
            ActiveOrders {
                orders: self.orders.clone(),
            },
        )
    }

    async fn fetch_history(
        &self,
        _user: &str,
        _mint: &str,
    ) -> Result<ApiResponse<HistoryPage>, DataSourceError> {
        self.respond(
            Endpoint::History,
            HistoryPage {
                records: self.records.clone(),
                total: self.history_total.unwrap_or(self.records.len() as u64),
            },
        )
    }

    async fn fetch_sol_price(&self) -> Result<ApiResponse<SpotPrice>, DataSourceError> {
        self.respond(
            Endpoint::SolPrice,
            SpotPrice {
                price: self.sol_price,
            },
        )
    }

    async fn fetch_token_info(
        &self,
        _mint: &str,
    ) -> Result<ApiResponse<TokenInfo>, DataSourceError> {
        self.respond(
            Endpoint::TokenInfo,
            TokenInfo {
                latest_price: self.latest_price,
            },
        )
    }

    async fn fetch_mark_price(
        &self,
        _mint: &str,
    ) -> Result<ApiResponse<MarkPrice>, DataSourceError> {
        self.respond(
            Endpoint::MarkPrice,
            MarkPrice {
                price: self.latest_price,
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_defaults_to_success() {
        let mock = MockDataSource::new().with_latest_price(1100);
        let response = mock.fetch_token_info("mint").await.unwrap();
        assert_eq!(response.code, 200);
        assert_eq!(response.data.unwrap().latest_price, 1100);
        assert_eq!(mock.calls(), 1);
    }

    #[tokio::test]
    async fn test_mock_status_override() {
        let mock = MockDataSource::new().with_status(Endpoint::SolPrice, 500);
        let response = mock.fetch_sol_price().await.unwrap();
        assert_eq!(response.code, 500);
        assert!(response.data.is_none());
    }

    #[tokio::test]
    async fn test_mock_failure() {
        let mock = MockDataSource::new().with_failure(
            Endpoint::History,
            DataSourceError::NetworkError("down".to_string()),
        );
        assert!(mock.fetch_history("u", "m").await.is_err());
    }
}
