//! Data source abstraction for the orderbook, spot price and token info reads.

use crate::domain::decimal::deserialize_flexible;
use crate::domain::order::de_u128;
use crate::domain::{ClosedOrderRecord, Decimal, Position};
use async_trait::async_trait;
use serde::Deserialize;
use std::fmt;

pub mod http;
pub mod mock;

pub use http::HttpDataSource;
pub use mock::MockDataSource;

/// Read-only view of the trading backend.
///
/// Every read is idempotent. Implementations must not retry; that policy belongs
/// to the caller.
#[async_trait]
pub trait DataSource: Send + Sync + fmt::Debug {
    /// Open positions of `user` in market `mint`.
    async fn fetch_active_orders(
        &self,
        user: &str,
        mint: &str,
    ) -> Result<ApiResponse<ActiveOrders>, DataSourceError>;

    /// Closed positions of `user` in market `mint`.
    async fn fetch_history(
        &self,
        user: &str,
        mint: &str,
    ) -> Result<ApiResponse<HistoryPage>, DataSourceError>;

    /// Current SOL price in USDT.
    async fn fetch_sol_price(&self) -> Result<ApiResponse<SpotPrice>, DataSourceError>;

    /// Token info for `mint`, carrying the fixed-point mark price.
    async fn fetch_token_info(&self, mint: &str)
        -> Result<ApiResponse<TokenInfo>, DataSourceError>;

    /// Current fixed-point mark price for `mint`.
    ///
    /// Defaults to the `latest_price` field of the token info read.
    async fn fetch_mark_price(
        &self,
        mint: &str,
    ) -> Result<ApiResponse<MarkPrice>, DataSourceError> {
        let response = self.fetch_token_info(mint).await?;
        Ok(response.map(|info| MarkPrice {
            price: info.latest_price,
        }))
    }
}

/// Response envelope: a status code plus an optional payload.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ApiResponse<T> {
    pub code: i64,
    #[serde(default)]
    pub msg: Option<String>,
    #[serde(default)]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn ok(code: i64, data: T) -> Self {
        Self {
            code,
            msg: None,
            data: Some(data),
        }
    }

    pub fn status(code: i64, msg: &str) -> Self {
        Self {
            code,
            msg: Some(msg.to_string()),
            data: None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ApiResponse<U> {
        ApiResponse {
            code: self.code,
            msg: self.msg,
            data: self.data.map(f),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct ActiveOrders {
    #[serde(default)]
    pub orders: Vec<Position>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct HistoryPage {
    #[serde(default)]
    pub records: Vec<ClosedOrderRecord>,
    #[serde(default)]
    pub total: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct SpotPrice {
    #[serde(deserialize_with = "deserialize_flexible")]
    pub price: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct TokenInfo {
    #[serde(deserialize_with = "de_u128")]
    pub latest_price: u128,
}

/// Answer of a dedicated price query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct MarkPrice {
    #[serde(alias = "latest_price", deserialize_with = "de_u128")]
    pub price: u128,
}

/// Error type for data source operations.
#[derive(Debug, Clone)]
pub enum DataSourceError {
    /// Network error (e.g., connection refused, DNS failure)
    NetworkError(String),
    /// HTTP error (non-2xx transport status)
    HttpError { status: u16, message: String },
    /// Parsing error (empty body, invalid JSON or malformed payload)
    ParseError(String),
}

impl fmt::Display for DataSourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSourceError::NetworkError(msg) => write!(f, "Network error: {}", msg),
            DataSourceError::HttpError { status, message } => {
                write!(f, "HTTP error {}: {}", status, message)
            }
            DataSourceError::ParseError(msg) => write!(f, "Parse error: {}", msg),
        }
    }
}

impl std::error::Error for DataSourceError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_datasource_error_display() {
        let err = DataSourceError::NetworkError("connection refused".to_string());
        assert_eq!(err.to_string(), "Network error: connection refused");

        let err = DataSourceError::HttpError {
            status: 502,
            message: "Bad gateway".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP error 502: Bad gateway");

        let err = DataSourceError::ParseError("invalid JSON".to_string());
        assert_eq!(err.to_string(), "Parse error: invalid JSON");
    }

    #[test]
    fn test_envelope_parsing() {
        let body = r#"{"code": 200, "data": {"price": "142.37"}}"#;
        let response: ApiResponse<SpotPrice> = serde_json::from_str(body).unwrap();
        assert_eq!(response.code, 200);
        assert_eq!(
            response.data.unwrap().price,
            Decimal::from_str_canonical("142.37").unwrap()
        );

        let body = r#"{"code": 500, "msg": "internal"}"#;
        let response: ApiResponse<TokenInfo> = serde_json::from_str(body).unwrap();
        assert_eq!(response.code, 500);
        assert_eq!(response.data, None);
    }

    #[test]
    fn test_mark_price_accepts_either_field_name() {
        let body = r#"{"code": 200, "data": {"price": "6752175264329370"}}"#;
        let response: ApiResponse<MarkPrice> = serde_json::from_str(body).unwrap();
        assert_eq!(response.data.unwrap().price, 6_752_175_264_329_370);

        let body = r#"{"code": 200, "data": {"latest_price": 1100}}"#;
        let response: ApiResponse<MarkPrice> = serde_json::from_str(body).unwrap();
        assert_eq!(response.data.unwrap().price, 1100);
    }

    #[test]
    fn test_map_keeps_status() {
        let response = ApiResponse::<TokenInfo>::status(500, "down").map(|info| info.latest_price);
        assert_eq!(response.code, 500);
        assert_eq!(response.msg.as_deref(), Some("down"));
        assert_eq!(response.data, None);
    }

    #[test]
    fn test_history_page_defaults() {
        let body = r#"{"code": 200, "data": {}}"#;
        let response: ApiResponse<HistoryPage> = serde_json::from_str(body).unwrap();
        let page = response.data.unwrap();
        assert!(page.records.is_empty());
        assert_eq!(page.total, 0);
    }
}
