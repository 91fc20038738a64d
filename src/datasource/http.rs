//! REST client for the orderbook server.

use super::{
    ActiveOrders, ApiResponse, DataSource, DataSourceError, HistoryPage, MarkPrice, SpotPrice,
    TokenInfo,
};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;

/// Data source backed by the server's JSON GET endpoints.
#[derive(Debug, Clone)]
pub struct HttpDataSource {
    client: Client,
    base_url: String,
    /// Path template with a `{mint}` placeholder for a dedicated price query.
    price_query_path: Option<String>,
}

impl HttpDataSource {
    pub fn new(base_url: String) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            price_query_path: None,
        }
    }

    /// Read mark prices from `path_template` instead of the token info route.
    pub fn with_price_query(mut self, path_template: String) -> Self {
        self.price_query_path = Some(path_template);
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, DataSourceError> {
        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| DataSourceError::NetworkError(format!("{}: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DataSourceError::HttpError {
                status: status.as_u16(),
                message: format!("GET {}", url),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| DataSourceError::NetworkError(format!("{}: {}", url, e)))?;
        parse_body(url, &body)
    }
}

fn parse_body<T: DeserializeOwned>(url: &str, body: &str) -> Result<T, DataSourceError> {
    if body.trim().is_empty() {
        return Err(DataSourceError::ParseError(format!(
            "Empty response from {}",
            url
        )));
    }
    serde_json::from_str(body).map_err(|e| {
        DataSourceError::ParseError(format!("Failed to parse JSON from {}: {}", url, e))
    })
}

#[async_trait]
impl DataSource for HttpDataSource {
    async fn fetch_active_orders(
        &self,
        user: &str,
        mint: &str,
    ) -> Result<ApiResponse<ActiveOrders>, DataSourceError> {
        let url = self.url(&format!("/api/orderbook/user/{}/active?mint={}", user, mint));
        self.get_json(&url).await
    }

    async fn fetch_history(
        &self,
        user: &str,
        mint: &str,
    ) -> Result<ApiResponse<HistoryPage>, DataSourceError> {
        let url = self.url(&format!("/api/orderbook/user/{}/history?mint={}", user, mint));
        self.get_json(&url).await
    }

    async fn fetch_sol_price(&self) -> Result<ApiResponse<SpotPrice>, DataSourceError> {
        let url = self.url("/price/sol");
        self.get_json(&url).await
    }

    async fn fetch_token_info(
        &self,
        mint: &str,
    ) -> Result<ApiResponse<TokenInfo>, DataSourceError> {
        let url = self.url(&format!("/api/tokens/mint/{}", mint));
        self.get_json(&url).await
    }

    async fn fetch_mark_price(
        &self,
        mint: &str,
    ) -> Result<ApiResponse<MarkPrice>, DataSourceError> {
        match &self.price_query_path {
            Some(template) => {
                let url = self.url(&template.replace("{mint}", mint));
                self.get_json(&url).await
            }
            None => {
                let response = self.fetch_token_info(mint).await?;
                Ok(response.map(|info| MarkPrice {
                    price: info.latest_price,
                }))
            }
        }
    }
}
