//! `reqwest` implementation of [`OrdersService`].

use std::sync::Arc;

use async_trait::async_trait;
use futures::StreamExt;
use order_desk_core::{DateRange, OrderId, OrderStatus};
use reqwest::header::{
    ACCEPT, AUTHORIZATION, CONTENT_DISPOSITION, CONTENT_TYPE, HeaderMap, HeaderValue,
};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use tracing::instrument;
use url::Url;

use super::{
    DEFAULT_EXPORT_FILE_NAME, ExportFile, ExportQuery, OrderPage, OrderQuery, OrdersService,
    RequestError, StatsSnapshot, StatusUpdate, date_range_params, file_name_from_disposition,
};
use crate::config::OrdersApiConfig;

/// Orders API client.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Clone)]
pub struct OrdersApiClient {
    inner: Arc<OrdersApiClientInner>,
}

struct OrdersApiClientInner {
    client: reqwest::Client,
    base_url: Url,
}

impl OrdersApiClient {
    /// Create a new Orders API client.
    ///
    /// # Errors
    ///
    /// Returns error if the token is not a valid header value or the HTTP
    /// client fails to build.
    pub fn new(config: &OrdersApiConfig) -> Result<Self, RequestError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        if let Some(token) = &config.token {
            let bearer = format!("Bearer {}", token.expose_secret());
            let mut auth_value = HeaderValue::from_str(&bearer)
                .map_err(|e| RequestError::InvalidToken(e.to_string()))?;
            auth_value.set_sensitive(true);
            headers.insert(AUTHORIZATION, auth_value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(OrdersApiClientInner {
                client,
                base_url: config.base_url.clone(),
            }),
        })
    }

    /// Base URL requests are resolved against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    fn url(&self, path: &str) -> Result<Url, RequestError> {
        self.inner
            .base_url
            .join(path)
            .map_err(|e| RequestError::InvalidUrl(format!("{path}: {e}")))
    }

    /// Execute a GET request and parse the JSON body.
    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&'static str, String)],
    ) -> Result<T, RequestError> {
        let response = self
            .inner
            .client
            .get(self.url(path)?)
            .query(params)
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// Handle API response and parse JSON.
    ///
    /// The body is read in full before decoding so that a shape mismatch is
    /// reported as [`RequestError::Parse`] rather than a transport error.
    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, RequestError> {
        if !response.status().is_success() {
            return Err(self.parse_error(response).await);
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body)
            .map_err(|e| RequestError::Parse(format!("Failed to parse response: {e}")))
    }

    /// Map a non-success response to a [`RequestError`].
    async fn parse_error(&self, response: reqwest::Response) -> RequestError {
        let status = response.status().as_u16();

        if status == 429 {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);
            return RequestError::RateLimited(retry_after);
        }

        if status == 401 || status == 403 {
            return RequestError::Unauthorized;
        }

        if status == 404 {
            return RequestError::NotFound(response.url().path().to_string());
        }

        let message = response
            .text()
            .await
            .ok()
            .filter(|body| !body.trim().is_empty())
            .unwrap_or_else(|| "Unknown error".to_string());

        RequestError::Api { status, message }
    }
}

#[async_trait]
impl OrdersService for OrdersApiClient {
    #[instrument(skip(self, query), fields(page = query.page, status = ?query.status))]
    async fn list_orders(&self, query: &OrderQuery) -> Result<OrderPage, RequestError> {
        let page: OrderPage = self.get("orders", &query.to_params()).await?;
        tracing::debug!(count = page.orders.len(), total = page.total, "Fetched orders");
        Ok(page)
    }

    #[instrument(skip(self))]
    async fn get_stats(
        &self,
        date_range: Option<DateRange>,
    ) -> Result<StatsSnapshot, RequestError> {
        self.get("orders/stats", &date_range_params(date_range))
            .await
    }

    #[instrument(skip(self))]
    async fn set_order_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<(), RequestError> {
        let url = self.url(&format!("orders/{id}/status"))?;
        let response = self
            .inner
            .client
            .patch(url)
            .json(&StatusUpdate { status })
            .send()
            .await?;

        if response.status().is_success() {
            tracing::info!(order_id = %id, %status, "Order status updated");
            return Ok(());
        }

        Err(self.parse_error(response).await)
    }

    #[instrument(skip(self))]
    async fn export_orders(&self, query: &ExportQuery) -> Result<ExportFile, RequestError> {
        let response = self
            .inner
            .client
            .get(self.url("orders/export")?)
            .header(ACCEPT, "text/csv")
            .query(&query.to_params())
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(self.parse_error(response).await);
        }

        let headers = response.headers();
        let file_name = headers
            .get(CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .and_then(file_name_from_disposition)
            .unwrap_or_else(|| DEFAULT_EXPORT_FILE_NAME.to_string());
        let content_type = headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("text/csv")
            .to_string();

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            bytes.extend_from_slice(&chunk?);
        }

        tracing::info!(file_name = %file_name, size = bytes.len(), "Export downloaded");
        Ok(ExportFile {
            file_name,
            content_type,
            bytes,
        })
    }
}

impl std::fmt::Debug for OrdersApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrdersApiClient")
            .field("base_url", &self.inner.base_url.as_str())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::SecretString;

    use super::*;

    #[test]
    fn test_urls_resolve_under_base_path() {
        let config = OrdersApiConfig::new("https://shop.test/api/v2").unwrap();
        let client = OrdersApiClient::new(&config).unwrap();

        assert_eq!(
            client.url("orders/stats").unwrap().as_str(),
            "https://shop.test/api/v2/orders/stats"
        );
        let path = format!("orders/{}/status", OrderId::new(9));
        assert_eq!(
            client.url(&path).unwrap().as_str(),
            "https://shop.test/api/v2/orders/9/status"
        );
    }

    #[test]
    fn test_unusable_token_is_not_a_malformed_response() {
        let config = OrdersApiConfig::new("https://shop.test/api")
            .unwrap()
            .with_token("tok_Q8v2Lw9x\nR4mZ7pK3");
        let err = OrdersApiClient::new(&config).err().unwrap();

        assert!(matches!(err, RequestError::InvalidToken(_)));
        assert!(!err.is_malformed());
        assert!(err.to_string().starts_with("Invalid API token"));
    }

    #[test]
    fn test_debug_hides_token() {
        let mut config = OrdersApiConfig::new("https://shop.test/api").unwrap();
        config.token = Some(SecretString::from("tok_9f8a7b6c5d4e3f2a1b0c".to_string()));
        let client = OrdersApiClient::new(&config).unwrap();

        let debug_output = format!("{client:?}");
        assert!(debug_output.contains("shop.test"));
        assert!(!debug_output.contains("tok_9f8a7b6c5d4e3f2a1b0c"));
    }
}
