//! Orders API access.
//!
//! The order list controller never talks HTTP directly; it goes through the
//! [`OrdersService`] trait. [`OrdersApiClient`] is the production
//! implementation backed by `reqwest`. Tests substitute an in-memory fake.
//!
//! # Endpoints
//!
//! - `GET  /orders` - filtered, sorted, paginated order list
//! - `GET  /orders/stats` - aggregate stats over an optional date range
//! - `PATCH /orders/{id}/status` - single status transition
//! - `GET  /orders/export` - CSV export of the current filters

mod client;
pub mod types;

pub use client::OrdersApiClient;
pub use types::*;

use std::sync::Arc;

use async_trait::async_trait;
use order_desk_core::{DateRange, OrderId, OrderStatus};
use thiserror::Error;

/// Errors from a failed or malformed Orders API round-trip.
#[derive(Debug, Error)]
pub enum RequestError {
    /// HTTP transport failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned a non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Rate limited by the API.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Missing or rejected credentials.
    #[error("Unauthorized: check ORDER_DESK_API_TOKEN")]
    Unauthorized,

    /// Response body did not match the expected shape.
    #[error("Malformed response: {0}")]
    Parse(String),

    /// Request URL could not be built.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Configured token cannot be sent as a header.
    #[error("Invalid API token: {0}")]
    InvalidToken(String),
}

impl RequestError {
    /// Whether the server answered but the body could not be understood.
    #[must_use]
    pub const fn is_malformed(&self) -> bool {
        matches!(self, Self::Parse(_))
    }
}

/// Remote orders backend consumed by the order list controller.
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// Fetch one page of orders matching the query.
    async fn list_orders(&self, query: &OrderQuery) -> Result<OrderPage, RequestError>;

    /// Fetch aggregate stats, scoped only by date range.
    async fn get_stats(
        &self,
        date_range: Option<DateRange>,
    ) -> Result<StatsSnapshot, RequestError>;

    /// Request a status transition for one order.
    async fn set_order_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<(), RequestError>;

    /// Export every order matching the filters as CSV.
    async fn export_orders(&self, query: &ExportQuery) -> Result<ExportFile, RequestError>;
}

#[async_trait]
impl<T> OrdersService for Arc<T>
where
    T: OrdersService + ?Sized,
{
    async fn list_orders(&self, query: &OrderQuery) -> Result<OrderPage, RequestError> {
        (**self).list_orders(query).await
    }

    async fn get_stats(
        &self,
        date_range: Option<DateRange>,
    ) -> Result<StatsSnapshot, RequestError> {
        (**self).get_stats(date_range).await
    }

    async fn set_order_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<(), RequestError> {
        (**self).set_order_status(id, status).await
    }

    async fn export_orders(&self, query: &ExportQuery) -> Result<ExportFile, RequestError> {
        (**self).export_orders(query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_error_display() {
        let err = RequestError::NotFound("order 1001".to_string());
        assert_eq!(err.to_string(), "Not found: order 1001");

        let err = RequestError::Api {
            status: 503,
            message: "maintenance".to_string(),
        };
        assert_eq!(err.to_string(), "API error: 503 - maintenance");
    }

    #[test]
    fn test_rate_limited_error() {
        let err = RequestError::RateLimited(60);
        assert_eq!(err.to_string(), "Rate limited, retry after 60 seconds");
    }

    #[test]
    fn test_only_parse_errors_are_malformed() {
        assert!(RequestError::Parse("missing field `orders`".to_string()).is_malformed());
        assert!(!RequestError::Unauthorized.is_malformed());
        assert!(!RequestError::RateLimited(1).is_malformed());
    }
}
