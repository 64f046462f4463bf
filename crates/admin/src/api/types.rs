//! Wire types for the Orders API.

use chrono::{DateTime, NaiveDate, Utc};
use order_desk_core::{DateRange, OrderId, OrderStatus, SortField, SortOrder};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// =============================================================================
// Queries
// =============================================================================

/// Parameters for one `GET /orders` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderQuery {
    /// Status filter.
    pub status: Option<OrderStatus>,
    /// Free-text search (omitted when empty).
    pub search: Option<String>,
    /// Creation date range.
    pub date_range: Option<DateRange>,
    /// Sort column.
    pub sort_field: SortField,
    /// Sort direction.
    pub sort_order: SortOrder,
    /// 1-based page number.
    pub page: u32,
    /// Orders per page.
    pub page_size: u32,
}

impl OrderQuery {
    /// Build the query string pairs, skipping unset filters.
    #[must_use]
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("page", self.page.to_string()),
            ("limit", self.page_size.to_string()),
        ];
        params.extend(filter_params(
            self.status,
            self.search.as_deref(),
            self.date_range,
        ));
        params.push(("sortBy", self.sort_field.as_str().to_string()));
        params.push(("sortOrder", self.sort_order.as_str().to_string()));
        params
    }
}

/// Parameters for `GET /orders/export`: the list filters without paging or sorting.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExportQuery {
    /// Status filter.
    pub status: Option<OrderStatus>,
    /// Free-text search (omitted when empty).
    pub search: Option<String>,
    /// Creation date range.
    pub date_range: Option<DateRange>,
}

impl ExportQuery {
    /// Build the query string pairs, skipping unset filters.
    #[must_use]
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        filter_params(self.status, self.search.as_deref(), self.date_range)
    }
}

/// Date range as `startDate`/`endDate` query pairs.
#[must_use]
pub fn date_range_params(date_range: Option<DateRange>) -> Vec<(&'static str, String)> {
    date_range.map_or_else(Vec::new, |range| {
        vec![
            ("startDate", range.start().format("%Y-%m-%d").to_string()),
            ("endDate", range.end().format("%Y-%m-%d").to_string()),
        ]
    })
}

fn filter_params(
    status: Option<OrderStatus>,
    search: Option<&str>,
    date_range: Option<DateRange>,
) -> Vec<(&'static str, String)> {
    let mut params = Vec::new();

    if let Some(status) = status {
        params.push(("status", status.as_str().to_string()));
    }

    if let Some(search) = search.map(str::trim)
        && !search.is_empty()
    {
        params.push(("search", search.to_string()));
    }

    params.extend(date_range_params(date_range));
    params
}

// =============================================================================
// Orders
// =============================================================================

/// One page of `GET /orders`.
///
/// Both fields are required; a body without `orders` is a malformed response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderPage {
    /// Orders on this page.
    pub orders: Vec<OrderSummary>,
    /// Total orders matching the filters, across all pages.
    pub total: u64,
}

/// Server-owned order record as shown in the list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub id: OrderId,
    pub customer: Customer,
    pub total: Decimal,
    pub status: OrderStatus,
    #[serde(default)]
    pub items: Vec<LineItem>,
    pub created_at: DateTime<Utc>,
    pub shipping_address: ShippingAddress,
}

impl OrderSummary {
    /// Total quantity across line items.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }
}

/// Customer who placed an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Line item on an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub name: String,
    pub quantity: u32,
    pub price: Decimal,
}

/// Shipping destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    pub line1: String,
    #[serde(default)]
    pub line2: Option<String>,
    pub city: String,
    #[serde(default)]
    pub state: Option<String>,
    pub postal_code: String,
    pub country: String,
}

/// Request body for `PATCH /orders/{id}/status`.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct StatusUpdate {
    pub status: OrderStatus,
}

// =============================================================================
// Stats
// =============================================================================

/// Server-aggregated summary over a date range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct StatsSnapshot {
    pub total_orders: u64,
    pub total_revenue: Decimal,
    pub average_order_value: Decimal,
    #[serde(default)]
    pub status_breakdown: Vec<StatusCount>,
    #[serde(default)]
    pub daily_stats: Vec<DailyStat>,
}

impl StatsSnapshot {
    /// Order count for one status, zero when absent from the breakdown.
    #[must_use]
    pub fn count_for(&self, status: OrderStatus) -> u64 {
        self.status_breakdown
            .iter()
            .filter(|entry| entry.status == status)
            .map(|entry| entry.count)
            .sum()
    }
}

/// Orders in one status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCount {
    pub status: OrderStatus,
    pub count: u64,
}

/// Orders and revenue for one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyStat {
    pub date: NaiveDate,
    pub orders: u64,
    pub revenue: Decimal,
}

// =============================================================================
// Export
// =============================================================================

/// Default file name when the server does not suggest one.
pub const DEFAULT_EXPORT_FILE_NAME: &str = "orders-export.csv";

/// CSV produced by `GET /orders/export`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    /// Suggested file name.
    pub file_name: String,
    /// Response content type (usually `text/csv`).
    pub content_type: String,
    /// Raw file contents.
    pub bytes: Vec<u8>,
}

/// Extract `filename` from a `Content-Disposition` header value.
#[must_use]
pub fn file_name_from_disposition(value: &str) -> Option<String> {
    value
        .split(';')
        .map(str::trim)
        .find_map(|part| part.strip_prefix("filename="))
        .map(|name| name.trim_matches('"').to_string())
        .filter(|name| !name.is_empty() && !name.contains('/') && !name.contains('\\'))
}
