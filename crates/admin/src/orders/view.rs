//! Presentation-ready views derived from controller state.

use order_desk_core::{OrderId, OrderStatus, Price};

use crate::api::{OrderSummary, StatsSnapshot};

// =============================================================================
// Pagination
// =============================================================================

/// Pagination metadata for the current order list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pagination {
    /// Current 1-based page.
    pub page: u32,
    /// Orders per page.
    pub page_size: u32,
    /// Orders matching the filters across all pages.
    pub total_orders: u64,
    /// Number of pages; zero when nothing matches.
    pub total_pages: u32,
}

impl Pagination {
    /// Derive page count from a total.
    #[must_use]
    pub fn new(page: u32, page_size: u32, total_orders: u64) -> Self {
        let total_pages = if page_size == 0 {
            0
        } else {
            u32::try_from(total_orders.div_ceil(u64::from(page_size))).unwrap_or(u32::MAX)
        };
        Self {
            page,
            page_size,
            total_orders,
            total_pages,
        }
    }

    /// Zero-filled pagination for an empty or failed list.
    #[must_use]
    pub const fn empty(page_size: u32) -> Self {
        Self {
            page: 1,
            page_size,
            total_orders: 0,
            total_pages: 0,
        }
    }

    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.page > 1
    }

    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    /// 1-based index range of the orders shown, e.g. `21..=40`.
    #[must_use]
    pub fn showing(&self) -> Option<(u64, u64)> {
        if self.total_orders == 0 {
            return None;
        }
        let first = u64::from(self.page.saturating_sub(1)) * u64::from(self.page_size) + 1;
        let last = (first + u64::from(self.page_size) - 1).min(self.total_orders);
        (first <= last).then_some((first, last))
    }
}

// =============================================================================
// Order Rows
// =============================================================================

/// One row of the orders table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRow {
    pub id: OrderId,
    /// Order number for display (e.g., "#1001").
    pub number: String,
    pub customer: String,
    pub status: OrderStatus,
    pub status_label: &'static str,
    pub item_count: u64,
    pub total: String,
    /// Creation date formatted as `YYYY-MM-DD HH:MM`.
    pub created_at: String,
    /// City and country.
    pub destination: String,
    pub selected: bool,
    /// A status change is in flight; edits are disabled.
    pub updating: bool,
}

impl OrderRow {
    /// Build a row, flagging selection and in-flight updates.
    #[must_use]
    pub fn new(order: &OrderSummary, selected: bool, updating: bool) -> Self {
        Self {
            id: order.id,
            number: format!("#{}", order.id),
            customer: order.customer.name.clone(),
            status: order.status,
            status_label: order.status.label(),
            item_count: order.item_count(),
            total: Price::usd(order.total).display(),
            created_at: order.created_at.format("%Y-%m-%d %H:%M").to_string(),
            destination: format!(
                "{}, {}",
                order.shipping_address.city, order.shipping_address.country
            ),
            selected,
            updating,
        }
    }
}

// =============================================================================
// Stats
// =============================================================================

/// Formatted stats summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsView {
    pub total_orders: u64,
    pub total_revenue: String,
    pub average_order_value: String,
    /// Count per status, every status present.
    pub by_status: Vec<(OrderStatus, u64)>,
}

impl From<&StatsSnapshot> for StatsView {
    fn from(stats: &StatsSnapshot) -> Self {
        Self {
            total_orders: stats.total_orders,
            total_revenue: Price::usd(stats.total_revenue).display(),
            average_order_value: Price::usd(stats.average_order_value).display(),
            by_status: OrderStatus::ALL
                .iter()
                .map(|status| (*status, stats.count_for(*status)))
                .collect(),
        }
    }
}
