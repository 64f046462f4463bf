//! Integration tests for Order Desk.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p order-desk-integration-tests
//! ```
//!
//! # Test Support
//!
//! - [`FakeOrdersService`] - in-memory [`OrdersService`] that filters, sorts
//!   and paginates like the real API, records every call, and can be told to
//!   fail
//! - [`spawn_stub_server`] - serve an axum router on an ephemeral port for
//!   exercising the `reqwest` client

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use order_desk_admin::api::{
    Customer, ExportFile, ExportQuery, LineItem, OrderPage, OrderQuery, OrderSummary,
    OrdersService, RequestError, ShippingAddress, StatsSnapshot, StatusCount,
};
use order_desk_core::{DateRange, OrderId, OrderStatus, SortField, SortOrder};
use rust_decimal::Decimal;

// =============================================================================
// Fixtures
// =============================================================================

/// Build an order placed `id` hours after 2026-01-01 00:00 UTC.
#[must_use]
pub fn order(id: i64, customer: &str, status: OrderStatus, total_cents: i64) -> OrderSummary {
    OrderSummary {
        id: OrderId::new(id),
        customer: Customer {
            name: customer.to_string(),
            email: Some(format!(
                "{}@example.com",
                customer.to_lowercase().replace(' ', ".")
            )),
        },
        total: Decimal::new(total_cents, 2),
        status,
        items: vec![LineItem {
            name: "Widget".to_string(),
            quantity: 1,
            price: Decimal::new(total_cents, 2),
        }],
        created_at: placed_at(id),
        shipping_address: ShippingAddress {
            line1: format!("{id} Main St"),
            line2: None,
            city: "Portland".to_string(),
            state: Some("OR".to_string()),
            postal_code: "97201".to_string(),
            country: "US".to_string(),
        },
    }
}

/// `count` pending orders with ids `1..=count`.
#[must_use]
pub fn pending_orders(count: i64) -> Vec<OrderSummary> {
    (1..=count)
        .map(|id| order(id, &format!("Customer {id}"), OrderStatus::Pending, id * 1000))
        .collect()
}

fn placed_at(id: i64) -> DateTime<Utc> {
    let base = Utc
        .with_ymd_and_hms(2026, 1, 1, 0, 0, 0)
        .single()
        .unwrap_or_default();
    base + chrono::Duration::hours(id)
}

// =============================================================================
// Fake Orders Service
// =============================================================================

/// In-memory orders backend.
#[derive(Debug, Default)]
pub struct FakeOrdersService {
    state: Mutex<FakeState>,
}

#[derive(Debug, Default)]
struct FakeState {
    orders: Vec<OrderSummary>,

    list_calls: Vec<OrderQuery>,
    stats_calls: Vec<Option<DateRange>>,
    status_calls: Vec<(OrderId, OrderStatus)>,
    export_calls: Vec<ExportQuery>,

    failing_updates: HashSet<OrderId>,
    fail_list: bool,
    malformed_list: bool,
    fail_stats: bool,
    fail_export: bool,
}

impl FakeOrdersService {
    #[must_use]
    pub fn with_orders(orders: Vec<OrderSummary>) -> Self {
        Self {
            state: Mutex::new(FakeState {
                orders,
                ..FakeState::default()
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Reject status updates for `id`.
    pub fn fail_updates_for(&self, id: OrderId) {
        self.lock().failing_updates.insert(id);
    }

    /// Answer list requests with a transport-level error.
    pub fn set_fail_list(&self, fail: bool) {
        self.lock().fail_list = fail;
    }

    /// Answer list requests as if the body lacked `orders`.
    pub fn set_malformed_list(&self, malformed: bool) {
        self.lock().malformed_list = malformed;
    }

    pub fn set_fail_stats(&self, fail: bool) {
        self.lock().fail_stats = fail;
    }

    pub fn set_fail_export(&self, fail: bool) {
        self.lock().fail_export = fail;
    }

    /// Forget recorded calls.
    pub fn reset_calls(&self) {
        let mut state = self.lock();
        state.list_calls.clear();
        state.stats_calls.clear();
        state.status_calls.clear();
        state.export_calls.clear();
    }

    #[must_use]
    pub fn list_calls(&self) -> Vec<OrderQuery> {
        self.lock().list_calls.clone()
    }

    #[must_use]
    pub fn stats_calls(&self) -> Vec<Option<DateRange>> {
        self.lock().stats_calls.clone()
    }

    #[must_use]
    pub fn status_calls(&self) -> Vec<(OrderId, OrderStatus)> {
        self.lock().status_calls.clone()
    }

    #[must_use]
    pub fn export_calls(&self) -> Vec<ExportQuery> {
        self.lock().export_calls.clone()
    }

    /// Server-side status of an order.
    #[must_use]
    pub fn status_of(&self, id: OrderId) -> Option<OrderStatus> {
        self.lock()
            .orders
            .iter()
            .find(|order| order.id == id)
            .map(|order| order.status)
    }
}

fn matches_filters(
    order: &OrderSummary,
    status: Option<OrderStatus>,
    search: Option<&str>,
    date_range: Option<DateRange>,
) -> bool {
    if status.is_some_and(|status| order.status != status) {
        return false;
    }
    if let Some(search) = search {
        let needle = search.to_lowercase();
        let in_name = order.customer.name.to_lowercase().contains(&needle);
        let in_id = order.id.to_string().contains(&needle);
        if !in_name && !in_id {
            return false;
        }
    }
    if let Some(range) = date_range {
        let day = order.created_at.date_naive();
        if day < range.start() || day > range.end() {
            return false;
        }
    }
    true
}

fn sort_orders(orders: &mut [OrderSummary], field: SortField, order: SortOrder) {
    orders.sort_by(|a, b| {
        let ordering = match field {
            SortField::CreatedAt => a.created_at.cmp(&b.created_at),
            SortField::Total => a.total.cmp(&b.total),
            SortField::Status => a.status.as_str().cmp(b.status.as_str()),
            SortField::Customer => a.customer.name.cmp(&b.customer.name),
        };
        match order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });
}

#[async_trait]
impl OrdersService for FakeOrdersService {
    async fn list_orders(&self, query: &OrderQuery) -> Result<OrderPage, RequestError> {
        let mut state = self.lock();
        state.list_calls.push(query.clone());

        if state.malformed_list {
            return Err(RequestError::Parse(
                "Failed to parse response: missing field `orders`".to_string(),
            ));
        }
        if state.fail_list {
            return Err(RequestError::Api {
                status: 503,
                message: "maintenance".to_string(),
            });
        }

        let mut matching: Vec<OrderSummary> = state
            .orders
            .iter()
            .filter(|order| {
                matches_filters(order, query.status, query.search.as_deref(), query.date_range)
            })
            .cloned()
            .collect();
        sort_orders(&mut matching, query.sort_field, query.sort_order);

        let total = matching.len() as u64;
        let skip = (query.page.saturating_sub(1) as usize) * query.page_size as usize;
        let orders = matching
            .into_iter()
            .skip(skip)
            .take(query.page_size as usize)
            .collect();

        Ok(OrderPage { orders, total })
    }

    async fn get_stats(
        &self,
        date_range: Option<DateRange>,
    ) -> Result<StatsSnapshot, RequestError> {
        let mut state = self.lock();
        state.stats_calls.push(date_range);

        if state.fail_stats {
            return Err(RequestError::Api {
                status: 500,
                message: "stats unavailable".to_string(),
            });
        }

        let in_range: Vec<&OrderSummary> = state
            .orders
            .iter()
            .filter(|order| matches_filters(order, None, None, date_range))
            .collect();

        let total_orders = in_range.len() as u64;
        let total_revenue: Decimal = in_range.iter().map(|order| order.total).sum();
        let average_order_value = if total_orders == 0 {
            Decimal::ZERO
        } else {
            total_revenue / Decimal::from(total_orders)
        };
        let status_breakdown = OrderStatus::ALL
            .iter()
            .map(|status| StatusCount {
                status: *status,
                count: in_range.iter().filter(|order| order.status == *status).count() as u64,
            })
            .filter(|entry| entry.count > 0)
            .collect();

        Ok(StatsSnapshot {
            total_orders,
            total_revenue,
            average_order_value,
            status_breakdown,
            daily_stats: Vec::new(),
        })
    }

    async fn set_order_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<(), RequestError> {
        let mut state = self.lock();
        state.status_calls.push((id, status));

        if state.failing_updates.contains(&id) {
            return Err(RequestError::Api {
                status: 422,
                message: format!("order {id} cannot transition to {status}"),
            });
        }

        match state.orders.iter_mut().find(|order| order.id == id) {
            Some(order) => {
                order.status = status;
                Ok(())
            }
            None => Err(RequestError::NotFound(format!("/orders/{id}/status"))),
        }
    }

    async fn export_orders(&self, query: &ExportQuery) -> Result<ExportFile, RequestError> {
        let mut state = self.lock();
        state.export_calls.push(query.clone());

        if state.fail_export {
            return Err(RequestError::Api {
                status: 500,
                message: "export failed".to_string(),
            });
        }

        let mut csv = String::from("id,customer,status,total\n");
        for order in state.orders.iter().filter(|order| {
            matches_filters(order, query.status, query.search.as_deref(), query.date_range)
        }) {
            csv.push_str(&format!(
                "{},{},{},{}\n",
                order.id, order.customer.name, order.status, order.total
            ));
        }

        Ok(ExportFile {
            file_name: "orders-export.csv".to_string(),
            content_type: "text/csv".to_string(),
            bytes: csv.into_bytes(),
        })
    }
}

// =============================================================================
// Stub HTTP Server
// =============================================================================

/// Serve `router` on `127.0.0.1` at an ephemeral port.
///
/// Returns the base URL, e.g. `http://127.0.0.1:41234/api/`.
///
/// # Errors
///
/// Returns error if the listener cannot bind.
pub async fn spawn_stub_server(router: axum::Router) -> std::io::Result<String> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, router).await {
            tracing::error!(error = %e, "Stub server stopped");
        }
    });

    Ok(format!("http://{addr}/api/"))
}
