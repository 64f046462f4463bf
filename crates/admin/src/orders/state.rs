//! Order list state and its reducer.
//!
//! [`OrderListState::apply`] is a pure transition: it mutates state in
//! response to an [`Action`] and returns the [`Effect`]s (network calls) the
//! transition requires. It never performs I/O itself.
//!
//! # Request tickets
//!
//! Every fetch effect carries a [`Ticket`]. The state remembers the latest
//! ticket issued per channel (orders, stats) and only applies a completion
//! whose ticket matches. A response to a superseded query is dropped, no
//! matter when it resolves.

use std::collections::HashSet;

use order_desk_core::{DateRange, OrderId, OrderStatus, SortField, SortOrder};

use super::selection::SelectionSet;
use super::view::{OrderRow, Pagination};
use crate::api::{
    ExportQuery, OrderPage, OrderQuery, OrderSummary, RequestError, StatsSnapshot,
};

/// Sequence number identifying one fetch request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Ticket(u64);

impl Ticket {
    const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

// =============================================================================
// Query State
// =============================================================================

/// User-controlled query parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryState {
    pub status: Option<OrderStatus>,
    pub search: String,
    pub date_range: Option<DateRange>,
    pub sort_field: SortField,
    pub sort_order: SortOrder,
    /// 1-based page number.
    pub page: u32,
}

impl Default for QueryState {
    fn default() -> Self {
        Self {
            status: None,
            search: String::new(),
            date_range: None,
            sort_field: SortField::default(),
            sort_order: SortOrder::default(),
            page: 1,
        }
    }
}

impl QueryState {
    /// List request for the current page.
    #[must_use]
    pub fn order_query(&self, page_size: u32) -> OrderQuery {
        OrderQuery {
            status: self.status,
            search: self.search_filter(),
            date_range: self.date_range,
            sort_field: self.sort_field,
            sort_order: self.sort_order,
            page: self.page,
            page_size,
        }
    }

    /// Export request: the filters, without page or sort.
    #[must_use]
    pub fn export_query(&self) -> ExportQuery {
        ExportQuery {
            status: self.status,
            search: self.search_filter(),
            date_range: self.date_range,
        }
    }

    fn search_filter(&self) -> Option<String> {
        let trimmed = self.search.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }

    fn has_filters(&self) -> bool {
        self.status.is_some() || !self.search.is_empty() || self.date_range.is_some()
    }
}

// =============================================================================
// Actions and Effects
// =============================================================================

/// Everything that can change order list state.
#[derive(Debug)]
pub enum Action {
    /// Filter by status, or `None` for all statuses.
    SetStatusFilter(Option<OrderStatus>),
    /// Replace the search text.
    SetSearch(String),
    /// Filter by creation date, or `None` for all time.
    SetDateRange(Option<DateRange>),
    /// Change sort column and direction.
    SetSort { field: SortField, order: SortOrder },
    /// Load the given page with the current filters.
    LoadPage(u32),
    /// Drop status, search and date filters.
    ClearFilters,
    /// Replace filters and sort without fetching. The page is left alone.
    StageQuery(QueryState),
    /// Reload the current page and stats.
    Refresh,
    /// Reload stats only.
    ReloadStats,

    /// Select or deselect one order on the current page.
    ToggleSelection(OrderId),
    /// Select every order on the current page.
    SelectAll,
    /// Deselect everything.
    ClearSelection,

    /// A list request finished.
    OrdersLoaded {
        ticket: Ticket,
        result: Result<OrderPage, RequestError>,
    },
    /// A stats request finished.
    StatsLoaded {
        ticket: Ticket,
        result: Result<StatsSnapshot, RequestError>,
    },

    /// A single status update was sent.
    UpdateStarted(OrderId),
    /// A single status update finished.
    UpdateFinished {
        id: OrderId,
        status: OrderStatus,
        result: Result<(), RequestError>,
    },
    /// A bulk status update over the current selection began.
    BulkStarted,
    /// The bulk loop finished; `failed` of `ids` were rejected.
    BulkFinished {
        ids: Vec<OrderId>,
        status: OrderStatus,
        failed: usize,
    },

    /// An export request was sent.
    ExportStarted,
    /// An export request finished.
    ExportFinished(Result<(), RequestError>),
}

/// A network call requested by a state transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    FetchOrders { ticket: Ticket, query: OrderQuery },
    FetchStats {
        ticket: Ticket,
        date_range: Option<DateRange>,
    },
}

// =============================================================================
// Order List State
// =============================================================================

/// Complete state of the order list screen.
#[derive(Debug, Clone)]
pub struct OrderListState {
    query: QueryState,
    page_size: u32,

    orders: Vec<OrderSummary>,
    total_orders: u64,
    loaded: bool,
    stats: StatsSnapshot,

    selection: SelectionSet,
    updating: HashSet<OrderId>,

    orders_loading: bool,
    stats_loading: bool,
    bulk_updating: bool,
    exporting: bool,

    orders_error: Option<String>,
    stats_error: Option<String>,
    status_error: Option<String>,
    export_error: Option<String>,

    orders_ticket: Ticket,
    /// Page carried by the latest orders fetch; committed to `query.page`
    /// when that fetch succeeds.
    requested_page: u32,
    stats_ticket: Ticket,
}

impl OrderListState {
    /// Initial state: default query, nothing loaded.
    #[must_use]
    pub fn new(page_size: u32) -> Self {
        Self {
            query: QueryState::default(),
            page_size,
            orders: Vec::new(),
            total_orders: 0,
            loaded: false,
            stats: StatsSnapshot::default(),
            selection: SelectionSet::new(),
            updating: HashSet::new(),
            orders_loading: false,
            stats_loading: false,
            bulk_updating: false,
            exporting: false,
            orders_error: None,
            stats_error: None,
            status_error: None,
            export_error: None,
            orders_ticket: Ticket::default(),
            requested_page: 1,
            stats_ticket: Ticket::default(),
        }
    }

    /// Apply an action, returning the effects it schedules.
    pub fn apply(&mut self, action: Action) -> Vec<Effect> {
        match action {
            Action::SetStatusFilter(status) => {
                let changed = self.query.status != status;
                self.query.status = status;
                self.query_changed(changed)
            }
            Action::SetSearch(search) => {
                let changed = self.query.search != search;
                self.query.search = search;
                self.query_changed(changed)
            }
            Action::SetDateRange(date_range) => {
                let changed = self.query.date_range != date_range;
                self.query.date_range = date_range;
                self.query_changed(changed)
            }
            Action::SetSort { field, order } => {
                let changed = self.query.sort_field != field || self.query.sort_order != order;
                self.query.sort_field = field;
                self.query.sort_order = order;
                self.query_changed(changed)
            }
            Action::ClearFilters => {
                let changed = self.query.has_filters();
                self.query.status = None;
                self.query.search.clear();
                self.query.date_range = None;
                self.query_changed(changed)
            }
            Action::StageQuery(query) => {
                self.query = QueryState {
                    page: self.query.page,
                    ..query
                };
                Vec::new()
            }
            Action::LoadPage(page) => self.load_page(page),
            Action::Refresh => self.reload(),
            Action::ReloadStats => vec![self.fetch_stats()],

            Action::ToggleSelection(id) => {
                if self.orders.iter().any(|order| order.id == id) {
                    self.selection.toggle(id);
                } else {
                    tracing::debug!(order_id = %id, "Ignoring selection of order not on this page");
                }
                Vec::new()
            }
            Action::SelectAll => {
                self.selection
                    .select_all(self.orders.iter().map(|order| order.id));
                Vec::new()
            }
            Action::ClearSelection => {
                self.selection.clear();
                Vec::new()
            }

            Action::OrdersLoaded { ticket, result } => self.orders_loaded(ticket, result),
            Action::StatsLoaded { ticket, result } => {
                self.stats_loaded(ticket, result);
                Vec::new()
            }

            Action::UpdateStarted(id) => {
                self.updating.insert(id);
                self.status_error = None;
                Vec::new()
            }
            Action::UpdateFinished { id, status, result } => {
                self.updating.remove(&id);
                match result {
                    Ok(()) => self.reload(),
                    Err(e) => {
                        tracing::warn!(order_id = %id, %status, error = %e, "Status update failed");
                        self.status_error =
                            Some(format!("Failed to mark order #{id} as {status}: {e}"));
                        Vec::new()
                    }
                }
            }
            Action::BulkStarted => {
                self.bulk_updating = true;
                self.status_error = None;
                self.updating.extend(self.selection.ids().iter().copied());
                Vec::new()
            }
            Action::BulkFinished {
                ids,
                status,
                failed,
            } => {
                self.bulk_updating = false;
                for id in &ids {
                    self.updating.remove(id);
                }
                self.selection.clear();
                if failed > 0 {
                    self.status_error = Some(format!(
                        "Bulk update to {status} did not complete for every selected order"
                    ));
                }
                if failed < ids.len() {
                    self.reload()
                } else {
                    Vec::new()
                }
            }

            Action::ExportStarted => {
                self.exporting = true;
                self.export_error = None;
                Vec::new()
            }
            Action::ExportFinished(result) => {
                self.exporting = false;
                if let Err(e) = result {
                    self.export_error = Some(format!("Export failed: {e}"));
                }
                Vec::new()
            }
        }
    }

    fn query_changed(&mut self, changed: bool) -> Vec<Effect> {
        if !changed {
            return Vec::new();
        }
        vec![self.fetch_orders(1), self.fetch_stats()]
    }

    /// Current page and stats.
    fn reload(&mut self) -> Vec<Effect> {
        vec![self.fetch_orders(self.query.page), self.fetch_stats()]
    }

    fn load_page(&mut self, page: u32) -> Vec<Effect> {
        let total_pages = self.pagination().total_pages;
        if page == 0 || (self.loaded && total_pages > 0 && page > total_pages) {
            tracing::warn!(page, total_pages, "Ignoring request for out-of-range page");
            return Vec::new();
        }
        vec![self.fetch_orders(page)]
    }

    fn fetch_orders(&mut self, page: u32) -> Effect {
        self.orders_ticket = self.orders_ticket.next();
        self.requested_page = page;
        self.orders_loading = true;
        Effect::FetchOrders {
            ticket: self.orders_ticket,
            query: OrderQuery {
                page,
                ..self.query.order_query(self.page_size)
            },
        }
    }

    fn fetch_stats(&mut self) -> Effect {
        self.stats_ticket = self.stats_ticket.next();
        self.stats_loading = true;
        Effect::FetchStats {
            ticket: self.stats_ticket,
            date_range: self.query.date_range,
        }
    }

    fn orders_loaded(
        &mut self,
        ticket: Ticket,
        result: Result<OrderPage, RequestError>,
    ) -> Vec<Effect> {
        if ticket != self.orders_ticket {
            tracing::debug!(
                ?ticket,
                latest = ?self.orders_ticket,
                "Discarding superseded orders response"
            );
            return Vec::new();
        }
        self.orders_loading = false;

        match result {
            Ok(page) => {
                let last_page = Pagination::new(1, self.page_size, page.total).total_pages;
                if page.orders.is_empty() && last_page > 0 && self.requested_page > last_page {
                    tracing::debug!(
                        requested = self.requested_page,
                        last_page,
                        "Requested page is past the end, loading the last page"
                    );
                    return vec![self.fetch_orders(last_page)];
                }

                self.query.page = self.requested_page;
                self.orders = page.orders;
                self.total_orders = page.total;
                self.loaded = true;
                self.orders_error = None;
                let orders = &self.orders;
                self.selection
                    .retain(|id| orders.iter().any(|order| order.id == id));
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to fetch orders");
                if e.is_malformed() || self.orders.is_empty() {
                    self.orders.clear();
                    self.total_orders = 0;
                    self.selection.clear();
                }
                self.orders_error = Some(format!("Failed to load orders: {e}"));
            }
        }
        Vec::new()
    }

    fn stats_loaded(&mut self, ticket: Ticket, result: Result<StatsSnapshot, RequestError>) {
        if ticket != self.stats_ticket {
            tracing::debug!(
                ?ticket,
                latest = ?self.stats_ticket,
                "Discarding superseded stats response"
            );
            return;
        }
        self.stats_loading = false;

        match result {
            Ok(stats) => {
                self.stats = stats;
                self.stats_error = None;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to fetch stats");
                self.stats = StatsSnapshot::default();
                self.stats_error = Some(format!("Failed to load stats: {e}"));
            }
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[must_use]
    pub const fn query(&self) -> &QueryState {
        &self.query
    }

    #[must_use]
    pub const fn page_size(&self) -> u32 {
        self.page_size
    }

    #[must_use]
    pub fn orders(&self) -> &[OrderSummary] {
        &self.orders
    }

    /// Table rows for the current page.
    #[must_use]
    pub fn rows(&self) -> Vec<OrderRow> {
        self.orders
            .iter()
            .map(|order| {
                OrderRow::new(
                    order,
                    self.selection.contains(order.id),
                    self.is_updating(order.id),
                )
            })
            .collect()
    }

    #[must_use]
    pub fn pagination(&self) -> Pagination {
        if self.total_orders == 0 {
            return Pagination::empty(self.page_size);
        }
        Pagination::new(self.query.page, self.page_size, self.total_orders)
    }

    #[must_use]
    pub const fn stats(&self) -> &StatsSnapshot {
        &self.stats
    }

    #[must_use]
    pub const fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    /// Whether a status change for `id` is in flight.
    #[must_use]
    pub fn is_updating(&self, id: OrderId) -> bool {
        self.updating.contains(&id)
    }

    /// Loaded successfully, and nothing matches the filters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.loaded
            && self.orders_error.is_none()
            && self.total_orders == 0
            && self.orders.is_empty()
    }

    #[must_use]
    pub const fn orders_loading(&self) -> bool {
        self.orders_loading
    }

    #[must_use]
    pub const fn stats_loading(&self) -> bool {
        self.stats_loading
    }

    #[must_use]
    pub const fn bulk_updating(&self) -> bool {
        self.bulk_updating
    }

    #[must_use]
    pub const fn exporting(&self) -> bool {
        self.exporting
    }

    #[must_use]
    pub fn orders_error(&self) -> Option<&str> {
        self.orders_error.as_deref()
    }

    #[must_use]
    pub fn stats_error(&self) -> Option<&str> {
        self.stats_error.as_deref()
    }

    #[must_use]
    pub fn status_error(&self) -> Option<&str> {
        self.status_error.as_deref()
    }

    #[must_use]
    pub fn export_error(&self) -> Option<&str> {
        self.export_error.as_deref()
    }

    /// Every surfaced error message, in display order.
    #[must_use]
    pub fn errors(&self) -> Vec<&str> {
        [
            self.orders_error(),
            self.stats_error(),
            self.status_error(),
            self.export_error(),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}
