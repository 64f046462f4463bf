//! Effect runner for the order list.
//!
//! [`OrderListController`] owns an [`OrderListState`] and an
//! [`OrdersService`]. Commands dispatch actions into the reducer, run the
//! resulting effects against the service, and feed completions back until no
//! effects remain.

use futures::future::join_all;
use order_desk_core::{DateRange, OrderId, OrderStatus, SortField, SortOrder};
use tracing::instrument;

use super::state::{Action, Effect, OrderListState};
use crate::api::{ExportFile, OrdersService};

/// Drives the order list against a remote orders service.
#[derive(Debug)]
pub struct OrderListController<S> {
    service: S,
    state: OrderListState,
}

impl<S: OrdersService> OrderListController<S> {
    /// Create a controller with nothing loaded yet. Call [`Self::init`] next.
    pub fn new(service: S, page_size: u32) -> Self {
        Self {
            service,
            state: OrderListState::new(page_size),
        }
    }

    /// Current state snapshot.
    pub const fn state(&self) -> &OrderListState {
        &self.state
    }

    pub const fn service(&self) -> &S {
        &self.service
    }

    // =========================================================================
    // Effect plumbing
    // =========================================================================

    /// Reduce one action without running its effects.
    ///
    /// Use together with [`Self::run_effect`] to overlap requests; completions
    /// go back through `dispatch`.
    pub fn dispatch(&mut self, action: Action) -> Vec<Effect> {
        self.state.apply(action)
    }

    /// Perform one effect and return its completion action.
    pub async fn run_effect(&self, effect: Effect) -> Action {
        match effect {
            Effect::FetchOrders { ticket, query } => Action::OrdersLoaded {
                ticket,
                result: self.service.list_orders(&query).await,
            },
            Effect::FetchStats { ticket, date_range } => Action::StatsLoaded {
                ticket,
                result: self.service.get_stats(date_range).await,
            },
        }
    }

    /// Reduce an action and run effects until the state settles.
    pub async fn apply(&mut self, action: Action) {
        let effects = self.dispatch(action);
        self.run_effects(effects).await;
    }

    async fn run_effects(&mut self, mut effects: Vec<Effect>) {
        while !effects.is_empty() {
            let completions =
                join_all(effects.into_iter().map(|effect| self.run_effect(effect))).await;
            effects = completions
                .into_iter()
                .flat_map(|action| self.state.apply(action))
                .collect();
        }
    }

    // =========================================================================
    // Query commands
    // =========================================================================

    /// First load: page 1 and stats.
    #[instrument(skip(self))]
    pub async fn init(&mut self) {
        self.apply(Action::Refresh).await;
    }

    /// Load a page with the current filters.
    #[instrument(skip(self))]
    pub async fn load_orders(&mut self, page: u32) {
        self.apply(Action::LoadPage(page)).await;
    }

    /// Reload stats for the current date range.
    #[instrument(skip(self))]
    pub async fn load_stats(&mut self) {
        self.apply(Action::ReloadStats).await;
    }

    #[instrument(skip(self))]
    pub async fn set_status_filter(&mut self, status: Option<OrderStatus>) {
        self.apply(Action::SetStatusFilter(status)).await;
    }

    #[instrument(skip(self))]
    pub async fn set_search(&mut self, search: &str) {
        self.apply(Action::SetSearch(search.to_string())).await;
    }

    #[instrument(skip(self))]
    pub async fn set_date_range(&mut self, date_range: Option<DateRange>) {
        self.apply(Action::SetDateRange(date_range)).await;
    }

    #[instrument(skip(self))]
    pub async fn set_sort(&mut self, field: SortField, order: SortOrder) {
        self.apply(Action::SetSort { field, order }).await;
    }

    /// Sort by `field`, flipping direction if it is already the sort column.
    pub async fn toggle_sort(&mut self, field: SortField) {
        let query = self.state.query();
        let order = if query.sort_field == field {
            query.sort_order.reversed()
        } else {
            SortOrder::default()
        };
        self.set_sort(field, order).await;
    }

    #[instrument(skip(self))]
    pub async fn clear_filters(&mut self) {
        self.apply(Action::ClearFilters).await;
    }

    /// Reload the current page and stats.
    #[instrument(skip(self))]
    pub async fn refresh(&mut self) {
        self.apply(Action::Refresh).await;
    }

    // =========================================================================
    // Selection
    // =========================================================================

    pub fn toggle_selection(&mut self, id: OrderId) {
        self.dispatch(Action::ToggleSelection(id));
    }

    pub fn select_all(&mut self) {
        self.dispatch(Action::SelectAll);
    }

    pub fn clear_selection(&mut self) {
        self.dispatch(Action::ClearSelection);
    }

    // =========================================================================
    // Status updates
    // =========================================================================

    /// Change one order's status, then reload the page and stats.
    ///
    /// Ignored while an update for the same order is in flight.
    #[instrument(skip(self))]
    pub async fn update_status(&mut self, id: OrderId, status: OrderStatus) {
        if self.state.is_updating(id) {
            tracing::debug!(order_id = %id, "Update already in flight, ignoring");
            return;
        }

        self.dispatch(Action::UpdateStarted(id));
        let result = self.service.set_order_status(id, status).await;
        self.apply(Action::UpdateFinished { id, status, result }).await;
    }

    /// Change every selected order's status, one request at a time.
    ///
    /// A failure does not stop the loop. The selection is cleared afterwards
    /// and the page reloads once if anything succeeded. Failures surface as a
    /// single message in [`OrderListState::status_error`].
    #[instrument(skip(self))]
    pub async fn bulk_update_status(&mut self, status: OrderStatus) {
        let ids = self.state.selection().ids().to_vec();
        if ids.is_empty() {
            tracing::debug!("No orders selected for bulk update");
            return;
        }

        self.dispatch(Action::BulkStarted);

        let mut error_messages = Vec::new();
        for id in &ids {
            if let Err(e) = self.service.set_order_status(*id, status).await {
                error_messages.push(format!("{id}: {e}"));
            }
        }

        let failed = error_messages.len();
        if error_messages.is_empty() {
            tracing::info!(count = ids.len(), %status, "Bulk status update completed");
        } else {
            tracing::warn!(
                success = ids.len() - failed,
                errors = ?error_messages,
                "Bulk status update completed with errors"
            );
        }

        self.apply(Action::BulkFinished { ids, status, failed })
            .await;
    }

    // =========================================================================
    // Export
    // =========================================================================

    /// Export every order matching the current filters.
    ///
    /// Returns `None` on failure; the message is in
    /// [`OrderListState::export_error`].
    #[instrument(skip(self))]
    pub async fn export_current_view(&mut self) -> Option<ExportFile> {
        let query = self.state.query().export_query();
        self.dispatch(Action::ExportStarted);

        match self.service.export_orders(&query).await {
            Ok(file) => {
                self.dispatch(Action::ExportFinished(Ok(())));
                Some(file)
            }
            Err(e) => {
                tracing::error!(error = %e, "Export failed");
                self.dispatch(Action::ExportFinished(Err(e)));
                None
            }
        }
    }
}
