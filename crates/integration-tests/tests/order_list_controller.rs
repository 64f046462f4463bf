//! Integration tests for the order list controller.
//!
//! These drive `OrderListController` against the in-memory
//! `FakeOrdersService` and check what reaches the service and what the state
//! exposes afterwards.

use std::sync::Arc;

use order_desk_admin::api::ExportQuery;
use order_desk_admin::orders::{Action, OrderListController, Pagination, QueryState};
use order_desk_core::{DateRange, OrderId, OrderStatus, SortField, SortOrder};
use order_desk_integration_tests::{FakeOrdersService, order, pending_orders};

const PAGE_SIZE: u32 = 20;

async fn loaded_controller(
    service: &Arc<FakeOrdersService>,
) -> OrderListController<Arc<FakeOrdersService>> {
    let mut controller = OrderListController::new(Arc::clone(service), PAGE_SIZE);
    controller.init().await;
    service.reset_calls();
    controller
}

fn page_ids(controller: &OrderListController<Arc<FakeOrdersService>>) -> Vec<OrderId> {
    controller
        .state()
        .orders()
        .iter()
        .map(|order| order.id)
        .collect()
}

// =============================================================================
// Query Changes
// =============================================================================

#[tokio::test]
async fn test_init_loads_first_page_and_stats() {
    let service = Arc::new(FakeOrdersService::with_orders(pending_orders(45)));
    let mut controller = OrderListController::new(Arc::clone(&service), PAGE_SIZE);
    controller.init().await;

    let state = controller.state();
    assert_eq!(state.orders().len(), 20);
    assert_eq!(state.pagination(), Pagination::new(1, 20, 45));
    assert_eq!(state.pagination().total_pages, 3);
    assert_eq!(state.stats().total_orders, 45);
    assert!(!state.orders_loading());
    assert!(!state.stats_loading());
    assert_eq!(service.list_calls().len(), 1);
    assert_eq!(service.stats_calls().len(), 1);
}

#[tokio::test]
async fn test_filter_change_resets_page_and_issues_one_of_each_call() {
    let service = Arc::new(FakeOrdersService::with_orders(pending_orders(45)));
    let mut controller = loaded_controller(&service).await;

    controller.load_orders(3).await;
    assert_eq!(controller.state().query().page, 3);
    service.reset_calls();

    let range = DateRange::parse("2026-01-01", "2026-01-02").ok();
    controller.set_date_range(range).await;

    assert_eq!(controller.state().query().page, 1);
    let list_calls = service.list_calls();
    assert_eq!(list_calls.len(), 1);
    assert_eq!(list_calls[0].page, 1);
    assert_eq!(list_calls[0].date_range, range);
    assert_eq!(service.stats_calls(), vec![range]);
}

#[tokio::test]
async fn test_every_filter_kind_resets_page() {
    let service = Arc::new(FakeOrdersService::with_orders(pending_orders(45)));
    let mut controller = loaded_controller(&service).await;

    controller.load_orders(2).await;
    controller
        .set_status_filter(Some(OrderStatus::Pending))
        .await;
    assert_eq!(controller.state().query().page, 1);

    controller.load_orders(2).await;
    controller.set_search("Customer").await;
    assert_eq!(controller.state().query().page, 1);

    controller.load_orders(2).await;
    controller.set_sort(SortField::Total, SortOrder::Asc).await;
    assert_eq!(controller.state().query().page, 1);

    service.reset_calls();
    controller.clear_filters().await;
    assert_eq!(service.list_calls().len(), 1);
    assert_eq!(service.stats_calls().len(), 1);
    assert_eq!(service.list_calls()[0].status, None);
    assert_eq!(service.list_calls()[0].search, None);
}

#[tokio::test]
async fn test_search_and_status_reach_the_service() {
    let service = Arc::new(FakeOrdersService::with_orders(vec![
        order(1, "Jane Doe", OrderStatus::Shipped, 5000),
        order(2, "John Roe", OrderStatus::Shipped, 2500),
        order(3, "Jane Poe", OrderStatus::Pending, 1000),
    ]));
    let mut controller = loaded_controller(&service).await;

    controller
        .set_status_filter(Some(OrderStatus::Shipped))
        .await;
    controller.set_search("  jane ").await;

    let last = service.list_calls().pop();
    let last = last.as_ref();
    assert_eq!(last.map(|q| q.status), Some(Some(OrderStatus::Shipped)));
    assert_eq!(last.and_then(|q| q.search.clone()), Some("jane".to_string()));
    assert_eq!(page_ids(&controller), vec![OrderId::new(1)]);
}

#[tokio::test]
async fn test_page_change_fetches_orders_only() {
    let service = Arc::new(FakeOrdersService::with_orders(pending_orders(45)));
    let mut controller = loaded_controller(&service).await;

    controller.load_orders(2).await;

    assert_eq!(service.list_calls().len(), 1);
    assert_eq!(service.list_calls()[0].page, 2);
    assert!(service.stats_calls().is_empty());
    assert_eq!(controller.state().orders().len(), 20);
}

#[tokio::test]
async fn test_out_of_range_page_is_ignored() {
    let service = Arc::new(FakeOrdersService::with_orders(pending_orders(45)));
    let mut controller = loaded_controller(&service).await;

    controller.load_orders(4).await;
    controller.load_orders(0).await;

    assert!(service.list_calls().is_empty());
    assert_eq!(controller.state().query().page, 1);
}

#[tokio::test]
async fn test_unchanged_filter_issues_no_calls() {
    let service = Arc::new(FakeOrdersService::with_orders(pending_orders(5)));
    let mut controller = loaded_controller(&service).await;

    controller.set_status_filter(None).await;
    controller.set_search("").await;
    controller
        .set_sort(SortField::CreatedAt, SortOrder::Desc)
        .await;

    assert!(service.list_calls().is_empty());
    assert!(service.stats_calls().is_empty());
}

#[tokio::test]
async fn test_staged_query_then_stats_only_fetches_stats() {
    let service = Arc::new(FakeOrdersService::with_orders(pending_orders(48)));
    let mut controller = OrderListController::new(Arc::clone(&service), PAGE_SIZE);
    let range = DateRange::parse("2026-01-01", "2026-01-01").ok();

    let effects = controller.dispatch(Action::StageQuery(QueryState {
        date_range: range,
        ..QueryState::default()
    }));
    assert!(effects.is_empty());
    controller.load_stats().await;

    let state = controller.state();
    assert!(!state.orders_loading());
    assert!(!state.stats_loading());
    assert!(service.list_calls().is_empty());
    assert_eq!(service.stats_calls(), vec![range]);
    assert_eq!(state.stats().total_orders, 23);
}

#[tokio::test]
async fn test_toggle_sort_flips_direction_on_same_field() {
    let service = Arc::new(FakeOrdersService::with_orders(pending_orders(5)));
    let mut controller = loaded_controller(&service).await;

    controller.toggle_sort(SortField::CreatedAt).await;
    assert_eq!(controller.state().query().sort_order, SortOrder::Asc);
    assert_eq!(page_ids(&controller)[0], OrderId::new(1));

    controller.toggle_sort(SortField::Total).await;
    assert_eq!(controller.state().query().sort_field, SortField::Total);
    assert_eq!(controller.state().query().sort_order, SortOrder::Desc);
}

// =============================================================================
// Load Results
// =============================================================================

#[tokio::test]
async fn test_empty_result_is_empty_state() {
    let service = Arc::new(FakeOrdersService::default());
    let mut controller = OrderListController::new(Arc::clone(&service), PAGE_SIZE);
    controller.init().await;

    let state = controller.state();
    assert!(state.is_empty());
    assert!(state.orders_error().is_none());
    assert_eq!(state.pagination(), Pagination::empty(PAGE_SIZE));
    assert_eq!(state.pagination().total_pages, 0);
}

#[tokio::test]
async fn test_malformed_response_clears_previous_list() {
    let service = Arc::new(FakeOrdersService::with_orders(pending_orders(5)));
    let mut controller = loaded_controller(&service).await;
    controller.select_all();
    assert_eq!(controller.state().orders().len(), 5);

    service.set_malformed_list(true);
    controller.refresh().await;

    let state = controller.state();
    assert!(state.orders().is_empty());
    assert!(state.selection().is_empty());
    assert_eq!(state.pagination().total_pages, 0);
    assert!(!state.is_empty());
    let message = state.orders_error().unwrap_or_default();
    assert!(message.contains("missing field `orders`"), "{message}");
}

#[tokio::test]
async fn test_api_error_keeps_previous_list() {
    let service = Arc::new(FakeOrdersService::with_orders(pending_orders(5)));
    let mut controller = loaded_controller(&service).await;

    service.set_fail_list(true);
    controller.refresh().await;

    let state = controller.state();
    assert_eq!(state.orders().len(), 5);
    assert!(state.orders_error().is_some());

    service.set_fail_list(false);
    controller.refresh().await;
    assert!(controller.state().orders_error().is_none());
}

#[tokio::test]
async fn test_failed_page_change_keeps_rows_and_pagination_together() {
    let service = Arc::new(FakeOrdersService::with_orders(pending_orders(45)));
    let mut controller = loaded_controller(&service).await;
    let first_page = page_ids(&controller);

    service.set_fail_list(true);
    controller.load_orders(2).await;

    let state = controller.state();
    assert_eq!(page_ids(&controller), first_page);
    assert_eq!(state.query().page, 1);
    assert_eq!(state.pagination().page, 1);
    assert_eq!(state.pagination().showing(), Some((1, 20)));
    assert!(state.orders_error().is_some());

    service.set_fail_list(false);
    service.reset_calls();
    controller.refresh().await;

    assert_eq!(service.list_calls()[0].page, 1);
    assert_eq!(page_ids(&controller), first_page);
}

#[tokio::test]
async fn test_shrunk_total_pulls_back_to_last_page() {
    let service = Arc::new(FakeOrdersService::with_orders(pending_orders(45)));
    let mut controller = loaded_controller(&service).await;
    controller
        .set_status_filter(Some(OrderStatus::Pending))
        .await;
    controller.load_orders(3).await;
    assert_eq!(controller.state().orders().len(), 5);

    controller.select_all();
    controller.bulk_update_status(OrderStatus::Shipped).await;

    let state = controller.state();
    assert!(!state.is_empty());
    assert!(!state.orders_loading());
    assert_eq!(state.query().page, 2);
    assert_eq!(state.orders().len(), 20);
    assert_eq!(state.pagination(), Pagination::new(2, PAGE_SIZE, 40));
}

#[tokio::test]
async fn test_stats_failure_does_not_block_orders() {
    let service = Arc::new(FakeOrdersService::with_orders(pending_orders(5)));
    service.set_fail_stats(true);
    let mut controller = OrderListController::new(Arc::clone(&service), PAGE_SIZE);
    controller.init().await;

    let state = controller.state();
    assert_eq!(state.orders().len(), 5);
    assert!(state.orders_error().is_none());
    assert_eq!(state.stats().total_orders, 0);
    assert!(state.stats().status_breakdown.is_empty());
    assert!(state.stats_error().is_some());
}

#[tokio::test]
async fn test_superseded_response_is_discarded() {
    let service = Arc::new(FakeOrdersService::with_orders(vec![
        order(1, "Ada Lovelace", OrderStatus::Pending, 1000),
        order(2, "Grace Hopper", OrderStatus::Pending, 2000),
    ]));
    let mut controller = OrderListController::new(Arc::clone(&service), PAGE_SIZE);

    let first = controller.dispatch(Action::SetSearch("ada".to_string()));
    let second = controller.dispatch(Action::SetSearch("grace".to_string()));

    let mut newer = Vec::new();
    for effect in second {
        newer.push(controller.run_effect(effect).await);
    }
    let mut older = Vec::new();
    for effect in first {
        older.push(controller.run_effect(effect).await);
    }

    // Newer query resolves first, the stale one lands afterwards.
    for action in newer.into_iter().chain(older) {
        assert!(controller.dispatch(action).is_empty());
    }

    assert_eq!(page_ids(&controller), vec![OrderId::new(2)]);
    assert!(!controller.state().orders_loading());
    assert!(!controller.state().stats_loading());
}

// =============================================================================
// Selection
// =============================================================================

#[tokio::test]
async fn test_new_page_truncates_selection() {
    let service = Arc::new(FakeOrdersService::with_orders(pending_orders(45)));
    let mut controller = loaded_controller(&service).await;

    controller.select_all();
    assert_eq!(controller.state().selection().len(), 20);

    controller.refresh().await;
    assert_eq!(controller.state().selection().len(), 20);

    controller.load_orders(2).await;
    let ids = page_ids(&controller);
    assert!(
        controller
            .state()
            .selection()
            .ids()
            .iter()
            .all(|id| ids.contains(id))
    );
    assert!(controller.state().selection().is_empty());
}

#[tokio::test]
async fn test_selection_survives_reload_only_for_remaining_orders() {
    let service = Arc::new(FakeOrdersService::with_orders(vec![
        order(1, "Ada Lovelace", OrderStatus::Pending, 1000),
        order(2, "Grace Hopper", OrderStatus::Pending, 2000),
        order(3, "Alan Turing", OrderStatus::Shipped, 3000),
    ]));
    let mut controller = loaded_controller(&service).await;

    controller.select_all();
    controller
        .set_status_filter(Some(OrderStatus::Pending))
        .await;

    let mut selected = controller.state().selection().ids().to_vec();
    selected.sort();
    assert_eq!(selected, vec![OrderId::new(1), OrderId::new(2)]);
}

#[tokio::test]
async fn test_toggle_and_clear_selection() {
    let service = Arc::new(FakeOrdersService::with_orders(pending_orders(3)));
    let mut controller = loaded_controller(&service).await;

    controller.toggle_selection(OrderId::new(2));
    controller.toggle_selection(OrderId::new(42));
    assert_eq!(controller.state().selection().ids(), &[OrderId::new(2)]);
    assert!(controller.state().rows().iter().any(|row| row.selected));

    controller.clear_selection();
    assert!(controller.state().selection().is_empty());
}

// =============================================================================
// Status Updates
// =============================================================================

#[tokio::test]
async fn test_update_status_reloads_page_and_stats() {
    let service = Arc::new(FakeOrdersService::with_orders(pending_orders(3)));
    let mut controller = loaded_controller(&service).await;

    controller
        .update_status(OrderId::new(2), OrderStatus::Processing)
        .await;

    assert_eq!(
        service.status_calls(),
        vec![(OrderId::new(2), OrderStatus::Processing)]
    );
    assert_eq!(service.list_calls().len(), 1);
    assert_eq!(service.stats_calls().len(), 1);

    let state = controller.state();
    assert!(!state.is_updating(OrderId::new(2)));
    assert!(state.status_error().is_none());
    let row = state.rows().into_iter().find(|row| row.id == OrderId::new(2));
    assert_eq!(row.map(|row| row.status), Some(OrderStatus::Processing));
}

#[tokio::test]
async fn test_failed_update_surfaces_error_and_clears_mark() {
    let service = Arc::new(FakeOrdersService::with_orders(pending_orders(3)));
    service.fail_updates_for(OrderId::new(1));
    let mut controller = loaded_controller(&service).await;

    controller
        .update_status(OrderId::new(1), OrderStatus::Shipped)
        .await;

    let state = controller.state();
    assert!(!state.is_updating(OrderId::new(1)));
    assert!(state.status_error().is_some());
    assert!(service.list_calls().is_empty());
    assert_eq!(service.status_of(OrderId::new(1)), Some(OrderStatus::Pending));
}

#[tokio::test]
async fn test_pending_update_marks_row_and_blocks_second_update() {
    let service = Arc::new(FakeOrdersService::with_orders(pending_orders(3)));
    let mut controller = loaded_controller(&service).await;

    controller.dispatch(Action::UpdateStarted(OrderId::new(3)));
    let row = controller
        .state()
        .rows()
        .into_iter()
        .find(|row| row.id == OrderId::new(3));
    assert_eq!(row.map(|row| row.updating), Some(true));

    controller
        .update_status(OrderId::new(3), OrderStatus::Cancelled)
        .await;
    assert!(service.status_calls().is_empty());
    assert!(controller.state().is_updating(OrderId::new(3)));
}

#[tokio::test]
async fn test_bulk_update_continues_past_failure() {
    let service = Arc::new(FakeOrdersService::with_orders(pending_orders(3)));
    service.fail_updates_for(OrderId::new(2));
    let mut controller = loaded_controller(&service).await;

    controller.select_all();
    let selected = controller.state().selection().ids().to_vec();

    controller.bulk_update_status(OrderStatus::Shipped).await;

    let attempted: Vec<OrderId> = service.status_calls().iter().map(|(id, _)| *id).collect();
    assert_eq!(attempted, selected);

    assert_eq!(service.status_of(OrderId::new(1)), Some(OrderStatus::Shipped));
    assert_eq!(service.status_of(OrderId::new(2)), Some(OrderStatus::Pending));
    assert_eq!(service.status_of(OrderId::new(3)), Some(OrderStatus::Shipped));

    let state = controller.state();
    assert_eq!(state.errors().len(), 1);
    assert!(state.status_error().is_some());
    assert!(state.selection().is_empty());
    assert!(!state.bulk_updating());

    // One reload after the loop.
    assert_eq!(service.list_calls().len(), 1);
    assert_eq!(service.stats_calls().len(), 1);
}

#[tokio::test]
async fn test_bulk_update_with_all_failures_clears_selection_without_reload() {
    let service = Arc::new(FakeOrdersService::with_orders(pending_orders(2)));
    service.fail_updates_for(OrderId::new(1));
    service.fail_updates_for(OrderId::new(2));
    let mut controller = loaded_controller(&service).await;

    controller.select_all();
    controller.bulk_update_status(OrderStatus::Delivered).await;

    assert!(controller.state().selection().is_empty());
    assert!(service.list_calls().is_empty());
    assert_eq!(controller.state().errors().len(), 1);
}

#[tokio::test]
async fn test_bulk_update_without_selection_does_nothing() {
    let service = Arc::new(FakeOrdersService::with_orders(pending_orders(2)));
    let mut controller = loaded_controller(&service).await;

    controller.bulk_update_status(OrderStatus::Shipped).await;

    assert!(service.status_calls().is_empty());
    assert!(controller.state().status_error().is_none());
}

// =============================================================================
// Export
// =============================================================================

#[tokio::test]
async fn test_export_uses_filters_without_page_or_sort() {
    let service = Arc::new(FakeOrdersService::with_orders(pending_orders(45)));
    let mut controller = loaded_controller(&service).await;

    let range = DateRange::parse("2026-01-01", "2026-01-03").ok();
    controller
        .set_status_filter(Some(OrderStatus::Pending))
        .await;
    controller.set_search("Customer").await;
    controller.set_date_range(range).await;
    controller.set_sort(SortField::Total, SortOrder::Asc).await;
    controller.load_orders(2).await;

    let file = controller.export_current_view().await;

    assert_eq!(
        service.export_calls(),
        vec![ExportQuery {
            status: Some(OrderStatus::Pending),
            search: Some("Customer".to_string()),
            date_range: range,
        }]
    );
    let file = file.unwrap_or_else(|| panic!("export should succeed"));
    assert_eq!(file.file_name, "orders-export.csv");
    assert!(file.bytes.starts_with(b"id,customer,status,total\n"));
    assert!(!controller.state().exporting());
}

#[tokio::test]
async fn test_export_failure_surfaces_error() {
    let service = Arc::new(FakeOrdersService::with_orders(pending_orders(2)));
    service.set_fail_export(true);
    let mut controller = loaded_controller(&service).await;

    assert!(controller.export_current_view().await.is_none());
    assert!(controller.state().export_error().is_some());
    assert!(!controller.state().exporting());
    assert!(controller.state().orders_error().is_none());
}
