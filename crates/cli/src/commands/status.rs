//! `order-desk set-status` and `order-desk bulk-status`

use std::io::Write;

use order_desk_admin::{AppError, OrderListController, OrdersService};
use order_desk_core::{OrderId, OrderStatus};

use super::{FilterArgs, SortArgs, load_page};

/// Change one order's status.
pub async fn set<S: OrdersService>(
    controller: &mut OrderListController<S>,
    id: OrderId,
    status: OrderStatus,
    out: &mut impl Write,
) -> Result<(), AppError> {
    controller.update_status(id, status).await;

    if let Some(message) = controller.state().status_error() {
        return Err(AppError::Operation(message.to_string()));
    }

    writeln!(out, "Order #{id} marked as {}", status.label())?;
    Ok(())
}

/// Select `ids` on one page and change their status.
///
/// Ids that are not on the page are skipped with a warning.
pub async fn bulk<S: OrdersService>(
    controller: &mut OrderListController<S>,
    status: OrderStatus,
    ids: &[OrderId],
    filters: &FilterArgs,
    sort: &SortArgs,
    page: u32,
    out: &mut impl Write,
) -> Result<(), AppError> {
    load_page(controller, filters, sort, page).await?;

    for id in ids {
        if controller.state().selection().contains(*id) {
            continue;
        }
        controller.toggle_selection(*id);
        if !controller.state().selection().contains(*id) {
            tracing::warn!(order_id = %id, page, "Order is not on this page, skipping");
        }
    }

    let selected = controller.state().selection().len();
    if selected == 0 {
        return Err(AppError::InvalidArgument(format!(
            "none of the given orders are on page {page}"
        )));
    }

    controller.bulk_update_status(status).await;

    if let Some(message) = controller.state().status_error() {
        return Err(AppError::Operation(message.to_string()));
    }

    writeln!(out, "Marked {selected} orders as {}", status.label())?;
    Ok(())
}
