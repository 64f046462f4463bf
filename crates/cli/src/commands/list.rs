//! `order-desk list`

use std::io::Write;

use order_desk_admin::{AppError, OrderListController, OrdersService};

use super::{FilterArgs, SortArgs, load_page};
use crate::output;

/// Print one page of orders.
pub async fn run<S: OrdersService>(
    controller: &mut OrderListController<S>,
    filters: &FilterArgs,
    sort: &SortArgs,
    page: u32,
    out: &mut impl Write,
) -> Result<(), AppError> {
    load_page(controller, filters, sort, page).await?;
    output::order_list(out, controller.state())?;
    Ok(())
}
