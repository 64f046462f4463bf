//! `order-desk stats`

use std::io::Write;

use chrono::NaiveDate;
use order_desk_admin::orders::{QueryState, StatsView};
use order_desk_admin::{AppError, OrderListController, OrdersService};

use super::{date_range, stage_filters};
use crate::output;

/// Print aggregate stats, optionally scoped to a date range.
pub async fn run<S: OrdersService>(
    controller: &mut OrderListController<S>,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    out: &mut impl Write,
) -> Result<(), AppError> {
    let range = date_range(from, to)?;
    stage_filters(
        controller,
        QueryState {
            date_range: range,
            ..QueryState::default()
        },
    );
    controller.load_stats().await;

    let state = controller.state();
    if let Some(message) = state.stats_error() {
        return Err(AppError::Operation(message.to_string()));
    }

    if let Some(range) = range {
        writeln!(out, "Stats for {range}")?;
    }
    output::stats(out, &StatsView::from(state.stats()))?;
    Ok(())
}
