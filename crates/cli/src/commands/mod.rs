//! CLI command implementations.
//!
//! Every command goes through [`OrderListController`]; none calls the
//! Orders API directly.

pub mod export;
pub mod list;
pub mod stats;
pub mod status;

use clap::Args;
use chrono::NaiveDate;
use order_desk_admin::orders::{Action, QueryState};
use order_desk_admin::{AppError, OrderListController, OrdersService};
use order_desk_core::{DateRange, OrderStatus, SortField, SortOrder};

/// Filters shared by `list`, `bulk-status` and `export`.
#[derive(Debug, Args)]
pub struct FilterArgs {
    /// Only orders in this status
    #[arg(long = "status")]
    pub status_filter: Option<OrderStatus>,

    /// Search customer name, email or order number
    #[arg(short = 'q', long)]
    pub search: Option<String>,

    /// Created on or after (YYYY-MM-DD)
    #[arg(long, requires = "to")]
    pub from: Option<NaiveDate>,

    /// Created on or before (YYYY-MM-DD)
    #[arg(long, requires = "from")]
    pub to: Option<NaiveDate>,
}

impl FilterArgs {
    /// Validated date range, if both ends were given.
    pub fn date_range(&self) -> Result<Option<DateRange>, AppError> {
        date_range(self.from, self.to)
    }

    /// Query with these filters and the default sort.
    pub fn query(&self) -> Result<QueryState, AppError> {
        Ok(QueryState {
            status: self.status_filter,
            search: self.search.clone().unwrap_or_default(),
            date_range: self.date_range()?,
            ..QueryState::default()
        })
    }
}

/// Sort options for commands that show a page.
#[derive(Debug, Args)]
pub struct SortArgs {
    /// Sort column (createdAt, total, status, customer)
    #[arg(long, default_value_t = SortField::default())]
    pub sort: SortField,

    /// Sort direction (asc, desc)
    #[arg(long, default_value_t = SortOrder::default())]
    pub order: SortOrder,
}

pub fn date_range(
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Result<Option<DateRange>, AppError> {
    match (from, to) {
        (Some(start), Some(end)) => DateRange::new(start, end)
            .map(Some)
            .map_err(|e| AppError::InvalidArgument(e.to_string())),
        _ => Ok(None),
    }
}

/// Stage the filters without fetching; the caller runs one load afterwards.
fn stage_filters<S: OrdersService>(
    controller: &mut OrderListController<S>,
    query: QueryState,
) {
    controller.dispatch(Action::StageQuery(query));
}

/// Load one page of orders with the given filters and sort.
pub async fn load_page<S: OrdersService>(
    controller: &mut OrderListController<S>,
    filters: &FilterArgs,
    sort: &SortArgs,
    page: u32,
) -> Result<(), AppError> {
    if page == 0 {
        return Err(AppError::InvalidArgument(
            "page numbers start at 1".to_string(),
        ));
    }

    let query = QueryState {
        sort_field: sort.sort,
        sort_order: sort.order,
        ..filters.query()?
    };
    stage_filters(controller, query);
    controller.load_orders(page).await;

    match controller.state().orders_error() {
        Some(message) => Err(AppError::Operation(message.to_string())),
        None => Ok(()),
    }
}
