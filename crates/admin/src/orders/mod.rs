//! Order list controller.
//!
//! - [`state`]: query, selection and loading state plus the pure reducer
//! - [`controller`]: runs reducer effects against an [`OrdersService`]
//! - [`view`]: table rows, pagination and stats formatted for display
//!
//! [`OrdersService`]: crate::api::OrdersService

pub mod controller;
pub mod selection;
pub mod state;
pub mod view;

pub use controller::OrderListController;
pub use selection::SelectionSet;
pub use state::{Action, Effect, OrderListState, QueryState, Ticket};
pub use view::{OrderRow, Pagination, StatsView};
