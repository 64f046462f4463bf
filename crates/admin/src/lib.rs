//! Order Desk admin library.
//!
//! Everything an Order Desk front end needs to browse and manage orders held
//! by the remote Orders API:
//!
//! - [`config`]: environment-driven configuration
//! - [`api`]: the [`api::OrdersService`] trait and its `reqwest` client
//! - [`orders`]: the order list controller (state, reducer, effect runner)
//! - [`error`]: the error type surfaced at binary boundaries
//!
//! # Example
//!
//! ```rust,ignore
//! let config = AdminConfig::from_env()?;
//! let client = OrdersApiClient::new(&config.api)?;
//! let mut controller = OrderListController::new(client, config.page_size);
//! controller.init().await;
//! for row in controller.state().rows() {
//!     println!("{} {}", row.number, row.status_label);
//! }
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod error;
pub mod orders;

pub use api::{OrdersApiClient, OrdersService, RequestError};
pub use config::AdminConfig;
pub use error::AppError;
pub use orders::OrderListController;
