//! Order Desk Core - Shared domain types.
//!
//! This crate provides the types shared by all Order Desk components:
//! - `admin` - Orders API client and the order list controller
//! - `cli` - Terminal front end driving the controller
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no HTTP clients.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, order statuses, sort keys, date ranges, and prices

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
