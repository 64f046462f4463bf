//! Core types for Order Desk.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod date_range;
pub mod id;
pub mod price;
pub mod status;

pub use date_range::{DateRange, DateRangeError};
pub use id::*;
pub use price::{CurrencyCode, Price};
pub use status::*;
