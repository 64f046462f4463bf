//! Unified error handling for Order Desk front ends.

use thiserror::Error;

use crate::api::RequestError;
use crate::config::ConfigError;

/// Application-level error type for binaries built on the controller.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Orders API round-trip failed outside the controller.
    #[error("Orders API error: {0}")]
    Request(#[from] RequestError),

    /// Local file I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Bad command-line input.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// An operation finished with a surfaced error.
    #[error("{0}")]
    Operation(String),
}

impl AppError {
    /// Exit code for the process.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidArgument(_) => 2,
            _ => 1,
        }
    }
}
