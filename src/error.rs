// Ciphergate — Top-level error types
//
// Aggregates errors from the config, gateway, and store modules into a
// single error enum for the application boundary.

use thiserror::Error;

/// Top-level error type for all Ciphergate operations.
#[derive(Debug, Error)]
pub enum CiphergateError {
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    #[error(transparent)]
    Gateway(#[from] crate::gateway::GatewayError),

    #[error("Store error: {0}")]
    Store(#[from] crate::store::StoreError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, CiphergateError>;
