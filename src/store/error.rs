// Ciphergate — Store error types

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing database could not be opened, read, or written.
    #[error("Storage unavailable: {0}")]
    Unavailable(#[from] rusqlite::Error),
}
