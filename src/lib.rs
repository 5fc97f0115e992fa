// Ciphergate — Library root
//
// Re-exports the PEM, engine, store, gateway, config, and CLI modules.

pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod gateway;
pub mod pem;
pub mod store;

pub use error::{CiphergateError, Result};
