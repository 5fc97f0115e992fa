// Ciphergate — Store Module
//
// Append-only audit log of successful operations, backed by SQLite. Records
// carry an outcome label and the caller's origin, never key material,
// plaintext, or ciphertext.

mod db;
mod error;
mod models;
mod repository;

pub use db::Database;
pub use error::StoreError;
pub use models::{OperationRecord, Outcome, Page, UNKNOWN_SOURCE};
pub use repository::{AuditLog, SqliteAuditLog};
