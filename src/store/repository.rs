// Ciphergate — Audit Log Repository
//
// Append, paginated newest-first listing, and atomic clear-all over the
// `operation_log` table. Each call uses its own connection.
//
// Pagination is not snapshot-isolated: if appends land between two page
// requests, a record may be skipped or seen twice. `clear()` is not ordered
// against concurrent `append()`; a record written during a clear may survive.

use rusqlite::params;
use uuid::Uuid;

use super::db::Database;
use super::models::{OperationRecord, Page};
use super::StoreError;

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over the audit ledger.
pub trait AuditLog {
    /// Durably insert a record.
    fn append(&self, record: &OperationRecord) -> Result<(), StoreError>;

    /// Up to `page.size()` records, newest first, after skipping `page.offset()`.
    fn list(&self, page: Page) -> Result<Vec<OperationRecord>, StoreError>;

    /// Remove every record in one transaction. Returns how many were removed.
    fn clear(&self) -> Result<usize, StoreError>;

    /// Number of records currently stored.
    fn count(&self) -> Result<u64, StoreError>;
}

// ─── SQLite Implementation ──────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct SqliteAuditLog {
    db: Database,
}

impl SqliteAuditLog {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    fn row_to_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<OperationRecord> {
        let id_str: String = row.get(0)?;
        let id = Uuid::parse_str(&id_str).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
        })?;

        Ok(OperationRecord {
            id,
            timestamp: row.get(1)?,
            source_address: row.get(2)?,
            outcome_label: row.get(3)?,
        })
    }
}

impl AuditLog for SqliteAuditLog {
    fn append(&self, record: &OperationRecord) -> Result<(), StoreError> {
        self.db.with_connection(|conn| {
            conn.execute(
                "INSERT INTO operation_log (id, timestamp, source_address, outcome_label)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    record.id.to_string(),
                    record.timestamp,
                    record.source_address,
                    record.outcome_label,
                ],
            )?;
            Ok(())
        })?;

        tracing::debug!(
            record_id = %record.id,
            outcome = %record.outcome_label,
            source = %record.source_address,
            "Audit record appended"
        );

        Ok(())
    }

    fn list(&self, page: Page) -> Result<Vec<OperationRecord>, StoreError> {
        self.db.with_connection(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, timestamp, source_address, outcome_label
                 FROM operation_log
                 ORDER BY timestamp DESC, rowid DESC
                 LIMIT ?1 OFFSET ?2",
            )?;

            let rows = stmt.query_map(
                params![i64::from(page.size()), page.offset()],
                Self::row_to_record,
            )?;

            let mut records = Vec::new();
            for row in rows {
                records.push(row?);
            }
            Ok(records)
        })
    }

    fn clear(&self) -> Result<usize, StoreError> {
        let removed = self.db.with_connection(|conn| {
            let tx = conn.transaction()?;
            let removed = tx.execute("DELETE FROM operation_log", [])?;
            tx.commit()?;
            Ok(removed)
        })?;

        tracing::warn!(removed, "Audit log cleared");
        Ok(removed)
    }

    fn count(&self) -> Result<u64, StoreError> {
        self.db.with_connection(|conn| {
            let count: i64 =
                conn.query_row("SELECT count(*) FROM operation_log", [], |row| row.get(0))?;
            Ok(count.max(0) as u64)
        })
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
