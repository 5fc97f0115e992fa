// Ciphergate — SQLite Database Management
//
// A `Database` is only a location. Every operation opens its own connection
// through `with_connection`, bootstraps the schema, runs, and drops the
// connection before returning, on success and on error alike.

use std::path::{Path, PathBuf};
use std::time::Duration;

use rusqlite::{Connection, OpenFlags};

use super::StoreError;

/// How long a writer waits on a locked database before giving up.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Location of the durable audit database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Database {
    path: PathBuf,
}

impl Database {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open a connection, hand it to `f`, and release it on every exit path.
    pub fn with_connection<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut Connection) -> Result<T, StoreError>,
    {
        let mut conn = self.open()?;
        f(&mut conn)
    }

    fn open(&self) -> Result<Connection, StoreError> {
        let conn = Connection::open_with_flags(
            &self.path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|e| {
            tracing::error!(path = %self.path.display(), error = %e, "Failed to open audit database");
            StoreError::Unavailable(e)
        })?;

        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| {
            row.get::<_, String>(0)
        })?;
        run_migrations(&conn)?;

        Ok(conn)
    }
}

/// Create the ledger table if absent. Safe to run on every connection.
fn run_migrations(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS operation_log (
            id              TEXT    PRIMARY KEY,
            timestamp       INTEGER NOT NULL,
            source_address  TEXT    NOT NULL,
            outcome_label   TEXT    NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_operation_log_timestamp
            ON operation_log(timestamp DESC);
        ",
    )?;

    tracing::trace!("Audit schema bootstrap completed");
    Ok(())
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_db() -> (tempfile::TempDir, Database) {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(dir.path().join("audit.db"));
        (dir, db)
    }

    #[test]
    fn test_with_connection_creates_database_file() {
        let (_dir, db) = temp_db();
        assert!(!db.path().exists());

        db.with_connection(|_| Ok(())).unwrap();
        assert!(db.path().exists(), "First use should create the database file");
    }

    #[test]
    fn test_schema_bootstrap_creates_ledger_table() {
        let (_dir, db) = temp_db();

        let count: i64 = db
            .with_connection(|conn| {
                Ok(conn.query_row(
                    "SELECT count(*) FROM sqlite_master WHERE type='table' AND name='operation_log'",
                    [],
                    |row| row.get(0),
                )?)
            })
            .unwrap();
        assert_eq!(count, 1, "operation_log table should exist");
    }

    #[test]
    fn test_schema_bootstrap_is_idempotent() {
        let (_dir, db) = temp_db();
        db.with_connection(|conn| run_migrations(conn)).unwrap();
        db.with_connection(|conn| run_migrations(conn)).unwrap();
    }

    #[test]
    fn test_ledger_has_exactly_the_expected_columns() {
        let (_dir, db) = temp_db();

        let columns: Vec<String> = db
            .with_connection(|conn| {
                let mut stmt = conn.prepare("SELECT name FROM pragma_table_info('operation_log')")?;
                let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
                let mut names = Vec::new();
                for row in rows {
                    names.push(row?);
                }
                Ok(names)
            })
            .unwrap();

        assert_eq!(
            columns,
            vec!["id", "timestamp", "source_address", "outcome_label"],
            "The ledger must have no column that could hold a payload"
        );
    }

    #[test]
    fn test_data_survives_across_connections() {
        let (_dir, db) = temp_db();

        db.with_connection(|conn| {
            conn.execute(
                "INSERT INTO operation_log (id, timestamp, source_address, outcome_label)
                 VALUES ('a', 1, 'unknown', 'encrypt ok')",
                [],
            )?;
            Ok(())
        })
        .unwrap();

        let count: i64 = db
            .with_connection(|conn| {
                Ok(conn.query_row("SELECT count(*) FROM operation_log", [], |row| row.get(0))?)
            })
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_unreachable_location_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(dir.path().join("missing").join("nested").join("audit.db"));

        let result = db.with_connection(|_| Ok(()));
        assert!(matches!(result, Err(StoreError::Unavailable(_))));
    }

    #[test]
    fn test_closure_error_propagates() {
        let (_dir, db) = temp_db();
        let result: Result<(), StoreError> = db.with_connection(|conn| {
            conn.execute("INSERT INTO no_such_table VALUES (1)", [])?;
            Ok(())
        });
        assert!(result.is_err());

        // The failed call must not leave the database unusable.
        db.with_connection(|_| Ok(())).unwrap();
    }
}
