//! SQLite-backed submission store for contacts and feedback.

use std::path::Path;

use parking_lot::Mutex;
use rusqlite::{params, Connection};
use tracing::info;

use crate::schema::SCHEMA_SQL;
use crate::types::{ContactRecord, SubmissionStore};
use aria_core::{Error, Result};

/// SQLite store for captured contacts and feedback messages.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open or create the database file at `db_path`.
    pub fn open(db_path: impl AsRef<Path>) -> Result<Self> {
        let db_path = db_path.as_ref();
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| Error::Storage(e.to_string()))?;
        }

        let conn = Connection::open(db_path).map_err(|e| Error::Database(e.to_string()))?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;",
        )
        .map_err(|e| Error::Database(e.to_string()))?;
        conn.execute_batch(SCHEMA_SQL)
            .map_err(|e| Error::Database(format!("Schema init failed: {}", e)))?;

        info!("SqliteStore initialized: path={}", db_path.display());

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// In-memory database, used by tests.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|e| Error::Database(e.to_string()))?;
        conn.execute_batch(SCHEMA_SQL)
            .map_err(|e| Error::Database(format!("Schema init failed: {}", e)))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

impl SubmissionStore for SqliteStore {
    fn insert_contact(&self, record: &ContactRecord) -> Result<i64> {
        if !record.is_complete() {
            return Err(Error::Validation(
                "contact needs name, phone and email".into(),
            ));
        }
        let now = chrono::Utc::now().to_rfc3339();
        let conn = self.conn.lock();
        conn.prepare_cached(
            "INSERT INTO contacts (name, phone, email, created_at) VALUES (?1, ?2, ?3, ?4)",
        )
        .and_then(|mut stmt| stmt.insert(params![record.name, record.phone, record.email, now]))
        .map_err(|e| Error::Persistence(e.to_string()))
    }

    fn insert_feedback(&self, message: &str) -> Result<i64> {
        let now = chrono::Utc::now().to_rfc3339();
        let conn = self.conn.lock();
        conn.prepare_cached("INSERT INTO feedback (message, created_at) VALUES (?1, ?2)")
            .and_then(|mut stmt| stmt.insert(params![message, now]))
            .map_err(|e| Error::Persistence(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_store() -> (SqliteStore, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteStore::open(dir.path().join("aria.db")).unwrap();
        (store, dir)
    }

    fn row_count(store: &SqliteStore, table: &str) -> i64 {
        store
            .conn
            .lock()
            .query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| row.get(0))
            .unwrap()
    }

    #[test]
    fn test_insert_contact_persists_fields() {
        let (store, _dir) = test_store();
        let record = ContactRecord {
            name: "John Doe".into(),
            phone: "9876543210".into(),
            email: "john@x.com".into(),
        };
        let id = store.insert_contact(&record).unwrap();

        let stored = store
            .conn
            .lock()
            .query_row(
                "SELECT name, phone, email, created_at FROM contacts WHERE id = ?1",
                params![id],
                |row| {
                    Ok((
                        ContactRecord {
                            name: row.get(0)?,
                            phone: row.get(1)?,
                            email: row.get(2)?,
                        },
                        row.get::<_, String>(3)?,
                    ))
                },
            )
            .unwrap();
        assert_eq!(stored.0, record);
        assert!(!stored.1.is_empty());
    }

    #[test]
    fn test_incomplete_contact_rejected() {
        let (store, _dir) = test_store();
        let record = ContactRecord {
            name: "John Doe".into(),
            phone: String::new(),
            email: "john@x.com".into(),
        };
        assert!(matches!(store.insert_contact(&record), Err(Error::Validation(_))));
        assert_eq!(row_count(&store, "contacts"), 0);
    }

    #[test]
    fn test_insert_feedback() {
        let store = SqliteStore::open_in_memory().unwrap();
        let id = store.insert_feedback("Great answers").unwrap();
        assert!(id > 0);
        assert_eq!(row_count(&store, "feedback"), 1);
    }

    #[test]
    fn test_rows_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("aria.db");
        SqliteStore::open(&path).unwrap().insert_feedback("Keep it up").unwrap();

        let reopened = SqliteStore::open(&path).unwrap();
        assert_eq!(row_count(&reopened, "feedback"), 1);
    }
}
