//! SQLite-backed storage for provider responses.
//!
//! One table, append-only. Every successful provider response becomes a row; the
//! row with the highest id is the latest.

use std::path::{Path, PathBuf};

use rusqlite::{Connection, OptionalExtension, params};
use tracing::{debug, info};

use crate::error::StoreError;
use crate::model::WeatherRecord;

const IN_MEMORY: &str = ":memory:";

/// Storage accessor owning a single SQLite connection.
#[derive(Debug)]
pub struct WeatherStore {
    conn: Connection,
    path: PathBuf,
}

impl WeatherStore {
    /// Open or create the database at `path` and make sure the table exists.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|source| StoreError::CreateDirectory {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        info!("Opening weather database at {}", path.display());
        let conn = Connection::open(path).map_err(|source| StoreError::Unavailable {
            path: path.to_path_buf(),
            source,
        })?;

        let store = Self {
            conn,
            path: path.to_path_buf(),
        };
        store.ensure_schema()?;
        Ok(store)
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().map_err(|source| StoreError::Unavailable {
            path: PathBuf::from(IN_MEMORY),
            source,
        })?;

        let store = Self {
            conn,
            path: PathBuf::from(IN_MEMORY),
        };
        store.ensure_schema()?;
        Ok(store)
    }

    /// Create the `weather` table if it does not exist yet. Idempotent.
    pub fn ensure_schema(&self) -> Result<(), StoreError> {
        self.conn
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS weather (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    payload TEXT NOT NULL
                );",
            )
            .map_err(|source| StoreError::Unavailable {
                path: self.path.clone(),
                source,
            })
    }

    /// Append a record and return the id assigned by SQLite.
    pub fn insert(&self, payload: &str) -> Result<i64, StoreError> {
        self.conn
            .execute("INSERT INTO weather (payload) VALUES (?1)", params![payload])
            .map_err(StoreError::Write)?;

        let id = self.conn.last_insert_rowid();
        debug!(id, bytes = payload.len(), "Inserted weather record");
        Ok(id)
    }

    /// The record with the highest id, if any.
    pub fn latest(&self) -> Result<Option<WeatherRecord>, StoreError> {
        self.conn
            .query_row(
                "SELECT id, payload FROM weather ORDER BY id DESC LIMIT 1",
                [],
                |row| {
                    Ok(WeatherRecord {
                        id: row.get(0)?,
                        payload: row.get(1)?,
                    })
                },
            )
            .optional()
            .map_err(StoreError::Read)
    }

    pub fn count(&self) -> Result<u64, StoreError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM weather", [], |row| row.get(0))
            .map_err(StoreError::Read)?;
        Ok(count.max(0) as u64)
    }

    /// Close the connection, flushing anything SQLite still holds.
    pub fn close(self) -> Result<(), StoreError> {
        info!("Closing weather database at {}", self.path.display());
        self.conn
            .close()
            .map_err(|(_conn, source)| StoreError::Close(source))
    }
}
