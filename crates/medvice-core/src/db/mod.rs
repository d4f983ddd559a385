//! SQLite store for saved diagnosis results.
//!
//! The file carries its schema revision in `PRAGMA user_version`; a file
//! written by a newer build is refused rather than read with the wrong
//! column layout.

mod results;
mod schema;

pub use schema::*;

use std::path::Path;
use std::time::Duration;

use rusqlite::Connection;
use thiserror::Error;

/// How long a writer waits on a locked file before giving up.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Error, Debug)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Cannot prepare database location: {0}")]
    Io(#[from] std::io::Error),

    #[error("Stored list is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Database schema version {found} is newer than supported version {supported}")]
    SchemaVersion { found: i64, supported: i64 },

    #[error("Constraint violation: {0}")]
    Constraint(String),
}

pub type DbResult<T> = Result<T, DbError>;

/// Handle on the result store. Not `Sync`; share it behind a mutex.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (or create) the store at `path`, creating missing parent
    /// directories.
    pub fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        log::debug!("Opened result store at {}", path.display());
        Self::migrate(conn)
    }

    /// Throwaway store, used by tests and by callers that never persist.
    pub fn open_in_memory() -> DbResult<Self> {
        Self::migrate(Connection::open_in_memory()?)
    }

    /// Schema revision recorded in the file.
    pub fn schema_version(&self) -> DbResult<i64> {
        Ok(self
            .conn
            .pragma_query_value(None, "user_version", |row| row.get(0))?)
    }

    fn migrate(conn: Connection) -> DbResult<Self> {
        let db = Self { conn };
        let found = db.schema_version()?;
        if found > SCHEMA_VERSION {
            return Err(DbError::SchemaVersion {
                found,
                supported: SCHEMA_VERSION,
            });
        }

        db.conn.execute_batch(SCHEMA)?;
        if found < SCHEMA_VERSION {
            db.conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;
            log::info!("Result store schema set to version {}", SCHEMA_VERSION);
        }
        Ok(db)
    }

    #[cfg(test)]
    pub(crate) fn conn(&self) -> &Connection {
        &self.conn
    }
}
