use std::path::Path;

use rusqlite::Connection;
use tracing::debug;

use crate::db::schema::CREATE_SCHEMA;
use crate::error::{DedupError, Result};

/// Database filename inside the index directory.
const INDEX_FILE: &str = "index.db";

/// Durable fingerprint index, owned by a single uploader run.
///
/// Dropping the value closes the underlying database.
pub struct Index {
    conn: Connection,
}

impl Index {
    /// Open (or create) the index stored under `dir`.
    ///
    /// Commits are fully synced, so a successful `put` survives a crash.
    pub fn open(dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(dir).map_err(|e| DedupError::io(dir, e))?;
        let path = dir.join(INDEX_FILE);
        let conn = Connection::open(&path)?;
        conn.execute_batch(
            "PRAGMA journal_mode=WAL;\
             PRAGMA synchronous=FULL;",
        )?;
        conn.execute_batch(CREATE_SCHEMA)?;
        debug!(path = %path.display(), "opened index");
        Ok(Self { conn })
    }

    /// Create an in-memory index (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(CREATE_SCHEMA)?;
        Ok(Self { conn })
    }

    /// Access the underlying connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Close the index, surfacing any error from the final flush.
    pub fn close(self) -> Result<()> {
        self.conn.close().map_err(|(_, e)| DedupError::from(e))
    }
}
