use rusqlite::{params, OptionalExtension};

use crate::error::{DedupError, Result};
use crate::models::FileRecord;

use super::Index;

impl Index {
    /// Look up the record stored for a fingerprint.
    pub fn lookup(&self, fingerprint: &str) -> Result<Option<FileRecord>> {
        let value: Option<Vec<u8>> = self
            .conn()
            .query_row(
                "SELECT value FROM records WHERE fingerprint = ?1",
                params![fingerprint.as_bytes()],
                |row| row.get(0),
            )
            .optional()?;
        value.map(|bytes| FileRecord::decode(&bytes)).transpose()
    }

    /// Persist the record for a fingerprint. Returns once the commit is synced.
    ///
    /// Records are write-once: storing a fingerprint that already exists fails
    /// instead of overwriting the original placement.
    pub fn put(&self, fingerprint: &str, record: &FileRecord) -> Result<()> {
        let value = record.encode()?;
        self.conn()
            .execute(
                "INSERT INTO records (fingerprint, value) VALUES (?1, ?2)",
                params![fingerprint.as_bytes(), value],
            )
            .map_err(|source| DedupError::IndexWrite {
                fingerprint: fingerprint.to_string(),
                source,
            })?;
        Ok(())
    }

    /// All records, ordered by fingerprint.
    pub fn all_records(&self) -> Result<Vec<FileRecord>> {
        let mut stmt = self
            .conn()
            .prepare("SELECT value FROM records ORDER BY fingerprint")?;
        let rows = stmt.query_map([], |row| row.get::<_, Vec<u8>>(0))?;
        let mut records = Vec::new();
        for r in rows {
            records.push(FileRecord::decode(&r?)?);
        }
        Ok(records)
    }

    /// Number of stored records.
    pub fn len(&self) -> Result<usize> {
        let count: i64 = self
            .conn()
            .query_row("SELECT COUNT(*) FROM records", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}
