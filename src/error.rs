use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DedupError {
    #[error("config error: {0}")]
    Config(String),

    #[error("io error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("walk error: {0}")]
    Walk(#[from] ignore::Error),

    #[error("index unavailable: {0}")]
    IndexUnavailable(#[from] rusqlite::Error),

    #[error("index write failed for {fingerprint}: {source}")]
    IndexWrite {
        fingerprint: String,
        #[source]
        source: rusqlite::Error,
    },

    #[error("upload of {} to {key} failed: {detail}", path.display())]
    Upload {
        path: PathBuf,
        key: String,
        detail: String,
    },

    #[error("record encoding error: {0}")]
    Encoding(#[from] serde_json::Error),

    #[error("not a fingerprint: {0:?} (expected 64 hex digits)")]
    InvalidFingerprint(String),

    #[error("record not found: {fingerprint}")]
    RecordNotFound { fingerprint: String },
}

impl DedupError {
    /// Wrap an I/O error with the path it occurred on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, DedupError>;
