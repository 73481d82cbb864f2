use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, error, info};

use crate::config::Config;
use crate::db::Index;
use crate::error::{DedupError, Result};
use crate::ingest::content_type::content_type_for;
use crate::ingest::scanner::Scanner;
use crate::ingest::{hasher, naming};
use crate::models::FileRecord;
use crate::store::{ObjectStore, S3Store, UploadInfo};

/// Extensions of already-packaged archives, never deduplicated or uploaded.
pub const EXCLUDED_EXTENSIONS: &[&str] = &["zip"];

/// Whether `path` is dropped before hashing because of its extension.
#[must_use]
pub fn is_excluded(path: &Path) -> bool {
    let Some(name) = path.file_name() else {
        return false;
    };
    let name = name.to_string_lossy();
    let (_, ext) = naming::split_extension(&name);
    ext.strip_prefix('.').is_some_and(|ext| {
        EXCLUDED_EXTENSIONS
            .iter()
            .any(|excluded| ext.eq_ignore_ascii_case(excluded))
    })
}

/// What happened to a single discovered path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum FileOutcome {
    /// Directory entry; nothing to do.
    Directory,
    /// Extension on the exclusion list; not hashed.
    Excluded,
    /// Content already stored; `record` is the existing entry.
    Duplicate { record: FileRecord },
    /// Uploaded and indexed.
    Uploaded { record: FileRecord, info: UploadInfo },
    /// Dry run: would be uploaded as `record`.
    Planned { record: FileRecord },
}

/// Counters for one upload run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UploadSummary {
    pub files_seen: usize,
    pub directories: usize,
    pub excluded: usize,
    pub duplicates: usize,
    pub uploaded: usize,
    pub bytes_uploaded: u64,
    pub planned: usize,
}

impl UploadSummary {
    fn record(&mut self, outcome: &FileOutcome) {
        match outcome {
            FileOutcome::Directory => {
                self.directories += 1;
                return;
            }
            FileOutcome::Excluded => self.excluded += 1,
            FileOutcome::Duplicate { .. } => self.duplicates += 1,
            FileOutcome::Uploaded { info, .. } => {
                self.uploaded += 1;
                self.bytes_uploaded += info.size;
            }
            FileOutcome::Planned { .. } => self.planned += 1,
        }
        self.files_seen += 1;
    }
}

/// Sequential hash → lookup → upload → index pipeline.
///
/// Owns the index for the duration of a run; it is closed when the uploader
/// is dropped, including on error paths.
pub struct Uploader<S> {
    index: Index,
    store: S,
    bucket: String,
    dry_run: bool,
    /// Fingerprints planned during a dry run, standing in for index writes.
    planned: HashMap<String, FileRecord>,
}

impl<S: ObjectStore> Uploader<S> {
    pub fn new(index: Index, store: S, bucket: impl Into<String>) -> Self {
        Self {
            index,
            store,
            bucket: bucket.into(),
            dry_run: false,
            planned: HashMap::new(),
        }
    }

    /// Hash and look up files without uploading or writing the index.
    #[must_use]
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn index(&self) -> &Index {
        &self.index
    }

    pub fn into_index(self) -> Index {
        self.index
    }

    /// Process paths in order, stopping at the first error.
    pub fn run<I>(&mut self, paths: I) -> Result<UploadSummary>
    where
        I: IntoIterator<Item = PathBuf>,
    {
        let mut summary = UploadSummary::default();
        for path in paths {
            let outcome = self.process(&path)?;
            summary.record(&outcome);
        }
        Ok(summary)
    }

    /// Run one discovered path through the pipeline.
    pub fn process(&mut self, path: &Path) -> Result<FileOutcome> {
        let meta = std::fs::metadata(path).map_err(|e| DedupError::io(path, e))?;
        if meta.is_dir() {
            return Ok(FileOutcome::Directory);
        }
        if is_excluded(path) {
            debug!(path = %path.display(), "excluded archive");
            return Ok(FileOutcome::Excluded);
        }

        let fingerprint = hasher::hash_file(path)
            .inspect_err(|e| error!(path = %path.display(), "hash failed: {e}"))?;
        debug!(path = %path.display(), %fingerprint, "hashed");

        if let Some(record) = self.existing(&fingerprint)? {
            info!(
                path = %path.display(),
                %fingerprint,
                name = %record.stored_name,
                content_type = %record.content_type,
                prefix = %record.remote_prefix,
                modified_at = %record.modified_at,
                "already stored"
            );
            return Ok(FileOutcome::Duplicate { record });
        }

        let mtime = meta.modified().map_err(|e| DedupError::io(path, e))?;
        let record = new_record(path, fingerprint, mtime);
        let key = record.object_key();

        if self.dry_run {
            info!(path = %path.display(), %key, "would upload");
            self.planned.insert(record.fingerprint.clone(), record.clone());
            return Ok(FileOutcome::Planned { record });
        }

        let info = self
            .store
            .put_file(&self.bucket, &key, path, &record.content_type)
            .inspect_err(|e| {
                error!(
                    path = %path.display(),
                    fingerprint = %record.fingerprint,
                    %key,
                    "upload failed: {e}"
                );
            })?;
        info!(path = %path.display(), %key, size = info.size, "uploaded");

        self.index
            .put(&record.fingerprint, &record)
            .inspect_err(|e| {
                error!(fingerprint = %record.fingerprint, %key, "uploaded but not indexed: {e}");
            })?;
        Ok(FileOutcome::Uploaded { record, info })
    }

    fn existing(&self, fingerprint: &str) -> Result<Option<FileRecord>> {
        if let Some(record) = self.planned.get(fingerprint) {
            return Ok(Some(record.clone()));
        }
        self.index.lookup(fingerprint)
    }
}

/// Build the record for a first upload; placement comes from this file's
/// modification time.
fn new_record(path: &Path, fingerprint: String, mtime: std::time::SystemTime) -> FileRecord {
    let local = naming::local_time(mtime);
    let modified_at = naming::format_timestamp(&local);
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    FileRecord {
        fingerprint,
        stored_name: naming::add_timestamp_suffix(&filename, &modified_at),
        content_type: content_type_for(path),
        remote_prefix: naming::remote_prefix(&local),
        modified_at,
    }
}

/// Run a full upload over the configured tree.
pub fn run_upload(config: &Config, dry_run: bool) -> Result<UploadSummary> {
    let index = Index::open(&config.app.db_path)?;
    let store = S3Store::new(&config.minio)?;
    let paths = Scanner::new(&config.app.upload_path)
        .skip_dir(&config.app.db_path)
        .scan()?;
    info!(
        entries = paths.len(),
        root = %config.app.upload_path.display(),
        dry_run,
        "starting upload"
    );

    let mut uploader = Uploader::new(index, store, &config.minio.bucket_name).dry_run(dry_run);
    let summary = uploader.run(paths)?;
    uploader.into_index().close()?;

    info!(
        uploaded = summary.uploaded,
        duplicates = summary.duplicates,
        excluded = summary.excluded,
        "upload finished"
    );
    Ok(summary)
}
