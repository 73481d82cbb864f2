//! Remote object store capability used by the uploader.

pub mod s3;

use std::path::Path;

use serde::Serialize;

use crate::error::Result;

pub use s3::S3Store;

/// Acknowledgement of a stored object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadInfo {
    /// Bytes sent.
    pub size: u64,
    /// Entity tag returned by the store, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,
}

/// Durable blob storage.
///
/// `put_file` must be atomic from the caller's view: on error no object is
/// visible under `key`. Existing objects are overwritten.
pub trait ObjectStore {
    fn put_file(
        &self,
        bucket: &str,
        key: &str,
        local_path: &Path,
        content_type: &str,
    ) -> Result<UploadInfo>;
}

impl<S: ObjectStore + ?Sized> ObjectStore for &S {
    fn put_file(
        &self,
        bucket: &str,
        key: &str,
        local_path: &Path,
        content_type: &str,
    ) -> Result<UploadInfo> {
        (**self).put_file(bucket, key, local_path, content_type)
    }
}
