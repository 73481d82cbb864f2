use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::Duration;

use opendal::layers::TimeoutLayer;
use opendal::services::S3;
use opendal::{Metadata, Operator, Writer};
use tokio::runtime::Runtime;
use tracing::debug;

use crate::config::StoreSettings;
use crate::error::{DedupError, Result};
use crate::store::{ObjectStore, UploadInfo};

/// Part size for multipart uploads. Files up to this size go up in one PUT.
const PART_SIZE: usize = 16 * 1024 * 1024;

/// S3-compatible store (MinIO, AWS) using path-style addressing.
///
/// Wraps an `opendal` operator per bucket and drives it on a private
/// current-thread runtime, so callers stay synchronous.
pub struct S3Store {
    runtime: Runtime,
    connection: Connection,
    /// Operator for the configured bucket; other buckets get one per call.
    default_bucket: String,
    default_op: Operator,
}

/// Everything needed to build an operator except the bucket.
struct Connection {
    endpoint: String,
    region: String,
    access_key_id: String,
    secret_access_key: String,
    timeout: Option<Duration>,
}

impl Connection {
    fn operator(&self, bucket: &str) -> Result<Operator> {
        let builder = S3::default()
            .endpoint(&self.endpoint)
            .region(&self.region)
            .bucket(bucket)
            .access_key_id(&self.access_key_id)
            .secret_access_key(&self.secret_access_key)
            .disable_config_load();
        let op = Operator::new(builder)
            .map_err(|e| DedupError::Config(format!("invalid object store settings: {e}")))?
            .finish();
        Ok(match self.timeout {
            Some(timeout) => op.layer(
                TimeoutLayer::new()
                    .with_timeout(timeout)
                    .with_io_timeout(timeout),
            ),
            None => op,
        })
    }
}

impl S3Store {
    pub fn new(settings: &StoreSettings) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| DedupError::Config(format!("cannot start upload runtime: {e}")))?;
        let connection = Connection {
            endpoint: settings.base_url(),
            region: settings.region().to_string(),
            access_key_id: settings.access_key_id.clone(),
            secret_access_key: settings.secret_access_key.clone(),
            timeout: settings.timeout(),
        };
        let default_op = connection.operator(&settings.bucket_name)?;

        Ok(Self {
            runtime,
            connection,
            default_bucket: settings.bucket_name.clone(),
            default_op,
        })
    }

    fn operator(&self, bucket: &str) -> Result<Operator> {
        if bucket == self.default_bucket {
            Ok(self.default_op.clone())
        } else {
            self.connection.operator(bucket)
        }
    }
}

impl ObjectStore for S3Store {
    fn put_file(
        &self,
        bucket: &str,
        key: &str,
        local_path: &Path,
        content_type: &str,
    ) -> Result<UploadInfo> {
        let mut file = File::open(local_path).map_err(|e| DedupError::io(local_path, e))?;
        let size = file
            .metadata()
            .map_err(|e| DedupError::io(local_path, e))?
            .len();
        let op = self.operator(bucket)?;

        debug!(bucket, key, size, "PUT object");
        let meta = self.runtime.block_on(async {
            let mut request = op.writer_with(key).chunk(PART_SIZE);
            if !content_type.is_empty() {
                request = request.content_type(content_type);
            }
            let mut writer = request
                .await
                .map_err(|e| SendError::Store(e).into_upload(local_path, key))?;
            match send_file(&mut writer, &mut file, local_path).await {
                Ok(meta) => Ok(meta),
                Err(e) => {
                    // Drops any multipart parts already sent.
                    if let Err(abort) = writer.abort().await {
                        debug!(key, "abort after failed upload: {abort}");
                    }
                    Err(e.into_upload(local_path, key))
                }
            }
        })?;

        let etag = meta.etag().map(|v| v.trim_matches('"').to_string());
        Ok(UploadInfo { size, etag })
    }
}

enum SendError {
    Read(std::io::Error),
    Store(opendal::Error),
}

impl SendError {
    fn into_upload(self, path: &Path, key: &str) -> DedupError {
        match self {
            Self::Read(e) => DedupError::io(path, e),
            Self::Store(e) => DedupError::Upload {
                path: path.to_path_buf(),
                key: key.to_string(),
                detail: e.to_string(),
            },
        }
    }
}

/// Stream `file` into `writer` one part at a time and commit the object.
async fn send_file(
    writer: &mut Writer,
    file: &mut File,
    path: &Path,
) -> std::result::Result<Metadata, SendError> {
    loop {
        let mut part = Vec::new();
        file.by_ref()
            .take(PART_SIZE as u64)
            .read_to_end(&mut part)
            .map_err(SendError::Read)?;
        if part.is_empty() {
            break;
        }
        debug!(path = %path.display(), bytes = part.len(), "sending part");
        writer.write(part).await.map_err(SendError::Store)?;
    }
    writer.close().await.map_err(SendError::Store)
}
