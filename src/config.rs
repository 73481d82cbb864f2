use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{DedupError, Result};

/// Default config filename, resolved against the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "config.yml";
/// Region used for request signing when none is configured.
const DEFAULT_REGION: &str = "us-east-1";

/// Top-level layout of `config.yml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Object store connection settings.
    pub minio: StoreSettings,
    /// Local paths.
    pub app: AppSettings,
}

/// Object store connection settings (`minio:` section).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreSettings {
    /// Host and optional port, without scheme (e.g. `127.0.0.1:9000`).
    pub endpoint: String,
    #[serde(rename = "accessKeyID")]
    pub access_key_id: String,
    pub secret_access_key: String,
    pub bucket_name: String,
    /// Use https instead of http.
    #[serde(default)]
    pub secure: bool,
    /// Signing region.
    #[serde(default)]
    pub region: Option<String>,
    /// Per-request upload timeout in seconds (no timeout when absent).
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

/// Local path settings (`app:` section).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    /// Directory holding the persistent index.
    pub db_path: PathBuf,
    /// Root of the tree to upload.
    pub upload_path: PathBuf,
}

impl Config {
    /// Load and validate a config file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            DedupError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_yaml(&content)
    }

    /// Parse and validate config from YAML text.
    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: Config = serde_yaml_ng::from_str(content)
            .map_err(|e| DedupError::Config(format!("invalid config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject empty values for the fields that have no default.
    fn validate(&self) -> Result<()> {
        let required = [
            ("minio.endpoint", self.minio.endpoint.as_str()),
            ("minio.accessKeyID", self.minio.access_key_id.as_str()),
            ("minio.secretAccessKey", self.minio.secret_access_key.as_str()),
            ("minio.bucketName", self.minio.bucket_name.as_str()),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(DedupError::Config(format!("{name} must not be empty")));
            }
        }
        if self.app.db_path.as_os_str().is_empty() {
            return Err(DedupError::Config("app.dbPath must not be empty".into()));
        }
        if self.app.upload_path.as_os_str().is_empty() {
            return Err(DedupError::Config("app.uploadPath must not be empty".into()));
        }
        if self.minio.endpoint.contains("://") {
            return Err(DedupError::Config(
                "minio.endpoint must not include a scheme; use minio.secure".into(),
            ));
        }
        Ok(())
    }
}

impl StoreSettings {
    /// Effective signing region.
    #[must_use]
    pub fn region(&self) -> &str {
        self.region.as_deref().unwrap_or(DEFAULT_REGION)
    }

    /// Base URL of the endpoint, e.g. `http://127.0.0.1:9000`.
    ///
    /// The scheme's default port is dropped so the URL's authority matches
    /// the `Host` header an HTTP client sends.
    #[must_use]
    pub fn base_url(&self) -> String {
        let (scheme, default_port) = if self.secure {
            ("https", ":443")
        } else {
            ("http", ":80")
        };
        let host = self.endpoint.trim_end_matches('/');
        let host = host.strip_suffix(default_port).unwrap_or(host);
        format!("{scheme}://{host}")
    }

    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}
