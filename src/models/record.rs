use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Metadata persisted for one uploaded content fingerprint.
///
/// Serialized as JSON with short field tags. Unknown fields are ignored on
/// decode so newer writers stay readable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// SHA-256 of the file contents, lowercase hex. Also the index key.
    #[serde(rename = "sha")]
    pub fingerprint: String,
    /// Object filename, original name plus modification-time suffix.
    #[serde(rename = "name")]
    pub stored_name: String,
    /// MIME type sent with the upload (may be empty).
    #[serde(rename = "type", default)]
    pub content_type: String,
    /// Key prefix the object was placed under, trailing `/` included.
    #[serde(rename = "file_path")]
    pub remote_prefix: String,
    /// Source modification time, `YYYYMMDDHHMMSS`.
    #[serde(rename = "modify_time")]
    pub modified_at: String,
}

impl FileRecord {
    /// Full object key: prefix followed by stored name.
    #[must_use]
    pub fn object_key(&self) -> String {
        format!("{}{}", self.remote_prefix, self.stored_name)
    }

    pub fn encode(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }
}
