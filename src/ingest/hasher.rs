use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::error::{DedupError, Result};

/// Length of a hex-encoded fingerprint.
pub const FINGERPRINT_LEN: usize = 64;

/// Compute the SHA-256 fingerprint of a file's contents using streaming.
/// PERF: Uses 64KB buffer instead of reading entire file into memory.
pub fn hash_file(path: &Path) -> Result<String> {
    let file = File::open(path).map_err(|e| DedupError::io(path, e))?;
    hash_reader(BufReader::with_capacity(65536, file)).map_err(|e| DedupError::io(path, e))
}

/// Compute the SHA-256 fingerprint of everything `reader` yields.
pub fn hash_reader(mut reader: impl Read) -> std::io::Result<String> {
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 65536];

    loop {
        let bytes_read = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(hex::encode(hasher.finalize()))
}

/// Normalize user input to a fingerprint: trimmed, lowercase, 64 hex digits.
pub fn parse_fingerprint(input: &str) -> Result<String> {
    let fingerprint = input.trim().to_ascii_lowercase();
    let well_formed =
        fingerprint.len() == FINGERPRINT_LEN && fingerprint.bytes().all(|b| b.is_ascii_hexdigit());
    if !well_formed {
        return Err(DedupError::InvalidFingerprint(input.to_string()));
    }
    Ok(fingerprint)
}

/// Compute the SHA-256 fingerprint of a byte slice.
#[must_use]
pub fn hash_bytes(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn hash_bytes_deterministic() {
        let h1 = hash_bytes(b"hello world");
        let h2 = hash_bytes(b"hello world");
        assert_eq!(h1, h2);
        assert_eq!(h1.len(), FINGERPRINT_LEN);
    }

    #[test]
    fn hash_bytes_known_value() {
        assert_eq!(
            hash_bytes(b"hello"),
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
    }

    #[test]
    fn hash_bytes_different_for_different_input() {
        let h1 = hash_bytes(b"hello");
        let h2 = hash_bytes(b"hellp");
        assert_ne!(h1, h2);
        assert_eq!(h2.len(), FINGERPRINT_LEN);
    }

    #[test]
    fn parse_fingerprint_normalizes_case() {
        let upper = hash_bytes(b"hello").to_uppercase();
        assert_eq!(
            parse_fingerprint(&format!(" {upper}\n")).unwrap(),
            hash_bytes(b"hello")
        );
    }

    #[test]
    fn parse_fingerprint_rejects_malformed() {
        let non_hex = "g".repeat(FINGERPRINT_LEN);
        let too_long = "a".repeat(FINGERPRINT_LEN + 1);
        for bad in ["", "00", non_hex.as_str(), too_long.as_str()] {
            let err = parse_fingerprint(bad).unwrap_err();
            assert!(matches!(err, DedupError::InvalidFingerprint(_)), "{bad}");
        }
    }

    #[test]
    fn hash_is_lowercase_hex() {
        let h = hash_bytes(b"\x00\xff");
        assert!(h.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    #[test]
    fn hash_file_works() {
        let mut tmp = NamedTempFile::new().unwrap();
        write!(tmp, "test content").unwrap();
        let h = hash_file(tmp.path()).unwrap();
        assert_eq!(h, hash_bytes(b"test content"));
    }

    #[test]
    fn hash_file_spanning_many_buffers() {
        let data = vec![7u8; 65536 * 3 + 17];
        let mut tmp = NamedTempFile::new().unwrap();
        tmp.write_all(&data).unwrap();
        assert_eq!(hash_file(tmp.path()).unwrap(), hash_bytes(&data));
    }

    #[test]
    fn hash_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.bin");
        let err = hash_file(&missing).unwrap_err();
        match err {
            DedupError::Io { path, .. } => assert_eq!(path, missing),
            other => panic!("unexpected error: {other}"),
        }
    }
}
