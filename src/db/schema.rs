/// SQL statements for creating the fingerprint index schema.
///
/// One row per uploaded fingerprint; `value` holds the encoded `FileRecord`.
pub const CREATE_SCHEMA: &str = r"
CREATE TABLE IF NOT EXISTS records (
    fingerprint BLOB PRIMARY KEY,
    value BLOB NOT NULL
) WITHOUT ROWID;
";
