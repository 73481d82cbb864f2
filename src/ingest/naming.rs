//! Object key naming: time-bucketed prefixes and timestamp-suffixed filenames.

use std::time::SystemTime;

use chrono::{DateTime, Local, NaiveDateTime};

/// `YYYYMMDDHHMMSS`, lexically sortable.
const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";
/// `YYYYMM`, one bucket per month.
const PREFIX_FORMAT: &str = "%Y%m";

/// Convert a filesystem modification time to local wall-clock time.
#[must_use]
pub fn local_time(mtime: SystemTime) -> NaiveDateTime {
    DateTime::<Local>::from(mtime).naive_local()
}

/// Format a modification time as `YYYYMMDDHHMMSS`.
#[must_use]
pub fn format_timestamp(mtime: &NaiveDateTime) -> String {
    mtime.format(TIMESTAMP_FORMAT).to_string()
}

/// Remote key prefix for a modification time, e.g. `202401/`.
#[must_use]
pub fn remote_prefix(mtime: &NaiveDateTime) -> String {
    format!("{}/", mtime.format(PREFIX_FORMAT))
}

/// Split `filename` at its last `.`; the extension keeps the dot.
///
/// A leading dot counts, so `.env` is all extension and `a.tar.gz` has `.gz`.
#[must_use]
pub fn split_extension(filename: &str) -> (&str, &str) {
    match filename.rfind('.') {
        Some(dot) => filename.split_at(dot),
        None => (filename, ""),
    }
}

/// Insert `-{stamp}` before the file extension.
///
/// `report.pdf` becomes `report-{stamp}.pdf`, `README` becomes
/// `README-{stamp}` and `.env` becomes `-{stamp}.env`.
#[must_use]
pub fn add_timestamp_suffix(filename: &str, stamp: &str) -> String {
    let (stem, ext) = split_extension(filename);
    format!("{stem}-{stamp}{ext}")
}
