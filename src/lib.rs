// Pedantic lint configuration for the crate.
// Most of these are reasonable but too strict for this codebase:
// - cast_possible_truncation: Row counts from SQLite fit in usize
// - cast_sign_loss: COUNT(*) is never negative
// - missing_errors_doc: Error handling is self-evident from Result types
// - missing_panics_doc: Panics are rare and documented inline
// - module_name_repetitions: `store::S3Store` reads better than `store::S3`
// - needless_pass_by_value: Sometimes clearer semantically
#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::needless_pass_by_value
)]

pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod ingest;
pub mod models;
pub mod store;
pub mod uploader;
