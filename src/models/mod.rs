pub mod record;

pub use record::FileRecord;
