pub mod date;
pub mod image;
mod record;
mod store;

pub use record::{NewRecord, Record, RecordChanges, RecordId};
pub use store::{LoadedRecords, RecordStore};
