pub mod catalog;
pub mod container;
pub mod cursor;
pub mod timestamp;

pub use catalog::{CatalogError, FileCatalog, FileEntry};
pub use container::{decode, DecodeError, RecordBatch};
pub use cursor::{CursorError, Event, RecordCursor, MAX_RECORD_SIZE};
pub use timestamp::TimestampError;
