use crate::source::catalog::FileEntry;
use crate::source::container::{self, DecodeError, RecordBatch};
use crate::source::timestamp::{event_time_nanos, TimestampError};
use chrono::{DateTime, Utc};
use std::fs;
use std::io;
use std::path::PathBuf;
use thiserror::Error;
use tracing::debug;

/// Largest serialized record the cursor will hand out
pub const MAX_RECORD_SIZE: usize = 65535;

#[derive(Debug, Error)]
pub enum CursorError {
    #[error("failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to decode '{}': {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: DecodeError,
    },

    #[error(transparent)]
    Timestamp(#[from] TimestampError),

    #[error("cloudtrail message too long: {size}, max {max} supported")]
    RecordTooLarge { size: usize, max: usize },

    #[error("failed to serialize record: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// One record ready for delivery to the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    /// Canonical JSON encoding of the record
    pub data: Vec<u8>,
    /// Whole seconds of `eventTime`, in nanoseconds since the epoch
    pub timestamp_ns: u64,
}

impl Event {
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        let seconds = i64::try_from(self.timestamp_ns / 1_000_000_000).ok()?;
        DateTime::from_timestamp(seconds, 0)
    }
}

/// Pull-based iterator over every record in an ordered list of container files.
///
/// Only the batch of the file currently being consumed is held in memory. A
/// file is read and decoded only after the previous batch is exhausted.
pub struct RecordCursor {
    files: Vec<FileEntry>,
    file_index: usize,
    batch: RecordBatch,
    batch_index: usize,
    emitted: u64,
    stalled: bool,
}

impl RecordCursor {
    pub fn new(files: Vec<FileEntry>) -> Self {
        Self {
            files,
            file_index: 0,
            batch: Vec::new(),
            batch_index: 0,
            emitted: 0,
            stalled: false,
        }
    }

    /// Read the next record.
    ///
    /// Returns `Ok(None)` once every file is consumed, and keeps returning it.
    /// A read or decode failure leaves the cursor on the failing file, so
    /// calling again retries it.
    pub fn next_event(&mut self) -> Result<Option<Event>, CursorError> {
        while self.batch_index == self.batch.len() {
            if !self.load_next_batch()? {
                return Ok(None);
            }
        }

        let record = &self.batch[self.batch_index];
        self.batch_index += 1;

        let timestamp_ns = event_time_nanos(record)?;

        let data = serde_json::to_vec(record)?;
        if data.len() > MAX_RECORD_SIZE {
            return Err(CursorError::RecordTooLarge {
                size: data.len(),
                max: MAX_RECORD_SIZE,
            });
        }

        self.emitted += 1;

        Ok(Some(Event { data, timestamp_ns }))
    }

    /// Replace the current batch with the next file's records.
    /// Returns false when there are no files left.
    fn load_next_batch(&mut self) -> Result<bool, CursorError> {
        let Some(file) = self.files.get(self.file_index) else {
            return Ok(false);
        };

        let bytes = fs::read(&file.path).map_err(|source| CursorError::Io {
            path: file.path.clone(),
            source,
        })?;

        let batch = container::decode(&bytes, file.is_compressed).map_err(|source| {
            CursorError::Decode {
                path: file.path.clone(),
                source,
            }
        })?;

        debug!(
            path = %file.path.display(),
            compressed = file.is_compressed,
            records = batch.len(),
            "Opened container file"
        );

        self.batch = batch;
        self.batch_index = 0;
        self.file_index += 1;

        Ok(true)
    }

    /// Index of the next file to be opened
    pub fn file_index(&self) -> usize {
        self.file_index
    }

    /// Number of records delivered so far
    pub fn emitted(&self) -> u64 {
        self.emitted
    }

    pub fn files(&self) -> &[FileEntry] {
        &self.files
    }
}

/// Iteration ends after a read or decode error, since the cursor stays on the
/// failing file and would report the same error forever. Errors that consume
/// a record (timestamp, size) are yielded and iteration continues. Use
/// `next_event` directly to retry.
impl Iterator for RecordCursor {
    type Item = Result<Event, CursorError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.stalled {
            return None;
        }
        let result = self.next_event().transpose();
        if let Some(Err(CursorError::Io { .. } | CursorError::Decode { .. })) = &result {
            self.stalled = true;
        }
        result
    }
}
