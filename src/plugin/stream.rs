use crate::plugin::buffer::OutputBuffer;
use crate::plugin::PluginError;
use crate::source::{RecordCursor, MAX_RECORD_SIZE};
use tracing::debug;

/// An event as handed to the host, borrowed from the stream's event buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventView<'a> {
    /// JSON bytes followed by a NUL terminator
    pub data: &'a [u8],
    pub timestamp_ns: u64,
}

impl<'a> EventView<'a> {
    /// The JSON payload without its terminator
    pub fn json(&self) -> &'a [u8] {
        &self.data[..self.data.len() - 1]
    }
}

/// Open state of one event stream.
///
/// Each stream owns its cursor and event buffer, so any number of streams can
/// be open at once.
pub struct SourceStream {
    cursor: Option<RecordCursor>,
    event_buf: OutputBuffer,
}

impl SourceStream {
    pub(crate) fn new(cursor: RecordCursor) -> Self {
        Self {
            cursor: Some(cursor),
            event_buf: OutputBuffer::with_capacity(MAX_RECORD_SIZE + 1),
        }
    }

    /// Advance to the next event. A closed stream is at end of stream.
    pub(crate) fn advance(&mut self) -> Result<Option<EventView<'_>>, PluginError> {
        let Some(cursor) = self.cursor.as_mut() else {
            return Ok(None);
        };

        let Some(event) = cursor.next_event()? else {
            return Ok(None);
        };

        let data = self.event_buf.write_bytes(&event.data);
        Ok(Some(EventView {
            data,
            timestamp_ns: event.timestamp_ns,
        }))
    }

    /// Release the cursor. Safe to call more than once.
    pub fn close(&mut self) {
        if let Some(cursor) = self.cursor.take() {
            debug!(emitted = cursor.emitted(), "Closing stream");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.cursor.is_none()
    }
}
