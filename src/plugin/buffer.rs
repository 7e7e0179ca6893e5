/// Reusable NUL-terminated byte buffer handed to the host as a borrowed slice.
///
/// Contents never exceed the capacity given at construction, terminator
/// included. Longer text is cut on a UTF-8 character boundary.
#[derive(Debug)]
pub struct OutputBuffer {
    buf: Vec<u8>,
    capacity: usize,
}

impl OutputBuffer {
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(capacity > 0, "buffer needs room for the terminator");
        Self {
            buf: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Replace the contents with `text` followed by NUL.
    pub fn write_str(&mut self, text: &str) -> &[u8] {
        let mut end = text.len().min(self.capacity - 1);
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        self.fill(&text.as_bytes()[..end])
    }

    /// Replace the contents with `bytes` followed by NUL. The caller ensures
    /// `bytes` fits.
    pub(crate) fn write_bytes(&mut self, bytes: &[u8]) -> &[u8] {
        debug_assert!(bytes.len() < self.capacity);
        self.fill(bytes)
    }

    fn fill(&mut self, bytes: &[u8]) -> &[u8] {
        self.buf.clear();
        self.buf.extend_from_slice(bytes);
        self.buf.push(0);
        &self.buf
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
