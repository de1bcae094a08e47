use std::borrow::Cow;

const INITIAL_CAPACITY: usize = 32;

/// Matches C's `isspace`, which also counts vertical tab.
#[inline]
pub(crate) fn is_space(c: u8) -> bool {
    c.is_ascii_whitespace() || c == 0x0b
}

/// One logical line of text with whitespace already normalized.
///
/// A `Line` is meant to be allocated once per scan loop and [`reset`](Line::reset)
/// between reads, so its storage is reused rather than reallocated for every line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    data: Vec<u8>,
    end_of_stream: bool,
}

impl Default for Line {
    fn default() -> Self {
        Self::new()
    }
}

impl Line {
    pub fn new() -> Self {
        Line {
            data: Vec::with_capacity(INITIAL_CAPACITY),
            end_of_stream: false,
        }
    }

    /// Clears the content and the end-of-stream flag, keeping the storage.
    pub fn reset(&mut self) {
        self.data.clear();
        self.end_of_stream = false;
    }

    /// Appends a byte, dropping leading whitespace and collapsing whitespace runs.
    pub fn push_normalized(&mut self, c: u8) {
        if is_space(c) && self.data.last().map_or(true, |&last| is_space(last)) {
            return;
        }
        self.data.push(c);
    }

    /// Completes the line by trimming trailing whitespace.
    pub fn finish(&mut self) {
        while self.data.last().map_or(false, |&last| is_space(last)) {
            self.data.pop();
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn to_string_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.data)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn first(&self) -> Option<u8> {
        self.data.first().copied()
    }

    pub fn end_of_stream(&self) -> bool {
        self.end_of_stream
    }

    pub fn set_end_of_stream(&mut self) {
        self.end_of_stream = true;
    }

    /// Raw access for in-place rewriting; callers must call [`finish`](Line::finish) after.
    pub(crate) fn content_mut(&mut self) -> &mut Vec<u8> {
        &mut self.data
    }

    /// Empties the content but leaves the end-of-stream flag alone.
    pub(crate) fn clear_content(&mut self) {
        self.data.clear();
    }
}
