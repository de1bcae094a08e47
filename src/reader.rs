use std::io::{self, BufRead, Seek, SeekFrom};

use crate::line::{is_space, Line};

/// How the bytes of a stream map onto logical lines.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReadMode {
    /// Plain text, one logical line per physical line.
    Raw,

    /// The body of a declaration previously written by this crate: a run of
    /// `"...\n"` string literal fragments closed by an unquoted `;`.
    Formatted,
}

/// Pulls normalized logical lines out of a byte stream, keeping track of the
/// byte offset it has consumed up to.
pub struct LineReader<R> {
    inner: R,
    position: u64,
}

impl<R: BufRead> LineReader<R> {
    pub fn new(inner: R) -> Self {
        LineReader { inner, position: 0 }
    }

    /// Byte offset of the next unread byte.
    pub fn position(&self) -> u64 {
        self.position
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    pub(crate) fn peek_byte(&mut self) -> io::Result<Option<u8>> {
        loop {
            match self.inner.fill_buf() {
                Ok(buf) => return Ok(buf.first().copied()),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }

    pub(crate) fn next_byte(&mut self) -> io::Result<Option<u8>> {
        let c = self.peek_byte()?;
        if c.is_some() {
            self.inner.consume(1);
            self.position += 1;
        }
        Ok(c)
    }

    /// Reads the next logical line into `line`, replacing its previous content.
    ///
    /// Leading whitespace (blank lines included) is skipped, interior whitespace runs
    /// collapse to their first byte and trailing whitespace is trimmed. Reaching the end
    /// of the stream, or in [`ReadMode::Formatted`] an unquoted `;`, sets
    /// [`Line::end_of_stream`]; the line may still carry content in that case.
    pub fn read_line(&mut self, line: &mut Line, mode: ReadMode) -> io::Result<()> {
        line.reset();
        match mode {
            ReadMode::Raw => self.read_raw(line)?,
            ReadMode::Formatted => self.read_formatted(line)?,
        }
        line.finish();
        Ok(())
    }

    fn read_raw(&mut self, line: &mut Line) -> io::Result<()> {
        loop {
            match self.next_byte()? {
                None => {
                    line.set_end_of_stream();
                    return Ok(());
                }
                Some(b'\n') => {
                    if !line.is_empty() {
                        return Ok(());
                    }
                }
                Some(c) => line.push_normalized(c),
            }
        }
    }

    fn read_formatted(&mut self, line: &mut Line) -> io::Result<()> {
        let mut in_quotes = false;

        // Set once the fragment's `\n` has been seen; the logical line then ends
        // with that fragment, even if another one follows on the same physical line.
        let mut complete = false;

        loop {
            if in_quotes {
                match self.next_byte()? {
                    None => break,
                    Some(b'"') => in_quotes = false,
                    Some(b'\\') => match self.next_byte()? {
                        Some(b'n') => complete = true,
                        Some(c @ b'\\') | Some(c @ b'"') => line.push_normalized(c),
                        Some(c) => {
                            line.push_normalized(b'\\');
                            line.push_normalized(c);
                        }
                        None => {
                            line.push_normalized(b'\\');
                            break;
                        }
                    },
                    Some(b'\n') => {
                        // Unterminated literal. Close it here rather than swallow the file.
                        in_quotes = false;
                        if complete || !line.is_empty() {
                            return Ok(());
                        }
                    }
                    Some(c) => line.push_normalized(c),
                }
            } else {
                match self.peek_byte()? {
                    None => break,
                    Some(b'"') => {
                        if complete {
                            return Ok(());
                        }
                        self.next_byte()?;
                        in_quotes = true;
                    }
                    Some(b';') => {
                        self.next_byte()?;
                        break;
                    }
                    Some(b'\n') => {
                        self.next_byte()?;
                        if complete || !line.is_empty() {
                            return Ok(());
                        }
                    }
                    Some(c) if is_space(c) => {
                        self.next_byte()?;
                    }
                    Some(c) => {
                        // Text between fragments, typically a comment.
                        self.next_byte()?;
                        line.push_normalized(c);
                    }
                }
            }
        }

        line.set_end_of_stream();
        Ok(())
    }
}

impl<R: BufRead + Seek> LineReader<R> {
    /// Repositions the reader at an absolute byte offset.
    pub fn seek_to(&mut self, position: u64) -> io::Result<()> {
        self.inner.seek(SeekFrom::Start(position))?;
        self.position = position;
        Ok(())
    }
}
