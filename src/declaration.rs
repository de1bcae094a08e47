//! The string literal format shared by fresh declarations and merged ones.
//!
//! Every source line becomes one fragment on its own physical line:
//!
//! ```text
//! const char* basic_vert =
//!     "#version 330\n"
//!     "void main() {}\n";
//! ```
//!
//! Backslashes and double quotes are escaped; [`ReadMode::Formatted`](crate::ReadMode)
//! undoes exactly this encoding.

use std::io::{self, BufRead, Write};

use crate::line::Line;
use crate::reader::{LineReader, ReadMode};

const INDENT: &[u8] = b"    ";

/// Writes consecutive literal fragments to a sink.
pub struct FragmentWriter<'w> {
    sink: &'w mut dyn Write,
    break_before_first: bool,
    written: usize,
}

impl<'w> FragmentWriter<'w> {
    /// `break_before_first` controls whether the first fragment starts on a new line.
    pub fn new(sink: &'w mut dyn Write, break_before_first: bool) -> Self {
        FragmentWriter {
            sink,
            break_before_first,
            written: 0,
        }
    }

    pub fn fragment(&mut self, content: &[u8]) -> io::Result<()> {
        self.open()?;
        write_escaped(&mut *self.sink, content)?;
        self.sink.write_all(b"\\n\"")?;
        self.written += 1;
        Ok(())
    }

    pub fn written(&self) -> usize {
        self.written
    }

    /// Writes the statement terminator. A declaration with no lines gets a single
    /// `""` so that it still has a body to find next time.
    pub fn terminate(mut self) -> io::Result<()> {
        if self.written == 0 {
            self.open()?;
            self.sink.write_all(b"\"")?;
        }
        self.sink.write_all(b";")
    }

    fn open(&mut self) -> io::Result<()> {
        if self.written > 0 || self.break_before_first {
            self.sink.write_all(b"\n")?;
        }
        self.sink.write_all(INDENT)?;
        self.sink.write_all(b"\"")
    }
}

fn write_escaped(sink: &mut dyn Write, content: &[u8]) -> io::Result<()> {
    let mut start = 0;
    for (i, &c) in content.iter().enumerate() {
        if c == b'\\' || c == b'"' {
            sink.write_all(&content[start..i])?;
            sink.write_all(&[b'\\', c])?;
            start = i + 1;
        }
    }
    sink.write_all(&content[start..])
}

/// Writes a complete new declaration of `name` holding every non-blank line of `source`.
///
/// Returns the number of fragments written.
pub fn write_declaration<R: BufRead>(
    source: &mut LineReader<R>,
    sink: &mut dyn Write,
    decl_type: &str,
    name: &str,
) -> io::Result<usize> {
    write!(sink, "\n{} {} =", decl_type, name)?;

    let mut fragments = FragmentWriter::new(sink, true);
    let mut line = Line::new();
    loop {
        source.read_line(&mut line, ReadMode::Raw)?;
        if !line.is_empty() {
            fragments.fragment(line.as_bytes())?;
        }
        if line.end_of_stream() {
            break;
        }
    }

    let written = fragments.written();
    fragments.terminate()?;
    sink.write_all(b"\n")?;

    tracing::debug!("wrote declaration of {} with {} fragments", name, written);
    Ok(written)
}
