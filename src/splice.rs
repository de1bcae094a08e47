use std::io::{self, BufRead, Write};

use crate::reader::LineReader;

const CHUNK_SIZE: usize = 512;

/// Copies bytes verbatim from the reader's current position up to, but not
/// including, the absolute byte `offset`. Stops early at the end of the stream.
pub fn copy_until<R: BufRead>(
    reader: &mut LineReader<R>,
    sink: &mut dyn Write,
    offset: u64,
) -> io::Result<()> {
    let mut chunk = [0u8; CHUNK_SIZE];
    let mut filled = 0;

    while reader.position() < offset {
        let Some(c) = reader.next_byte()? else {
            break;
        };

        chunk[filled] = c;
        filled += 1;

        if filled == CHUNK_SIZE {
            sink.write_all(&chunk)?;
            filled = 0;
        }
    }

    if filled != 0 {
        sink.write_all(&chunk[..filled])?;
    }

    Ok(())
}

/// Copies everything left in the reader.
pub fn copy_rest<R: BufRead>(reader: &mut LineReader<R>, sink: &mut dyn Write) -> io::Result<()> {
    copy_until(reader, sink, u64::MAX)
}
