//! Finding where a declaration lives in an existing file, or where a new one should go.
//!
//! Neither search parses the target language. Both work on normalized, comment-stripped
//! lines and a couple of delimiter heuristics that hold for ordinary C and C++ code.
//! A matched line is then re-read raw to turn the match into a stream offset.

use std::io::{self, BufRead, Seek};

use crate::comment::{blank_comments, strip_comments, CommentState};
use crate::line::{is_space, Line};
use crate::reader::{LineReader, ReadMode};
use crate::splice::copy_until;

fn is_boundary_before(c: u8) -> bool {
    matches!(c, b' ' | b'*' | b'\t')
}

fn is_boundary_after(c: u8) -> bool {
    matches!(c, b' ' | b'=' | b'[' | b'\t')
}

fn token_ends<'a>(line: &'a [u8], name: &'a [u8]) -> impl Iterator<Item = usize> + 'a {
    let width = if name.is_empty() { usize::MAX } else { name.len() };

    line.windows(width)
        .enumerate()
        .filter(move |(_, window)| *window == name)
        .map(move |(start, _)| (start, start + name.len()))
        .filter(move |&(start, end)| {
            let before = start == 0 || is_boundary_before(line[start - 1]);
            let after = end == line.len() || is_boundary_after(line[end]);
            before && after
        })
        .map(|(_, end)| end)
}

/// Byte index just past the first whole-token occurrence of `name` in `line`.
///
/// An occurrence counts when it starts the line or follows a space, tab or `*`, and
/// ends the line or is followed by a space, tab, `=` or `[`.
pub fn find_token(line: &[u8], name: &[u8]) -> Option<usize> {
    token_ends(line, name).next()
}

enum Initializer {
    /// Index just past the `=`
    At(usize),

    /// The line ends right after the name; the `=` may open the next line
    NextLine,
}

fn skip_spaces(line: &[u8], mut i: usize) -> usize {
    while line.get(i).map_or(false, |&c| is_space(c)) {
        i += 1;
    }
    i
}

fn equals_at(line: &[u8], i: usize) -> Option<usize> {
    (line.get(i) == Some(&b'=') && line.get(i + 1) != Some(&b'=')).then(|| i + 1)
}

fn after_name(line: &[u8], mut i: usize) -> Option<Initializer> {
    loop {
        i = skip_spaces(line, i);
        match line.get(i) {
            None => return Some(Initializer::NextLine),
            Some(b'[') => i += line[i..].iter().position(|&c| c == b']')? + 1,
            Some(_) => return equals_at(line, i).map(Initializer::At),
        }
    }
}

/// Looks for `name` followed by its initializer's `=`. With `continued` set, the
/// previous line ended on the name and a leading `=` on this one counts too.
fn find_initializer(line: &[u8], name: &[u8], continued: bool) -> Option<Initializer> {
    if continued {
        if let Some(past) = equals_at(line, skip_spaces(line, 0)) {
            return Some(Initializer::At(past));
        }
    }

    token_ends(line, name).find_map(|end| after_name(line, end))
}

/// Re-reads the raw bytes `start..end` of a matched line to find where its `=` is
/// in the stream. Leaves the reader at `end`.
fn raw_body_start<R: BufRead + Seek>(
    reader: &mut LineReader<R>,
    start: u64,
    end: u64,
    comments: CommentState,
    name: &str,
    continued: bool,
) -> io::Result<Option<u64>> {
    let mut raw = Vec::with_capacity((end - start) as usize);
    reader.seek_to(start)?;
    copy_until(reader, &mut raw, end)?;

    blank_comments(&mut raw, comments);
    for c in raw.iter_mut().filter(|c| is_space(**c)) {
        *c = b' ';
    }

    Ok(match find_initializer(&raw, name.as_bytes(), continued) {
        Some(Initializer::At(past)) => Some(start + past as u64),
        _ => None,
    })
}

/// Scans forward for the declaration of `name`.
///
/// On success returns the offset just past the `=` of its initializer, which is where
/// the declaration's body starts. The `=` may follow the name on the same line or open
/// the next non-blank one. Mentions of `name` with no `=` after them
/// (`extern const char* name;`, `use(name)`) are passed over.
pub fn locate_declaration<R: BufRead + Seek>(
    reader: &mut LineReader<R>,
    name: &str,
) -> io::Result<Option<u64>> {
    let mut line = Line::new();
    let mut comments = CommentState::Normal;
    let mut continued = false;

    loop {
        let start = reader.position();
        let carried = comments;
        reader.read_line(&mut line, ReadMode::Raw)?;
        comments = strip_comments(&mut line, comments);
        let end = reader.position();

        match find_initializer(line.as_bytes(), name.as_bytes(), continued) {
            Some(Initializer::At(_)) => {
                if let Some(body) = raw_body_start(reader, start, end, carried, name, continued)? {
                    tracing::debug!("found {} with its body at offset {}", name, body);
                    return Ok(Some(body));
                }
                continued = false;
            }
            Some(Initializer::NextLine) => continued = true,
            None if line.is_empty() => {}
            None => continued = false,
        }

        if line.end_of_stream() {
            return Ok(None);
        }
    }
}

/// Offset of the first line that looks like top-level code: outside any block
/// comment and starting with a letter. Leading comments, preprocessor lines and
/// blank lines are passed over, so a new declaration lands after them. Returns the
/// end of the stream if no line qualifies.
pub fn find_insertion_point<R: BufRead>(reader: &mut LineReader<R>) -> io::Result<u64> {
    let mut line = Line::new();
    let mut comments = CommentState::Normal;

    loop {
        let offset = reader.position();
        reader.read_line(&mut line, ReadMode::Raw)?;

        let before = comments;
        let starts_with_letter = line.first().map_or(false, |c| c.is_ascii_alphabetic());
        comments = strip_comments(&mut line, comments);

        if before == CommentState::Normal
            && comments == CommentState::Normal
            && starts_with_letter
        {
            return Ok(offset);
        }

        if line.end_of_stream() {
            return Ok(reader.position());
        }
    }
}
