//! Synchronizes a source file against the declaration previously generated from it.
//!
//! Both sides are read one logical line at a time, in lock-step, with comments
//! stripped and whitespace normalized, so only changes in meaningful text count.
//! Blank lines do not have to line up between the two: a line that is blank on one
//! side holds the other side's current line back for the next comparison.

use std::fmt;
use std::io::{self, BufRead};

use crate::comment::{strip_comments, CommentState};
use crate::declaration::FragmentWriter;
use crate::line::Line;
use crate::reader::{LineReader, ReadMode};

/// One line of difference between the source and an existing declaration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LineChange {
    /// The declaration's line was replaced by the source's.
    Replaced { old: String, new: String },

    /// The source has a line the declaration doesn't.
    Added { new: String },

    /// The declaration had a line past the end of the source.
    Dropped { old: String },
}

impl fmt::Display for LineChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineChange::Replaced { old, new } => write!(f, "{} ---> {}", old, new),
            LineChange::Added { new } => write!(f, " ---> {}", new),
            LineChange::Dropped { old } => write!(f, "{} --->", old),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MergeReport {
    /// Whether the source and declaration differ at all
    pub changed: bool,

    /// Per-line differences; only collected when materializing
    pub changes: Vec<LineChange>,
}

struct Side<'r, R> {
    reader: &'r mut LineReader<R>,
    mode: ReadMode,
    line: Line,
    comments: CommentState,
    exhausted: bool,
}

impl<'r, R: BufRead> Side<'r, R> {
    fn new(reader: &'r mut LineReader<R>, mode: ReadMode) -> Self {
        Side {
            reader,
            mode,
            line: Line::new(),
            comments: CommentState::Normal,
            exhausted: false,
        }
    }

    /// Reads and strips the next line. Returns false once the side is exhausted.
    fn advance(&mut self) -> io::Result<bool> {
        if self.exhausted {
            self.line.reset();
            return Ok(false);
        }

        self.reader.read_line(&mut self.line, self.mode)?;
        self.comments = strip_comments(&mut self.line, self.comments);
        self.exhausted = self.line.end_of_stream();
        Ok(true)
    }

    fn content(&self, present: bool) -> Option<&[u8]> {
        Some(self.line.as_bytes()).filter(|l| present && !l.is_empty())
    }
}

fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

/// Compares `source` (read raw) with the body of an existing declaration (read
/// formatted), starting from each reader's current position.
///
/// Without `fragments` this is a probe: it returns as soon as the first difference is
/// found, and leaves both readers somewhere in the middle. With `fragments` the merged
/// body is written through it, source lines winning wherever the two differ, followed
/// by the `;` terminator. The existing declaration is then consumed up to and including
/// its own terminator, so whatever follows it can be copied over untouched.
pub fn merge<S: BufRead, E: BufRead>(
    source: &mut LineReader<S>,
    existing: &mut LineReader<E>,
    mut fragments: Option<FragmentWriter<'_>>,
) -> io::Result<MergeReport> {
    let mut source = Side::new(source, ReadMode::Raw);
    let mut existing = Side::new(existing, ReadMode::Formatted);
    let mut report = MergeReport::default();

    // Set when a blank line on one side left the other side's line uncompared.
    let mut hold_source = false;
    let mut hold_existing = false;

    loop {
        let have_source = hold_source || source.advance()?;
        let have_existing = hold_existing || existing.advance()?;
        hold_source = false;
        hold_existing = false;

        if !have_source && !have_existing {
            break;
        }

        let new = source.content(have_source);
        let old = existing.content(have_existing);

        let (emit, change) = match (new, old) {
            (None, None) => (None, None),
            (None, Some(_)) if have_source => {
                hold_existing = true;
                (None, None)
            }
            (None, Some(old)) => (None, Some(LineChange::Dropped { old: lossy(old) })),
            (Some(_), None) if have_existing => {
                hold_source = true;
                (None, None)
            }
            (Some(new), Some(old)) if new == old => (Some(old), None),
            (Some(new), Some(old)) => (
                Some(new),
                Some(LineChange::Replaced {
                    old: lossy(old),
                    new: lossy(new),
                }),
            ),
            (Some(new), None) => (Some(new), Some(LineChange::Added { new: lossy(new) })),
        };

        if let Some(change) = change {
            report.changed = true;
            match fragments {
                Some(_) => {
                    tracing::debug!("{}", change);
                    report.changes.push(change);
                }
                None => return Ok(report),
            }
        }

        if let (Some(fragments), Some(emit)) = (fragments.as_mut(), emit) {
            fragments.fragment(emit)?;
        }
    }

    if let Some(fragments) = fragments {
        fragments.terminate()?;
    }

    Ok(report)
}

/// Returns whether merging `source` into the existing declaration would change anything.
pub fn probe<S: BufRead, E: BufRead>(
    source: &mut LineReader<S>,
    existing: &mut LineReader<E>,
) -> io::Result<bool> {
    Ok(merge(source, existing, None)?.changed)
}
