//! **glstri** embeds a text file, typically a GLSL shader, into a C or C++ file as a
//! string literal declaration, and keeps that declaration up to date afterwards.
//!
//! Re-embedding into a file that already holds the declaration only touches the
//! declaration itself. Everything before and after it is copied byte for byte, and
//! a target whose declaration already matches the source is not rewritten at all.
//! Comments and whitespace differences don't count as changes.
//!
//! This crate does not parse C. The declaration is found by name with a whole-token
//! search, and new declarations are placed before the first line that looks like
//! top-level code.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! let options = glstri::EmbedOptions::default();
//! let outcome = glstri::embed_file(Path::new("basic.vert"), Path::new("shaders.h"), &options)?;
//! if let glstri::EmbedOutcome::Updated { changes } = outcome {
//!     for change in changes {
//!         println!("{}", change);
//!     }
//! }
//! # Ok::<(), glstri::EmbedError>(())
//! ```

mod comment;
mod config;
mod declaration;
mod error;
mod line;
mod locate;
mod merge;
mod reader;
mod report;
mod splice;

#[cfg(test)]
mod tests;

pub use comment::{strip_comments, CommentState};
pub use config::{
    is_identifier, sanitize_identifier, validate_target, EmbedOptions, DEFAULT_DECL_TYPE,
};
pub use declaration::{write_declaration, FragmentWriter};
pub use error::{EmbedError, Result};
pub use line::Line;
pub use locate::{find_insertion_point, find_token, locate_declaration};
pub use merge::{merge, probe, LineChange, MergeReport};
pub use reader::{LineReader, ReadMode};
pub use report::Reporter;
pub use splice::{copy_rest, copy_until};

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Seek, SeekFrom, Write};
use std::path::Path;

/// What an embed run did to the target.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EmbedOutcome {
    /// The target didn't exist and was created
    Created,

    /// The target had no declaration; one was inserted at `offset`
    Inserted { offset: u64 },

    /// The declaration was rewritten
    Updated { changes: Vec<LineChange> },

    /// The declaration already matched the source; nothing was written
    Unchanged,
}

/// Embeds `source` as `name` into the existing `target`, writing the complete new
/// target content to `staging`.
///
/// Nothing is written to `staging` when the outcome is [`EmbedOutcome::Unchanged`].
pub fn embed_streams<S, T>(
    source: S,
    target: T,
    staging: &mut dyn Write,
    name: &str,
    options: &EmbedOptions,
) -> io::Result<EmbedOutcome>
where
    S: BufRead + Seek,
    T: BufRead + Seek,
{
    let mut source = LineReader::new(source);
    let mut target = LineReader::new(target);

    let outcome = match locate_declaration(&mut target, name)? {
        Some(body_start) => {
            target.seek_to(body_start)?;
            if !probe(&mut source, &mut target)? {
                tracing::info!("{} is up to date", name);
                return Ok(EmbedOutcome::Unchanged);
            }

            target.seek_to(0)?;
            copy_until(&mut target, staging, body_start)?;

            source.seek_to(0)?;
            // The body starts right after the `=`, so the first fragment opens a new line.
            let fragments = FragmentWriter::new(&mut *staging, true);
            let report = merge(&mut source, &mut target, Some(fragments))?;
            tracing::info!("updated {} ({} changed lines)", name, report.changes.len());

            EmbedOutcome::Updated {
                changes: report.changes,
            }
        }
        None => {
            target.seek_to(0)?;
            let offset = find_insertion_point(&mut target)?;

            target.seek_to(0)?;
            copy_until(&mut target, staging, offset)?;
            write_declaration(&mut source, staging, &options.decl_type, name)?;
            tracing::info!("inserted {} at offset {}", name, offset);

            EmbedOutcome::Inserted { offset }
        }
    };

    copy_rest(&mut target, staging)?;
    Ok(outcome)
}

/// Embeds the file at `source_path` into `target_path`, creating the target if needed.
///
/// The target must be a C or C++ file and the variable name is resolved from `options`.
/// See [`embed_file_as`] for the rest.
pub fn embed_file(
    source_path: &Path,
    target_path: &Path,
    options: &EmbedOptions,
) -> Result<EmbedOutcome> {
    validate_target(target_path)?;
    let name = options.variable_name(source_path)?;
    embed_file_as(source_path, target_path, &name, options)
}

/// Embeds the file at `source_path` into `target_path` as `name`, which is used as is.
/// The target's extension is not checked.
///
/// An existing target is staged in full in a temporary file first and only then
/// truncated and rewritten. This is not an atomic replace: a crash during the final
/// copy leaves the target partially written.
pub fn embed_file_as(
    source_path: &Path,
    target_path: &Path,
    name: &str,
    options: &EmbedOptions,
) -> Result<EmbedOutcome> {
    let source = File::open(source_path).map_err(|source| EmbedError::SourceUnreadable {
        path: source_path.to_path_buf(),
        source,
    })?;
    let source = BufReader::new(source);

    if !target_path.exists() {
        let created = File::create(target_path).map_err(|e| EmbedError::io(target_path, e))?;
        let mut sink = BufWriter::new(created);
        write_declaration(
            &mut LineReader::new(source),
            &mut sink,
            &options.decl_type,
            name,
        )
        .and_then(|_| sink.flush())
        .map_err(|e| EmbedError::io(target_path, e))?;

        tracing::info!("created {:?} with {}", target_path, name);
        return Ok(EmbedOutcome::Created);
    }

    let target = File::open(target_path).map_err(|e| EmbedError::io(target_path, e))?;
    let mut staging = BufWriter::new(tempfile::tempfile().map_err(EmbedError::Staging)?);

    let outcome = embed_streams(
        source,
        BufReader::new(target),
        &mut staging,
        name,
        options,
    )
    .map_err(|e| EmbedError::io(target_path, e))?;

    if outcome == EmbedOutcome::Unchanged {
        return Ok(outcome);
    }

    replace_contents(staging, target_path).map_err(|e| EmbedError::io(target_path, e))?;
    Ok(outcome)
}

fn replace_contents(staging: BufWriter<File>, target_path: &Path) -> io::Result<()> {
    let mut staging = staging.into_inner().map_err(|e| e.into_error())?;
    staging.seek(SeekFrom::Start(0))?;

    let mut target = File::create(target_path)?;
    io::copy(&mut staging, &mut target)?;
    target.flush()
}
