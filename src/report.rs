use std::fmt;
use std::io::{self, Write};
use std::path::Path;

use crate::{EmbedOptions, EmbedOutcome};

/// User-facing diagnostics for an embed run, gated by the run's [`EmbedOptions`].
///
/// Regular messages are suppressed by `silence`. Warnings only appear with `warnings`
/// set, whether or not the run is silenced.
pub struct Reporter<'a, W> {
    options: &'a EmbedOptions,
    out: W,
}

impl<'a, W: Write> Reporter<'a, W> {
    pub fn new(options: &'a EmbedOptions, out: W) -> Self {
        Reporter { options, out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn say(&mut self, message: impl fmt::Display) -> io::Result<()> {
        if self.options.silence {
            return Ok(());
        }
        writeln!(self.out, "{}", message)
    }

    pub fn warning(&mut self, message: impl fmt::Display) -> io::Result<()> {
        if !self.options.warnings {
            return Ok(());
        }
        writeln!(self.out, "WARNING: {}", message)
    }

    pub fn mapping(&mut self, source: &Path, target: &Path) -> io::Result<()> {
        self.say(format_args!("{} -> {}", source.display(), target.display()))
    }

    pub fn outcome(
        &mut self,
        outcome: &EmbedOutcome,
        name: &str,
        source: &Path,
        target: &Path,
    ) -> io::Result<()> {
        match outcome {
            EmbedOutcome::Created => Ok(()),
            EmbedOutcome::Inserted { .. } => self.warning(format_args!(
                "{} is not declared in {}, adding it",
                name,
                target.display()
            )),
            EmbedOutcome::Updated { changes } => {
                self.warning(format_args!(
                    "Changing the definition of {} to the contents of {}",
                    name,
                    source.display()
                ))?;
                for change in changes {
                    self.say(change)?;
                }
                Ok(())
            }
            EmbedOutcome::Unchanged => self.say("Found no difference between shader code!"),
        }
    }
}
