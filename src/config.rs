use std::path::Path;

use regex::Regex;

use crate::{EmbedError, Result};

pub const DEFAULT_DECL_TYPE: &str = "const char*";

lazy_static::lazy_static! {
    static ref IDENTIFIER_RE: Regex = Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap();
}

lazy_static::lazy_static! {
    static ref TARGET_EXTENSION_RE: Regex =
        Regex::new(r"(?i)\.(c|h|cc|cpp|cxx|hh|hpp|hxx|inl)$").unwrap();
}

/// Resolved settings for one embed run. Built once and passed by reference.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EmbedOptions {
    /// Variable name to use instead of the one derived from the source file name
    pub variable: Option<String>,

    /// Type written in front of new declarations
    pub decl_type: String,

    /// Print warnings
    pub warnings: bool,

    /// Suppress everything but warnings
    pub silence: bool,
}

impl Default for EmbedOptions {
    fn default() -> Self {
        EmbedOptions {
            variable: None,
            decl_type: DEFAULT_DECL_TYPE.to_string(),
            warnings: false,
            silence: false,
        }
    }
}

impl EmbedOptions {
    /// Name of the variable holding the contents of `source`.
    ///
    /// An explicit override must already be a valid identifier. Otherwise the source's
    /// file name minus its last extension is used, with anything that can't appear in
    /// an identifier replaced by `_`.
    pub fn variable_name(&self, source: &Path) -> Result<String> {
        if let Some(name) = &self.variable {
            return if is_identifier(name) {
                Ok(name.clone())
            } else {
                Err(EmbedError::InvalidVariableName { name: name.clone() })
            };
        }

        let file_name = source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let stem = match file_name.rfind('.') {
            Some(dot) if dot > 0 => &file_name[..dot],
            _ => &file_name[..],
        };

        Ok(sanitize_identifier(stem))
    }
}

pub fn is_identifier(name: &str) -> bool {
    IDENTIFIER_RE.is_match(name)
}

/// Turns arbitrary text into a C identifier.
pub fn sanitize_identifier(text: &str) -> String {
    let mut name: String = text
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();

    if name.chars().next().map_or(true, |c| c.is_ascii_digit()) {
        name.insert(0, '_');
    }

    name
}

/// Checks that `path` names a C or C++ source or header file.
pub fn validate_target(path: &Path) -> Result<()> {
    if TARGET_EXTENSION_RE.is_match(&path.to_string_lossy()) {
        Ok(())
    } else {
        Err(EmbedError::InvalidTarget {
            path: path.to_path_buf(),
        })
    }
}
