use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, EmbedError>;

#[derive(Debug, thiserror::Error)]
pub enum EmbedError {
    /// I/O failure while reading or rewriting one of the files involved
    #[error("i/o error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The source file could not be opened for reading
    #[error("failed to open {path:?}: {source}")]
    SourceUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The target does not look like a C or C++ source/header file
    #[error("{path:?} is not a valid C or header file")]
    InvalidTarget { path: PathBuf },

    /// The variable name is not usable as a C identifier
    #[error("{name:?} is not a valid variable name")]
    InvalidVariableName { name: String },

    /// The temporary staging area could not be created
    #[error("failed to create a temporary staging file: {0}")]
    Staging(#[source] std::io::Error),

    /// Diagnostics could not be written out
    #[error("failed to write report: {0}")]
    Report(#[source] std::io::Error),
}

impl EmbedError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        EmbedError::Io {
            path: path.into(),
            source,
        }
    }

    /// Process exit status for this class of failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            EmbedError::Io { .. }
            | EmbedError::SourceUnreadable { .. }
            | EmbedError::Staging(_)
            | EmbedError::Report(_) => 1,
            EmbedError::InvalidTarget { .. } => 2,
            EmbedError::InvalidVariableName { .. } => 4,
        }
    }
}
