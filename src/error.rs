//! Error types returned by the scaffolding operations.

use std::fmt;
use std::path::Path;

use thiserror::Error;

/// Backend step that failed.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Op {
    Mkdir,
    Create,
    Write,
    Read,
    Open,
    Stat,
    Walk,
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Op::Mkdir => "mkdir",
            Op::Create => "create",
            Op::Write => "write",
            Op::Read => "read",
            Op::Open => "open",
            Op::Stat => "stat",
            Op::Walk => "walk",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum ScaffoldError {
    /// A backing-store call failed. `source` is the backend error, unchanged.
    #[error("{op} failed for '{path}': {source}")]
    Io {
        op: Op,
        path: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("invalid path: {0:?}")]
    InvalidPath(String),

    #[error("path conflict: '{file}' is a file and a parent directory of '{nested}'")]
    PathConflict { file: String, nested: String },

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("logging setup failed: {0}")]
    Logging(String),
}

impl ScaffoldError {
    /// `path` is kept in displayable form; non-UTF-8 bytes are replaced.
    pub(crate) fn io<P: AsRef<Path>>(op: Op, path: P, source: anyhow::Error) -> Self {
        ScaffoldError::Io {
            op,
            path: path.as_ref().display().to_string(),
            source,
        }
    }

    /// The failed backend step, if this is an I/O failure.
    pub fn op(&self) -> Option<Op> {
        match self {
            ScaffoldError::Io { op, .. } => Some(*op),
            _ => None,
        }
    }

    /// The underlying `std::io::Error`, if the backend reported one.
    pub fn io_error(&self) -> Option<&std::io::Error> {
        match self {
            ScaffoldError::Io { source, .. } => source.downcast_ref::<std::io::Error>(),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ScaffoldError>;
