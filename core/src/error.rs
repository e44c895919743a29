//! Failure taxonomy for content resolution.

use std::path::PathBuf;

use thiserror::Error;

/// Coarse classification used by callers that map failures onto transport status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Forbidden,
    NotFound,
    Io,
}

#[derive(Debug, Error)]
pub enum ResolveError {
    /// The folder is on the exclusion list or is a hidden entry.
    #[error("folder not allowed: {0}")]
    Forbidden(String),

    #[error("folder not found: {0}")]
    FolderNotFound(String),

    #[error("file not found: {file} in {folder}")]
    FileNotFound { folder: String, file: String },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ResolveError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ResolveError::Forbidden(_) => ErrorKind::Forbidden,
            ResolveError::FolderNotFound(_) | ResolveError::FileNotFound { .. } => {
                ErrorKind::NotFound
            }
            ResolveError::Io { .. } => ErrorKind::Io,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ResolveError::Io { path: path.into(), source }
    }
}
