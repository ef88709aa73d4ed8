use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Every way a `FileStore` operation can fail.
///
/// All variants are terminal for the operation that produced them; the store
/// never retries internally. Variants backed by an I/O failure carry the path
/// that was being touched and the original `io::Error` as their source.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The parent directory of the target could not be created.
    #[error("failed to provision directory {}", path.display())]
    DirectoryProvisionFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The target could not be opened or written by `create`.
    #[error("unable to write file {}", path.display())]
    FileUnwritable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The target could not be opened, read, or decoded as text.
    #[error("unable to read file {}", path.display())]
    FileUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// `update` was asked to rewrite a file that does not exist.
    #[error("file not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    /// The temporary replacement file could not be created or fully written.
    #[error("failed to write temporary file {}", path.display())]
    TemporaryWriteFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The finished temporary file could not be installed over the target.
    #[error("failed to replace {} with {}", path.display(), temp_path.display())]
    ReplaceFailed {
        path: PathBuf,
        temp_path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The target could not be removed.
    #[error("unable to delete file {}", path.display())]
    DeleteFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// `update` was called with an empty search string.
    #[error("search text must not be empty")]
    EmptySearchText,

    /// The path cannot name a file (for example, a filesystem root).
    #[error("invalid target path {}: {}", path.display(), reason)]
    InvalidPath { path: PathBuf, reason: String },
}

impl StoreError {
    pub(crate) fn unreadable(path: &Path, source: io::Error) -> Self {
        Self::FileUnreadable {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn unwritable(path: &Path, source: io::Error) -> Self {
        Self::FileUnwritable {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn temporary_write(path: &Path, source: io::Error) -> Self {
        Self::TemporaryWriteFailed {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Whether this error means the target file was absent.
    pub fn is_missing_file(&self) -> bool {
        match self {
            Self::FileNotFound { .. } => true,
            Self::FileUnreadable { source, .. } | Self::DeleteFailed { source, .. } => {
                source.kind() == io::ErrorKind::NotFound
            }
            _ => false,
        }
    }
}

/// Result alias used throughout the store.
pub type Result<T> = std::result::Result<T, StoreError>;
