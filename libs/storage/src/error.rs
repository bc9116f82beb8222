use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("failed to create directory {}: {source}", .path.display())]
    DirectoryCreation {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("directory {} contains sub-directory {}", .path.display(), .entry.display())]
    NonEmptyDirectory { path: PathBuf, entry: PathBuf },

    #[error("invalid records directory name {name:?}: {reason}")]
    TimestampParse { name: String, reason: String },

    #[error("failed to read directory {}: {source}", .path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to remove {}: {source}", .path.display())]
    Remove {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to access session metadata {}: {source}", .path.display())]
    MetadataIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid session metadata {}: {source}", .path.display())]
    MetadataJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, StorageError>;
