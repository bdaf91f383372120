//! Error types shared by the library and the binary

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BrowserError {
    /// The directory argument is missing, not a directory, or unreadable
    #[error("Directory {} does not exist or could not be read", .0.display())]
    DirectoryUnreadable(PathBuf),

    /// An image file could not be opened
    #[error("Failed to open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// An image file was opened but could not be decoded
    #[error("Failed to decode {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// The background decode task panicked or was cancelled
    #[error("Load task for {} did not complete: {reason}", path.display())]
    TaskFailed { path: PathBuf, reason: String },

    #[error("Logging setup failed: {0}")]
    Logging(String),

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, BrowserError>;
