//! Error types and handling for BatchResize

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias for BatchResize operations
pub type Result<T> = std::result::Result<T, BatchResizeError>;

/// Main error type for BatchResize operations
///
/// Every variant is fatal for a batch run: the engine never catches an
/// error per file, so the first one ends the run.
#[derive(Debug, Error)]
pub enum BatchResizeError {
    /// I/O related errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The input directory could not be listed
    #[error("Cannot read directory {path:?}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A directory entry could not be inspected
    #[error("Cannot stat {path:?}: {source}")]
    Metadata {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The output directory could not be created
    #[error("Cannot create directory {path:?}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An image matching a recognized extension failed to open or decode
    #[error("Failed to decode image {path:?}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// A resized image could not be written
    #[error("Failed to save image {path:?}: {source}")]
    Save {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Invalid resize parameters
    #[error("Invalid resize parameters: {message}")]
    InvalidParameters { message: String },

    /// A blocking worker task was cancelled or panicked
    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl BatchResizeError {
    /// Create a new directory listing error
    pub fn read_dir(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ReadDir {
            path: path.into(),
            source,
        }
    }

    /// Create a new entry metadata error
    pub fn metadata(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Metadata {
            path: path.into(),
            source,
        }
    }

    /// Create a new directory creation error
    pub fn create_dir(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::CreateDir {
            path: path.into(),
            source,
        }
    }

    /// Create a new decode error
    pub fn decode(path: impl Into<PathBuf>, source: image::ImageError) -> Self {
        Self::Decode {
            path: path.into(),
            source,
        }
    }

    /// Create a new save error
    pub fn save(path: impl Into<PathBuf>, source: image::ImageError) -> Self {
        Self::Save {
            path: path.into(),
            source,
        }
    }

    /// Create a new invalid parameters error
    pub fn invalid_parameters<S: Into<String>>(message: S) -> Self {
        Self::InvalidParameters {
            message: message.into(),
        }
    }

    /// Get the associated path if available
    pub fn file_path(&self) -> Option<&Path> {
        match self {
            Self::ReadDir { path, .. }
            | Self::Metadata { path, .. }
            | Self::CreateDir { path, .. }
            | Self::Decode { path, .. }
            | Self::Save { path, .. } => Some(path.as_path()),

            _ => None,
        }
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Self::Io(e) => format!("File system error: {}", e),
            Self::ReadDir { path, source } => {
                format!("Input folder {} could not be read: {}", path.display(), source)
            }
            Self::Metadata { path, source } => {
                format!("{} could not be inspected: {}", path.display(), source)
            }
            Self::CreateDir { path, source } => {
                format!("Output folder {} could not be created: {}", path.display(), source)
            }
            Self::Decode { path, source } => {
                format!("{} is not a readable image: {}", path.display(), source)
            }
            Self::Save { path, source } => {
                format!("Could not write {}: {}", path.display(), source)
            }
            other => other.to_string(),
        }
    }
}
