//! Error handling types for vdoc-bridge
//!
//! Absence of an embedded language is never an error; these variants cover
//! materializing virtual documents and loading configuration.

use std::path::PathBuf;
use thiserror::Error;

/// Error type for virtual document operations
#[derive(Debug, Error)]
pub enum VdocError {
    /// Filesystem operation on a virtual document backing file failed
    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A uri for a virtual document could not be built or interpreted
    #[error("Invalid uri: {message}")]
    InvalidUri { message: String },

    /// Configuration error
    #[error("Invalid configuration: {message}")]
    Config { message: String },
}

/// Result type for virtual document operations
pub type VdocResult<T> = Result<T, VdocError>;

/// Helper functions for common error patterns
impl VdocError {
    /// Create an IO error tagged with the path it happened on
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        VdocError::Io {
            path: path.into(),
            source,
        }
    }

    /// Create an invalid uri error
    pub fn invalid_uri(message: impl Into<String>) -> Self {
        VdocError::InvalidUri {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        VdocError::Config {
            message: message.into(),
        }
    }
}
