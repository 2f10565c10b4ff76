//! Errors raised while staging SDK declarations.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors produced by declaration staging.
///
/// Unlike configuration resolution, staging runs off the editor's request
/// path, so failures propagate to the caller instead of degrading silently.
#[derive(Debug, Error)]
pub enum DeclarationsError {
    /// A source or destination path could not be read or written.
    #[error("failed to access '{path}': {source}")]
    Io {
        /// Path involved in the failing operation.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A staged path was not valid UTF-8.
    #[error("path under '{parent}' is not valid UTF-8")]
    NonUtf8Path {
        /// Directory containing the offending entry.
        parent: Utf8PathBuf,
    },

    /// The generated configuration could not be serialised.
    #[error("failed to serialise generated configuration: {0}")]
    Serialize(#[source] serde_json::Error),
}

impl DeclarationsError {
    /// Wraps an I/O failure for the given path.
    pub(crate) fn io(path: impl Into<Utf8PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
