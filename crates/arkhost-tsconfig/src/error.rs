//! Errors raised while loading and resolving configuration files.
//!
//! Every variant here is recoverable by design: the resolver substitutes an
//! empty contribution for the failing node and the editor session keeps
//! working on a broken configuration. Callers that want the detail (the
//! options manager, tests) receive the structured error; the resolver itself
//! logs it and moves on.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors produced while reading or parsing configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration text was not valid JSON after comment stripping.
    #[error("configuration file '{path}' is not valid JSON: {source}")]
    Parse {
        /// File that failed to parse.
        path: Utf8PathBuf,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// An `extends` reference did not resolve to a file on disk.
    #[error("extended configuration '{reference}' was not found from '{referrer}'")]
    NotFound {
        /// Reference as written in the `extends` field.
        reference: String,
        /// File containing the reference.
        referrer: Utf8PathBuf,
    },

    /// A configuration file re-entered its own `extends` chain.
    #[error("configuration '{path}' extends itself through its inheritance chain")]
    CyclicExtends {
        /// File at which the cycle was detected.
        path: Utf8PathBuf,
    },

    /// Reading a configuration file from disk failed.
    #[error("failed to read configuration file '{path}': {source}")]
    Io {
        /// File that could not be read.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl ConfigError {
    /// Wraps a JSON parse failure for the given file.
    pub(crate) fn parse(path: impl Into<Utf8PathBuf>, source: serde_json::Error) -> Self {
        Self::Parse {
            path: path.into(),
            source,
        }
    }

    /// Wraps an I/O failure for the given file.
    pub(crate) fn io(path: impl Into<Utf8PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
