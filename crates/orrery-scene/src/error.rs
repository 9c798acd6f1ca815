//! Errors raised while loading a body table.

use std::path::PathBuf;

/// Errors that can occur when loading or validating a [`SystemTable`](crate::SystemTable).
#[derive(Debug, thiserror::Error)]
pub enum SystemError {
    /// The table file could not be read.
    #[error("failed to read system table {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The table file is not valid RON.
    #[error("failed to parse system table: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// A body has dimensions the scene cannot be built from.
    #[error("invalid body `{body}`: {reason}")]
    InvalidBody { body: String, reason: String },
}
