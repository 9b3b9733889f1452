//! Error types for the client-session crate.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Failures raised by a [`crate::SessionStore`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The backing file could not be read.
    #[error("failed to read session store at '{path}': {message}")]
    Read {
        /// Path of the store file, relative to its directory.
        path: Utf8PathBuf,
        /// Description of the I/O error.
        message: String,
    },

    /// The backing file holds something other than a JSON string map.
    #[error("session store at '{path}' is corrupt: {message}")]
    Corrupt {
        /// Path of the store file, relative to its directory.
        path: Utf8PathBuf,
        /// Description of the parse error.
        message: String,
    },

    /// The backing file could not be written.
    #[error("failed to write session store at '{path}': {message}")]
    Write {
        /// Path of the store file, relative to its directory.
        path: Utf8PathBuf,
        /// Description of the I/O error.
        message: String,
    },

    /// Any other storage failure, for custom stores.
    #[error("session store unavailable: {message}")]
    Unavailable {
        /// Description of the failure.
        message: String,
    },
}

/// Failures returned by [`crate::SessionManager`] operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// Persisting or clearing the session failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Expiry scheduling needs a Tokio runtime and none was running.
    #[error("session expiry requires a running Tokio runtime")]
    NoRuntime,

    /// The requested session lifetime cannot be represented.
    #[error("session lifetime is out of range")]
    LifetimeOutOfRange,
}
