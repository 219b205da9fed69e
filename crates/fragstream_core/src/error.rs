//! Error types for fragstream core.

use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in fragstream core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Fragment store error.
    #[error("storage error: {0}")]
    Storage(#[from] fragstream_storage::StorageError),

    /// An incoming record could not be interpreted.
    ///
    /// This is fatal for the offending record only; ingestion of
    /// subsequent records continues.
    #[error("malformed record: {message}")]
    MalformedRecord {
        /// Description of what was wrong with the record.
        message: String,
    },

    /// A file in the store does not follow the fragment naming scheme.
    #[error("bad fragment name: {name}")]
    BadFragmentName {
        /// The offending file name.
        name: String,
    },

    /// Internal state does not permit the operation.
    #[error("invalid state: {message}")]
    InvalidState {
        /// Description of the state violation.
        message: String,
    },
}

impl CoreError {
    /// Creates a malformed-record error.
    pub fn malformed_record(message: impl Into<String>) -> Self {
        Self::MalformedRecord {
            message: message.into(),
        }
    }

    /// Creates a bad-fragment-name error.
    pub fn bad_fragment_name(name: impl Into<String>) -> Self {
        Self::BadFragmentName { name: name.into() }
    }

    /// Creates an invalid-state error.
    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState {
            message: message.into(),
        }
    }
}
