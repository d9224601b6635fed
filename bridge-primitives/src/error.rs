//! Shared error definitions for bridge primitives.

use thiserror::Error;
use uuid::Error as UuidError;

/// Result alias used throughout the bridge.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while manipulating bridge primitive types.
#[derive(Debug, Error)]
pub enum Error {
    /// The provided subject identifier could not be parsed.
    #[error("invalid subject id: {source}")]
    InvalidSubjectId {
        /// Source parsing error from the UUID library.
        #[from]
        source: UuidError,
    },

    /// Tool name failed validation.
    #[error("invalid tool name `{name}`: {reason}")]
    InvalidToolName {
        /// The offending name.
        name: String,
        /// Human-readable reason for rejection.
        reason: String,
    },
}
