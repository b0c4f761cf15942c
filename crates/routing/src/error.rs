//! Routing error types

use thiserror::Error;

/// Result type for routing operations
pub type Result<T> = std::result::Result<T, RoutingError>;

/// Errors converting external tags into routing types
#[derive(Debug, Error)]
pub enum RoutingError {
    /// File-type index outside the fixed table
    #[error("unknown file type index {index}")]
    UnknownFileType {
        /// Index that was looked up
        index: u8,
    },

    /// File-type name not recognised
    #[error("unknown file type '{name}'")]
    UnknownFileTypeName {
        /// Name that was parsed
        name: String,
    },
}

impl RoutingError {
    #[inline]
    pub fn unknown_file_type(index: u8) -> Self {
        Self::UnknownFileType { index }
    }

    #[inline]
    pub fn unknown_file_type_name(name: impl Into<String>) -> Self {
        Self::UnknownFileTypeName { name: name.into() }
    }
}
