use crate::domain::value_objects::{Identifier, RecordKey};

/// Errors reported by a document store adapter
#[derive(Debug, Clone, thiserror::Error)]
pub enum StoreError {
    /// Unique identifier constraint rejected a write
    #[error("Identifier {identifier} already exists in collection '{collection}'")]
    DuplicateIdentifier {
        collection: &'static str,
        identifier: Identifier,
    },

    /// Unique persistent key constraint rejected a write
    #[error("Record key {key} already exists in collection '{collection}'")]
    DuplicateKey {
        collection: &'static str,
        key: RecordKey,
    },

    /// Document could not be encoded or decoded
    #[error("Serialization error in collection '{collection}': {message}")]
    Serialization {
        collection: &'static str,
        message: String,
    },

    /// Infrastructure error with external source
    #[error("Store backend error: {message}: {cause}")]
    Backend {
        message: String,
        cause: String, // Kept as a string to allow Clone
    },
}

impl StoreError {
    pub fn backend(message: impl Into<String>, cause: impl std::fmt::Display) -> Self {
        StoreError::Backend {
            message: message.into(),
            cause: cause.to_string(),
        }
    }

    pub fn is_duplicate_identifier(&self) -> bool {
        matches!(self, StoreError::DuplicateIdentifier { .. })
    }
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;
