use crate::domain::{
    errors::{AttachmentError, StoreError, ValidationError},
    models::EntityKind,
    value_objects::{Identifier, RecordKey},
};

/// Stable error classification, independent of the message text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidInput,
    InvalidField,
    InvalidReference,
    InvalidAttachment,
    NotFound,
    Conflict,
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidInput => "invalid_input",
            ErrorKind::InvalidField => "invalid_field",
            ErrorKind::InvalidReference => "invalid_reference",
            ErrorKind::InvalidAttachment => "invalid_attachment",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Conflict => "conflict",
            ErrorKind::Internal => "internal",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An owner reference that did not resolve, with the batch position when known
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DanglingReference {
    pub index: Option<usize>,
    pub key: RecordKey,
}

/// Errors returned by record, bulk and attachment operations
#[derive(Debug, Clone)]
pub enum RecordError {
    /// Malformed or empty batch
    InvalidInput { message: String },

    /// Domain constraint violated by a field
    InvalidField {
        kind: EntityKind,
        index: Option<usize>,
        error: ValidationError,
    },

    /// Owner reference points at no existing recipient
    InvalidReference { references: Vec<DanglingReference> },

    /// Identity proof rejected before persistence
    InvalidAttachment {
        index: Option<usize>,
        error: AttachmentError,
    },

    /// No record with this identifier
    NotFound {
        kind: EntityKind,
        identifier: Identifier,
    },

    /// Record exists but carries no identity proof
    AttachmentNotFound {
        kind: EntityKind,
        identifier: Identifier,
    },

    /// Identifier allocation kept colliding with concurrent writers
    Conflict { kind: EntityKind, attempts: u32 },

    /// Unexpected store failure
    Internal { message: String },
}

impl RecordError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RecordError::InvalidInput { .. } => ErrorKind::InvalidInput,
            RecordError::InvalidField { .. } => ErrorKind::InvalidField,
            RecordError::InvalidReference { .. } => ErrorKind::InvalidReference,
            RecordError::InvalidAttachment { .. } => ErrorKind::InvalidAttachment,
            RecordError::NotFound { .. } | RecordError::AttachmentNotFound { .. } => {
                ErrorKind::NotFound
            }
            RecordError::Conflict { .. } => ErrorKind::Conflict,
            RecordError::Internal { .. } => ErrorKind::Internal,
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        RecordError::InvalidInput {
            message: message.into(),
        }
    }

    pub fn invalid_field(kind: EntityKind, error: ValidationError) -> Self {
        RecordError::InvalidField {
            kind,
            index: None,
            error,
        }
    }

    /// Attach a batch position to a validation failure
    pub fn at_index(self, position: usize) -> Self {
        match self {
            RecordError::InvalidField { kind, error, .. } => RecordError::InvalidField {
                kind,
                index: Some(position),
                error,
            },
            RecordError::InvalidAttachment { error, .. } => RecordError::InvalidAttachment {
                index: Some(position),
                error,
            },
            RecordError::InvalidReference { references } => RecordError::InvalidReference {
                references: references
                    .into_iter()
                    .map(|r| DanglingReference {
                        index: Some(position),
                        key: r.key,
                    })
                    .collect(),
            },
            other => other,
        }
    }
}

impl std::fmt::Display for RecordError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordError::InvalidInput { message } => write!(f, "Invalid input: {}", message),
            RecordError::InvalidField { kind, index, error } => match index {
                Some(index) => write!(f, "Invalid {} at item {}: {}", kind, index, error),
                None => write!(f, "Invalid {}: {}", kind, error),
            },
            RecordError::InvalidReference { references } => {
                let listed: Vec<String> = references
                    .iter()
                    .map(|r| match r.index {
                        Some(index) => format!("{} (item {})", r.key, index),
                        None => r.key.to_string(),
                    })
                    .collect();
                write!(f, "Recipient does not exist: {}", listed.join(", "))
            }
            RecordError::InvalidAttachment { index, error } => match index {
                Some(index) => write!(f, "Invalid ID proof at item {}: {}", index, error),
                None => write!(f, "Invalid ID proof: {}", error),
            },
            RecordError::NotFound { kind, identifier } => {
                write!(
                    f,
                    "{} with {} {} not found",
                    kind.title(),
                    kind.identifier_label(),
                    identifier
                )
            }
            RecordError::AttachmentNotFound { kind, identifier } => {
                write!(
                    f,
                    "ID proof not found for {} with {} {}",
                    kind,
                    kind.identifier_label(),
                    identifier
                )
            }
            RecordError::Conflict { kind, attempts } => {
                write!(
                    f,
                    "Could not allocate a unique {} after {} attempts",
                    kind.identifier_label(),
                    attempts
                )
            }
            RecordError::Internal { message } => write!(f, "Internal error: {}", message),
        }
    }
}

impl std::error::Error for RecordError {}

impl From<StoreError> for RecordError {
    fn from(err: StoreError) -> Self {
        RecordError::Internal {
            message: err.to_string(),
        }
    }
}

/// Result type for record operations
pub type RecordResult<T> = Result<T, RecordError>;
