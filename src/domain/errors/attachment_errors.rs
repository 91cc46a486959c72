/// Reasons an identity-proof upload is rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttachmentError {
    /// Declared size is above the allowed maximum
    TooLarge { size: u64, max: u64 },

    /// Content type is not on the allow-list
    UnsupportedContentType(String),

    /// Payload carries no bytes
    Empty,

    /// Declared size does not match the received payload
    SizeMismatch { declared: u64, actual: u64 },
}

impl std::fmt::Display for AttachmentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttachmentError::TooLarge { size, max } => {
                write!(
                    f,
                    "File size {} bytes exceeds the limit of {} bytes",
                    size, max
                )
            }
            AttachmentError::UnsupportedContentType(content_type) => {
                write!(
                    f,
                    "Content type '{}' is not allowed. Only JPEG, PNG, GIF, WebP, and PDF formats are allowed",
                    content_type
                )
            }
            AttachmentError::Empty => write!(f, "Uploaded file is empty"),
            AttachmentError::SizeMismatch { declared, actual } => {
                write!(
                    f,
                    "Declared size {} bytes does not match received {} bytes",
                    declared, actual
                )
            }
        }
    }
}

impl std::error::Error for AttachmentError {}
