use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::errors::AttachmentError;

/// Largest identity proof accepted, in bytes (5 MiB)
pub const MAX_ATTACHMENT_SIZE: u64 = 5 * 1024 * 1024;

/// Content type of an identity proof, including the "nothing attached" sentinel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AttachmentType {
    #[serde(rename = "image/jpeg")]
    Jpeg,
    #[serde(rename = "image/png")]
    Png,
    #[serde(rename = "image/gif")]
    Gif,
    #[serde(rename = "image/webp")]
    Webp,
    #[serde(rename = "application/pdf")]
    Pdf,
    #[default]
    #[serde(rename = "No IDProof")]
    Absent,
}

impl AttachmentType {
    /// Types an upload may declare
    pub const ALLOWED: [AttachmentType; 5] = [
        AttachmentType::Jpeg,
        AttachmentType::Png,
        AttachmentType::Gif,
        AttachmentType::Webp,
        AttachmentType::Pdf,
    ];

    /// Parse a MIME type from the allow-list; parameters such as `; charset` are ignored
    pub fn from_mime(value: &str) -> Option<Self> {
        let essence = value
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        match essence.as_str() {
            "image/jpeg" | "image/jpg" => Some(AttachmentType::Jpeg),
            "image/png" => Some(AttachmentType::Png),
            "image/gif" => Some(AttachmentType::Gif),
            "image/webp" => Some(AttachmentType::Webp),
            "application/pdf" => Some(AttachmentType::Pdf),
            _ => None,
        }
    }

    pub fn as_mime(&self) -> &'static str {
        match self {
            AttachmentType::Jpeg => "image/jpeg",
            AttachmentType::Png => "image/png",
            AttachmentType::Gif => "image/gif",
            AttachmentType::Webp => "image/webp",
            AttachmentType::Pdf => "application/pdf",
            AttachmentType::Absent => "No IDProof",
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, AttachmentType::Absent)
    }
}

impl std::fmt::Display for AttachmentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_mime())
    }
}

/// Identity-proof sub-record stored on an entity
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Attachment {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub data: Vec<u8>,
    pub content_type: AttachmentType,
    pub size: u64,
    pub etag: Option<String>,
    pub uploaded_at: Option<DateTime<Utc>>,
    /// Bumped by every upload and every clear of a present attachment
    pub revision: u32,
}

impl Attachment {
    pub fn is_present(&self) -> bool {
        !self.content_type.is_absent()
    }

    /// Replace this attachment with `next`, advancing the revision
    pub fn replace_with(&mut self, next: &Attachment) {
        let revision = self.revision + 1;
        *self = Attachment {
            revision,
            ..next.clone()
        };
    }

    /// Reset to the absent sentinel; no-op when nothing is attached
    pub fn clear(&mut self) {
        if self.is_present() {
            let revision = self.revision + 1;
            *self = Attachment {
                revision,
                ..Attachment::default()
            };
        }
    }
}

/// Already-decoded upload handed over by the transport layer
#[derive(Debug, Clone, PartialEq)]
pub struct AttachmentUpload {
    pub bytes: Vec<u8>,
    pub original_name: Option<String>,
    pub content_type: String,
    pub declared_size: u64,
}

impl AttachmentUpload {
    /// Upload whose declared size is the payload length
    pub fn new(bytes: Vec<u8>, content_type: impl Into<String>) -> Self {
        let declared_size = bytes.len() as u64;
        Self {
            bytes,
            original_name: None,
            content_type: content_type.into(),
            declared_size,
        }
    }

    pub fn with_original_name(mut self, name: impl Into<String>) -> Self {
        self.original_name = Some(name.into());
        self
    }

    pub fn with_declared_size(mut self, size: u64) -> Self {
        self.declared_size = size;
        self
    }

    /// Check size and type limits, returning the accepted content type
    pub fn validate(&self) -> Result<AttachmentType, AttachmentError> {
        if self.declared_size > MAX_ATTACHMENT_SIZE {
            return Err(AttachmentError::TooLarge {
                size: self.declared_size,
                max: MAX_ATTACHMENT_SIZE,
            });
        }

        let content_type = AttachmentType::from_mime(&self.content_type)
            .ok_or_else(|| AttachmentError::UnsupportedContentType(self.content_type.clone()))?;

        if self.bytes.is_empty() {
            return Err(AttachmentError::Empty);
        }

        let actual = self.bytes.len() as u64;
        if actual != self.declared_size {
            return Err(AttachmentError::SizeMismatch {
                declared: self.declared_size,
                actual,
            });
        }

        Ok(content_type)
    }

    /// Validate and build the sub-record to store
    pub fn to_attachment(&self, uploaded_at: DateTime<Utc>) -> Result<Attachment, AttachmentError> {
        let content_type = self.validate()?;
        Ok(Attachment {
            etag: Some(format!("{:x}", md5::compute(&self.bytes))),
            data: self.bytes.clone(),
            content_type,
            size: self.declared_size,
            uploaded_at: Some(uploaded_at),
            revision: 0,
        })
    }
}

/// Identity-proof payload returned to callers
#[derive(Debug, Clone, PartialEq)]
pub struct AttachmentContent {
    pub bytes: Vec<u8>,
    pub content_type: AttachmentType,
    pub size: u64,
    pub etag: Option<String>,
    pub revision: u32,
}

impl From<Attachment> for AttachmentContent {
    fn from(attachment: Attachment) -> Self {
        AttachmentContent {
            bytes: attachment.data,
            content_type: attachment.content_type,
            size: attachment.size,
            etag: attachment.etag,
            revision: attachment.revision,
        }
    }
}
