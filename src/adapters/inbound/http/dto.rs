use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::domain::{
    errors::{ErrorKind, RecordError},
    models::{Attachment, BulkDeleteReport, BulkUpdateReport, ItemFailure, Record},
    value_objects::{Identifier, RecordKey},
};

/// DTO for a stored record; details are inlined next to the bookkeeping fields
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordDto<D> {
    pub identifier: Identifier,
    pub key: RecordKey,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub details: D,
    pub id_proof: AttachmentSummaryDto,
}

/// DTO for identity-proof metadata, without the bytes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttachmentSummaryDto {
    pub content_type: String,
    pub size: u64,
    pub etag: Option<String>,
    pub uploaded_at: Option<DateTime<Utc>>,
    pub revision: u32,
}

/// DTO returned after an identity-proof upload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdProofUploadResponseDto {
    pub message: String,
    pub original_name: Option<String>,
    pub content_type: String,
    pub size: u64,
    pub etag: Option<String>,
    pub revision: u32,
}

/// DTO for bulk delete requests
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkDeleteRequestDto {
    pub identifiers: Vec<Identifier>,
}

/// DTO for bulk delete results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkDeleteResponseDto {
    pub deleted_count: u64,
    pub not_found: Vec<Identifier>,
}

/// DTO for bulk update results
#[derive(Debug, Clone, Serialize)]
pub struct BulkUpdateResponseDto {
    pub success_count: u64,
    pub failed_identifiers: Vec<Identifier>,
    pub not_found: Vec<Identifier>,
    pub failures: Vec<ItemFailure>,
}

/// DTO for error responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponseDto {
    /// Stable error kind, e.g. `invalid_field`
    pub error: String,
    pub message: String,
    pub details: Option<HashMap<String, serde_json::Value>>,
    pub timestamp: DateTime<Utc>,
}

/// DTO for success responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuccessResponseDto {
    pub message: String,
    pub data: Option<serde_json::Value>,
    pub timestamp: DateTime<Utc>,
}

// Conversion implementations

impl<D> From<Record<D>> for RecordDto<D> {
    fn from(record: Record<D>) -> Self {
        RecordDto {
            identifier: record.identifier,
            key: record.key,
            created_at: record.created_at,
            details: record.details,
            id_proof: record.attachment.into(),
        }
    }
}

impl From<Attachment> for AttachmentSummaryDto {
    fn from(attachment: Attachment) -> Self {
        AttachmentSummaryDto {
            content_type: attachment.content_type.as_mime().to_string(),
            size: attachment.size,
            etag: attachment.etag,
            uploaded_at: attachment.uploaded_at,
            revision: attachment.revision,
        }
    }
}

impl From<BulkDeleteReport> for BulkDeleteResponseDto {
    fn from(report: BulkDeleteReport) -> Self {
        BulkDeleteResponseDto {
            deleted_count: report.deleted_count,
            not_found: report.not_found,
        }
    }
}

impl From<BulkUpdateReport> for BulkUpdateResponseDto {
    fn from(report: BulkUpdateReport) -> Self {
        BulkUpdateResponseDto {
            success_count: report.success_count(),
            failed_identifiers: report.failed_identifiers(),
            not_found: report.not_found,
            failures: report.failures,
        }
    }
}

impl From<ErrorKind> for StatusCode {
    fn from(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::InvalidInput
            | ErrorKind::InvalidField
            | ErrorKind::InvalidReference
            | ErrorKind::InvalidAttachment => StatusCode::BAD_REQUEST,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// Error response helpers

impl ErrorResponseDto {
    pub fn from_record_error(error: &RecordError) -> Self {
        let mut details = HashMap::new();

        match error {
            RecordError::InvalidField { index, error, .. } => {
                details.insert(
                    "field".to_string(),
                    serde_json::Value::String(error.field().to_string()),
                );
                if let Some(index) = index {
                    details.insert("index".to_string(), serde_json::Value::from(*index));
                }
            }
            RecordError::InvalidAttachment {
                index: Some(index), ..
            } => {
                details.insert("index".to_string(), serde_json::Value::from(*index));
            }
            RecordError::InvalidReference { references } => {
                details.insert(
                    "references".to_string(),
                    serde_json::Value::Array(
                        references
                            .iter()
                            .map(|r| {
                                serde_json::json!({
                                    "index": r.index,
                                    "key": r.key.to_string(),
                                })
                            })
                            .collect(),
                    ),
                );
            }
            RecordError::NotFound { identifier, .. }
            | RecordError::AttachmentNotFound { identifier, .. } => {
                details.insert(
                    "identifier".to_string(),
                    serde_json::Value::from(identifier.value()),
                );
            }
            _ => {}
        }

        ErrorResponseDto {
            error: error.kind().as_str().to_string(),
            message: error.to_string(),
            details: if details.is_empty() {
                None
            } else {
                Some(details)
            },
            timestamp: Utc::now(),
        }
    }

    pub fn bad_request(message: &str) -> Self {
        ErrorResponseDto {
            error: ErrorKind::InvalidInput.as_str().to_string(),
            message: message.to_string(),
            details: None,
            timestamp: Utc::now(),
        }
    }
}

impl SuccessResponseDto {
    pub fn new(message: &str) -> Self {
        SuccessResponseDto {
            message: message.to_string(),
            data: None,
            timestamp: Utc::now(),
        }
    }

    pub fn with_data(message: &str, data: serde_json::Value) -> Self {
        SuccessResponseDto {
            message: message.to_string(),
            data: Some(data),
            timestamp: Utc::now(),
        }
    }
}
