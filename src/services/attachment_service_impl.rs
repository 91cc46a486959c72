use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info};

use crate::{
    domain::{
        errors::{RecordError, RecordResult},
        models::{AttachmentContent, AttachmentUpload, EntityDetails, Record, RecordFilter, RecordUpdate},
        value_objects::Identifier,
    },
    ports::{services::AttachmentService, storage::DocumentStore},
};

/// Implementation of AttachmentService; touches only the attachment sub-record
#[derive(Clone)]
pub struct AttachmentServiceImpl<D: EntityDetails> {
    store: Arc<dyn DocumentStore<D>>,
}

impl<D: EntityDetails> AttachmentServiceImpl<D> {
    /// Create a new AttachmentServiceImpl instance
    pub fn new(store: Arc<dyn DocumentStore<D>>) -> Self {
        Self { store }
    }

    fn not_found(identifier: Identifier) -> RecordError {
        RecordError::NotFound {
            kind: D::KIND,
            identifier,
        }
    }
}

#[async_trait]
impl<D: EntityDetails> AttachmentService<D> for AttachmentServiceImpl<D> {
    async fn upload(
        &self,
        identifier: Identifier,
        upload: AttachmentUpload,
    ) -> RecordResult<Record<D>> {
        let attachment = upload
            .to_attachment(Utc::now())
            .map_err(|error| RecordError::InvalidAttachment { index: None, error })?;

        let record = self
            .store
            .update_one(
                &RecordFilter::ByIdentifier(identifier),
                &RecordUpdate::SetAttachment(attachment),
            )
            .await?
            .ok_or_else(|| Self::not_found(identifier))?;

        info!(
            kind = %D::KIND,
            identifier = %identifier,
            content_type = %record.attachment.content_type,
            size = record.attachment.size,
            revision = record.attachment.revision,
            "Stored ID proof"
        );
        Ok(record.without_attachment_data())
    }

    async fn get(&self, identifier: Identifier) -> RecordResult<AttachmentContent> {
        let record = self
            .store
            .find_one(&RecordFilter::ByIdentifier(identifier))
            .await?
            .ok_or_else(|| Self::not_found(identifier))?;

        if !record.attachment.is_present() {
            return Err(RecordError::AttachmentNotFound {
                kind: D::KIND,
                identifier,
            });
        }

        debug!(kind = %D::KIND, identifier = %identifier, "Serving ID proof");
        Ok(record.attachment.into())
    }

    async fn clear(&self, identifier: Identifier) -> RecordResult<Record<D>> {
        let record = self
            .store
            .update_one(
                &RecordFilter::ByIdentifier(identifier),
                &RecordUpdate::ClearAttachment,
            )
            .await?
            .ok_or_else(|| Self::not_found(identifier))?;

        info!(
            kind = %D::KIND,
            identifier = %identifier,
            revision = record.attachment.revision,
            "Cleared ID proof"
        );
        Ok(record)
    }
}
