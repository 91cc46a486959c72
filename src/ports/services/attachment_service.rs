use crate::domain::{
    errors::RecordResult,
    models::{AttachmentContent, AttachmentUpload, EntityDetails, Record},
    value_objects::Identifier,
};
use async_trait::async_trait;

/// Port for the identity-proof sub-resource of records of kind `D`
#[async_trait]
pub trait AttachmentService<D: EntityDetails>: Send + Sync + 'static {
    /// Validate and store an identity proof, replacing any previous one
    async fn upload(&self, identifier: Identifier, upload: AttachmentUpload)
        -> RecordResult<Record<D>>;

    /// Fetch the stored identity proof
    async fn get(&self, identifier: Identifier) -> RecordResult<AttachmentContent>;

    /// Reset the identity proof to the absent sentinel
    async fn clear(&self, identifier: Identifier) -> RecordResult<Record<D>>;
}
