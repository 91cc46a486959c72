use crate::domain::{
    errors::RecordResult,
    models::{EntityDetails, Record},
    value_objects::Identifier,
};
use async_trait::async_trait;

/// Port for single-record operations on records of kind `D`
#[async_trait]
pub trait RecordService<D: EntityDetails>: Send + Sync + 'static {
    /// Validate a draft, allocate an identifier and persist the record
    async fn create(&self, draft: D::Draft) -> RecordResult<Record<D>>;

    /// Get a record by identifier
    async fn get(&self, identifier: Identifier) -> RecordResult<Record<D>>;

    /// All records ascending by identifier, attachment bytes stripped
    async fn list(&self) -> RecordResult<Vec<Record<D>>>;

    /// Replace all details of a record; the attachment is kept
    async fn update(&self, identifier: Identifier, draft: D::Draft) -> RecordResult<Record<D>>;

    /// Merge the fields present in `patch`
    async fn partial_update(&self, identifier: Identifier, patch: D::Patch)
        -> RecordResult<Record<D>>;

    /// Delete a record
    async fn delete(&self, identifier: Identifier) -> RecordResult<()>;
}
