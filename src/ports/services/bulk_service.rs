use crate::domain::{
    errors::RecordResult,
    models::{BulkDeleteReport, BulkUpdateItem, BulkUpdateReport, EntityDetails, Record},
    value_objects::Identifier,
};
use async_trait::async_trait;

/// Port for batch operations on records of kind `D`
#[async_trait]
pub trait BulkService<D: EntityDetails>: Send + Sync + 'static {
    /// Create all drafts with contiguous identifiers in input order, or none
    async fn bulk_create(&self, drafts: Vec<D::Draft>) -> RecordResult<Vec<Record<D>>>;

    /// Apply each patch independently and report per-item outcomes
    async fn bulk_update(
        &self,
        items: Vec<BulkUpdateItem<D::Patch>>,
    ) -> RecordResult<BulkUpdateReport>;

    /// Delete the requested identifiers that exist
    async fn bulk_delete(&self, identifiers: Vec<Identifier>) -> RecordResult<BulkDeleteReport>;

    /// Parse a JSON array of drafts and bulk create them
    async fn import_json(&self, bytes: &[u8]) -> RecordResult<Vec<Record<D>>>;
}
