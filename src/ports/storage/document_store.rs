use crate::domain::{
    errors::StoreResult,
    models::{EntityDetails, Record, RecordFilter, RecordUpdate},
    value_objects::Identifier,
};
use async_trait::async_trait;

/// Port for one document collection of records of kind `D`
///
/// Implementations must reject a second record with an identifier (or key)
/// already present by returning `StoreError::DuplicateIdentifier`
/// (`StoreError::DuplicateKey`), and must give read-your-write consistency.
#[async_trait]
pub trait DocumentStore<D: EntityDetails>: Send + Sync + 'static {
    /// Find the first record matching the filter
    async fn find_one(&self, filter: &RecordFilter) -> StoreResult<Option<Record<D>>>;

    /// Find all matching records, ascending by identifier
    async fn find_many(&self, filter: &RecordFilter) -> StoreResult<Vec<Record<D>>>;

    /// Largest identifier in the collection, `None` when empty
    async fn find_max_identifier(&self) -> StoreResult<Option<Identifier>>;

    /// Insert a single record
    async fn insert_one(&self, record: Record<D>) -> StoreResult<Record<D>>;

    /// Insert a batch; either every record is stored or none is
    async fn insert_many(&self, records: Vec<Record<D>>) -> StoreResult<Vec<Record<D>>>;

    /// Atomically apply `update` to the first matching record and return it
    async fn update_one(
        &self,
        filter: &RecordFilter,
        update: &RecordUpdate<D>,
    ) -> StoreResult<Option<Record<D>>>;

    /// Delete the first matching record, returning whether one was removed
    async fn delete_one(&self, filter: &RecordFilter) -> StoreResult<bool>;

    /// Delete every matching record, returning how many were removed
    async fn delete_many(&self, filter: &RecordFilter) -> StoreResult<u64>;
}
