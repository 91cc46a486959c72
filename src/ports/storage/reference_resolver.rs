use crate::domain::{errors::StoreResult, value_objects::RecordKey};
use async_trait::async_trait;

/// Port answering which owner keys exist
#[async_trait]
pub trait ReferenceResolver: Send + Sync + 'static {
    /// Keys from `keys` that match no record, in input order without duplicates
    async fn missing(&self, keys: &[RecordKey]) -> StoreResult<Vec<RecordKey>>;

    /// Check a single key
    async fn exists(&self, key: &RecordKey) -> StoreResult<bool> {
        Ok(self.missing(std::slice::from_ref(key)).await?.is_empty())
    }
}
