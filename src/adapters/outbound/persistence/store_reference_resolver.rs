use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;

use crate::{
    domain::{
        errors::StoreResult,
        models::{EntityDetails, RecordFilter},
        value_objects::RecordKey,
    },
    ports::storage::{DocumentStore, ReferenceResolver},
};

/// Resolves owner references against the collection of the owning kind
pub struct StoreReferenceResolver<D: EntityDetails> {
    owners: Arc<dyn DocumentStore<D>>,
}

impl<D: EntityDetails> StoreReferenceResolver<D> {
    pub fn new(owners: Arc<dyn DocumentStore<D>>) -> Self {
        Self { owners }
    }
}

#[async_trait]
impl<D: EntityDetails> ReferenceResolver for StoreReferenceResolver<D> {
    async fn missing(&self, keys: &[RecordKey]) -> StoreResult<Vec<RecordKey>> {
        let mut requested = Vec::with_capacity(keys.len());
        for key in keys {
            if !requested.contains(key) {
                requested.push(*key);
            }
        }

        // One query for the whole set
        let found: HashSet<RecordKey> = self
            .owners
            .find_many(&RecordFilter::KeyIn(requested.clone()))
            .await?
            .into_iter()
            .map(|record| record.key)
            .collect();

        Ok(requested
            .into_iter()
            .filter(|key| !found.contains(key))
            .collect())
    }
}
