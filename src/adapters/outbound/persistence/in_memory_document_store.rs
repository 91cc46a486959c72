use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::{
    domain::{
        errors::{StoreError, StoreResult},
        models::{EntityDetails, Record, RecordFilter, RecordUpdate},
        value_objects::{Identifier, RecordKey},
    },
    ports::storage::DocumentStore,
};

/// In-memory implementation of DocumentStore for testing and development
#[derive(Clone)]
pub struct InMemoryDocumentStore<D: EntityDetails> {
    data: Arc<RwLock<CollectionData<D>>>,
}

struct CollectionData<D> {
    // Records ordered by identifier
    records: BTreeMap<Identifier, Record<D>>,
    // Persistent key -> identifier
    keys: HashMap<RecordKey, Identifier>,
}

impl<D> Default for CollectionData<D> {
    fn default() -> Self {
        Self {
            records: BTreeMap::new(),
            keys: HashMap::new(),
        }
    }
}

impl<D: EntityDetails> CollectionData<D> {
    fn first_match(&self, filter: &RecordFilter) -> Option<Identifier> {
        match filter {
            RecordFilter::ByIdentifier(identifier) => {
                self.records.contains_key(identifier).then_some(*identifier)
            }
            RecordFilter::ByKey(key) => self.keys.get(key).copied(),
            _ => self
                .records
                .values()
                .find(|record| filter.matches(record))
                .map(|record| record.identifier),
        }
    }

    fn check_unique(&self, record: &Record<D>) -> StoreResult<()> {
        if self.records.contains_key(&record.identifier) {
            return Err(StoreError::DuplicateIdentifier {
                collection: D::KIND.collection(),
                identifier: record.identifier,
            });
        }
        if self.keys.contains_key(&record.key) {
            return Err(StoreError::DuplicateKey {
                collection: D::KIND.collection(),
                key: record.key,
            });
        }
        Ok(())
    }

    fn insert(&mut self, record: Record<D>) {
        self.keys.insert(record.key, record.identifier);
        self.records.insert(record.identifier, record);
    }

    fn remove(&mut self, identifier: &Identifier) -> bool {
        match self.records.remove(identifier) {
            Some(record) => {
                self.keys.remove(&record.key);
                true
            }
            None => false,
        }
    }
}

impl<D: EntityDetails> InMemoryDocumentStore<D> {
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(CollectionData::default())),
        }
    }

    /// Number of stored records
    pub async fn len(&self) -> usize {
        self.data.read().await.records.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.data.read().await.records.is_empty()
    }
}

impl<D: EntityDetails> Default for InMemoryDocumentStore<D> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<D: EntityDetails> DocumentStore<D> for InMemoryDocumentStore<D> {
    async fn find_one(&self, filter: &RecordFilter) -> StoreResult<Option<Record<D>>> {
        let data = self.data.read().await;
        Ok(data
            .first_match(filter)
            .and_then(|identifier| data.records.get(&identifier))
            .cloned())
    }

    async fn find_many(&self, filter: &RecordFilter) -> StoreResult<Vec<Record<D>>> {
        let data = self.data.read().await;
        Ok(data
            .records
            .values()
            .filter(|record| filter.matches(record))
            .cloned()
            .collect())
    }

    async fn find_max_identifier(&self) -> StoreResult<Option<Identifier>> {
        let data = self.data.read().await;
        Ok(data.records.keys().next_back().copied())
    }

    async fn insert_one(&self, record: Record<D>) -> StoreResult<Record<D>> {
        let mut data = self.data.write().await;
        data.check_unique(&record)?;
        data.insert(record.clone());
        Ok(record)
    }

    async fn insert_many(&self, records: Vec<Record<D>>) -> StoreResult<Vec<Record<D>>> {
        let mut data = self.data.write().await;

        // Check the whole batch before touching the collection
        let mut batch_identifiers = HashSet::new();
        let mut batch_keys = HashSet::new();
        for record in &records {
            data.check_unique(record)?;
            if !batch_identifiers.insert(record.identifier) {
                return Err(StoreError::DuplicateIdentifier {
                    collection: D::KIND.collection(),
                    identifier: record.identifier,
                });
            }
            if !batch_keys.insert(record.key) {
                return Err(StoreError::DuplicateKey {
                    collection: D::KIND.collection(),
                    key: record.key,
                });
            }
        }

        for record in &records {
            data.insert(record.clone());
        }

        Ok(records)
    }

    async fn update_one(
        &self,
        filter: &RecordFilter,
        update: &RecordUpdate<D>,
    ) -> StoreResult<Option<Record<D>>> {
        let mut data = self.data.write().await;

        let Some(identifier) = data.first_match(filter) else {
            return Ok(None);
        };

        Ok(data.records.get_mut(&identifier).map(|record| {
            update.apply(record);
            record.clone()
        }))
    }

    async fn delete_one(&self, filter: &RecordFilter) -> StoreResult<bool> {
        let mut data = self.data.write().await;

        Ok(match data.first_match(filter) {
            Some(identifier) => data.remove(&identifier),
            None => false,
        })
    }

    async fn delete_many(&self, filter: &RecordFilter) -> StoreResult<u64> {
        let mut data = self.data.write().await;

        let matching: Vec<Identifier> = data
            .records
            .values()
            .filter(|record| filter.matches(record))
            .map(|record| record.identifier)
            .collect();

        let mut deleted = 0;
        for identifier in &matching {
            if data.remove(identifier) {
                deleted += 1;
            }
        }

        Ok(deleted)
    }
}
