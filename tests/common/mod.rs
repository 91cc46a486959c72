#![allow(dead_code)]

use async_trait::async_trait;
use parcel_records::{
    domain::{
        errors::StoreResult,
        models::{
            AttachmentUpload, EntityDetails, PackageDraft, Record, RecordFilter, RecordUpdate,
            RecipientDraft,
        },
        value_objects::{Identifier, RecordKey},
    },
    ports::storage::DocumentStore,
};
use std::sync::{
    Arc,
    atomic::{AtomicU32, Ordering},
};

const NAMES: [&str; 6] = [
    "Ada Lovelace",
    "Grace Hopper",
    "Alan Turing",
    "Edsger Dijkstra",
    "Barbara Liskov",
    "Donald Knuth",
];

/// A valid recipient draft; `n` varies the name and contact fields
pub fn recipient_draft(n: usize) -> RecipientDraft {
    RecipientDraft::new(
        NAMES[n % NAMES.len()],
        format!("person{}@example.com", n),
        format!("55501{:05}", n),
        format!("{} Analytical Engine Road", n + 1),
    )
}

/// A valid pending package owned by `recipient`
pub fn package_draft(recipient: RecordKey) -> PackageDraft {
    PackageDraft {
        recipient,
        status: "pending".to_string(),
        sender_name: "Charles Babbage".to_string(),
        origin: "London".to_string(),
        destination: "Paris".to_string(),
        description: Some("Difference engine parts".to_string()),
        weight: 12.5,
        price: 99.99,
        attachment: None,
    }
}

/// Small PNG-typed payload; only type and size are checked on upload
pub fn png_upload() -> AttachmentUpload {
    AttachmentUpload::new(b"\x89PNG\r\n\x1a\nfake image body".to_vec(), "image/png")
        .with_original_name("passport.png")
}

/// Store wrapper that reports a fixed stale maximum for the first
/// `stale_reads` calls to `find_max_identifier`, then delegates.
pub struct StaleMaxStore<D: EntityDetails> {
    inner: Arc<dyn DocumentStore<D>>,
    stale_max: Option<Identifier>,
    stale_reads: AtomicU32,
    max_reads: AtomicU32,
}

impl<D: EntityDetails> StaleMaxStore<D> {
    pub fn new(
        inner: Arc<dyn DocumentStore<D>>,
        stale_max: Option<Identifier>,
        stale_reads: u32,
    ) -> Self {
        Self {
            inner,
            stale_max,
            stale_reads: AtomicU32::new(stale_reads),
            max_reads: AtomicU32::new(0),
        }
    }

    /// How many times the maximum was read
    pub fn max_reads(&self) -> u32 {
        self.max_reads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<D: EntityDetails> DocumentStore<D> for StaleMaxStore<D> {
    async fn find_one(&self, filter: &RecordFilter) -> StoreResult<Option<Record<D>>> {
        self.inner.find_one(filter).await
    }

    async fn find_many(&self, filter: &RecordFilter) -> StoreResult<Vec<Record<D>>> {
        self.inner.find_many(filter).await
    }

    async fn find_max_identifier(&self) -> StoreResult<Option<Identifier>> {
        self.max_reads.fetch_add(1, Ordering::SeqCst);
        let stale = self
            .stale_reads
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
            .is_ok();
        if stale {
            return Ok(self.stale_max);
        }
        self.inner.find_max_identifier().await
    }

    async fn insert_one(&self, record: Record<D>) -> StoreResult<Record<D>> {
        self.inner.insert_one(record).await
    }

    async fn insert_many(&self, records: Vec<Record<D>>) -> StoreResult<Vec<Record<D>>> {
        self.inner.insert_many(records).await
    }

    async fn update_one(
        &self,
        filter: &RecordFilter,
        update: &RecordUpdate<D>,
    ) -> StoreResult<Option<Record<D>>> {
        self.inner.update_one(filter, update).await
    }

    async fn delete_one(&self, filter: &RecordFilter) -> StoreResult<bool> {
        self.inner.delete_one(filter).await
    }

    async fn delete_many(&self, filter: &RecordFilter) -> StoreResult<u64> {
        self.inner.delete_many(filter).await
    }
}

pub fn ids(values: &[u64]) -> Vec<Identifier> {
    values.iter().copied().map(Identifier::new).collect()
}
