use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::{
    domain::{
        errors::{DanglingReference, RecordError, RecordResult},
        models::{Attachment, EntityDetails, Record, RecordFilter, RecordUpdate},
        value_objects::{Identifier, RecordKey},
    },
    ports::{
        services::RecordService,
        storage::{DocumentStore, ReferenceResolver},
    },
    services::sequence_allocator::{AllocatorConfig, SequenceAllocator},
};

/// Implementation of RecordService over a document store
#[derive(Clone)]
pub struct RecordServiceImpl<D: EntityDetails> {
    store: Arc<dyn DocumentStore<D>>,
    allocator: SequenceAllocator<D>,
    references: Option<Arc<dyn ReferenceResolver>>,
}

impl<D: EntityDetails> RecordServiceImpl<D> {
    /// Create a new RecordServiceImpl instance
    pub fn new(store: Arc<dyn DocumentStore<D>>, config: AllocatorConfig) -> Self {
        let allocator = SequenceAllocator::new(store.clone(), config);
        Self {
            store,
            allocator,
            references: None,
        }
    }

    /// Resolve owner references through `resolver`
    pub fn with_reference_resolver(mut self, resolver: Arc<dyn ReferenceResolver>) -> Self {
        self.references = Some(resolver);
        self
    }

    pub(crate) fn store(&self) -> &Arc<dyn DocumentStore<D>> {
        &self.store
    }

    pub(crate) fn allocator(&self) -> &SequenceAllocator<D> {
        &self.allocator
    }

    /// Validate the fields of a draft
    pub(crate) fn validate_draft(&self, draft: &D::Draft) -> RecordResult<D> {
        D::from_draft(draft).map_err(|error| RecordError::invalid_field(D::KIND, error))
    }

    /// Validate the identity proof carried by a draft, if any
    pub(crate) fn draft_attachment(
        &self,
        draft: &D::Draft,
        now: DateTime<Utc>,
    ) -> RecordResult<Attachment> {
        let mut attachment = Attachment::default();
        if let Some(upload) = D::draft_attachment(draft) {
            let incoming = upload
                .to_attachment(now)
                .map_err(|error| RecordError::InvalidAttachment { index: None, error })?;
            attachment.replace_with(&incoming);
        }
        Ok(attachment)
    }

    /// Check that every owner key exists, in one lookup
    pub(crate) async fn ensure_references(
        &self,
        wanted: Vec<(Option<usize>, RecordKey)>,
    ) -> RecordResult<()> {
        if wanted.is_empty() {
            return Ok(());
        }

        let resolver = self.references.as_ref().ok_or_else(|| RecordError::Internal {
            message: format!("No reference resolver configured for {}", D::KIND),
        })?;

        let keys: Vec<RecordKey> = wanted.iter().map(|(_, key)| *key).collect();
        let missing = resolver.missing(&keys).await?;
        if missing.is_empty() {
            return Ok(());
        }

        let references: Vec<DanglingReference> = wanted
            .into_iter()
            .filter(|(_, key)| missing.contains(key))
            .map(|(index, key)| DanglingReference { index, key })
            .collect();

        warn!(
            kind = %D::KIND,
            dangling = references.len(),
            "Rejecting write with unresolved owner references"
        );
        Err(RecordError::InvalidReference { references })
    }

    async fn ensure_reference(&self, details: &D) -> RecordResult<()> {
        let wanted = details
            .owner_reference()
            .map(|key| vec![(None, *key)])
            .unwrap_or_default();
        self.ensure_references(wanted).await
    }

    fn not_found(identifier: Identifier) -> RecordError {
        RecordError::NotFound {
            kind: D::KIND,
            identifier,
        }
    }
}

#[async_trait]
impl<D: EntityDetails> RecordService<D> for RecordServiceImpl<D> {
    async fn create(&self, draft: D::Draft) -> RecordResult<Record<D>> {
        let details = self.validate_draft(&draft)?;
        let now = Utc::now();
        let attachment = self.draft_attachment(&draft, now)?;
        self.ensure_reference(&details).await?;

        let key = RecordKey::generate();
        let store = &self.store;
        let record = self
            .allocator
            .with_fresh_identifier(|identifier| {
                let record = Record::new(identifier, key, now, details.clone())
                    .with_attachment(attachment.clone());
                store.insert_one(record)
            })
            .await?;

        info!(
            kind = %D::KIND,
            identifier = %record.identifier,
            key = %record.key,
            "Created record"
        );
        Ok(record)
    }

    async fn get(&self, identifier: Identifier) -> RecordResult<Record<D>> {
        debug!(kind = %D::KIND, identifier = %identifier, "Fetching record");
        self.store
            .find_one(&RecordFilter::ByIdentifier(identifier))
            .await?
            .ok_or_else(|| Self::not_found(identifier))
    }

    async fn list(&self) -> RecordResult<Vec<Record<D>>> {
        let records = self.store.find_many(&RecordFilter::All).await?;
        debug!(kind = %D::KIND, count = records.len(), "Listing records");
        Ok(records
            .into_iter()
            .map(Record::without_attachment_data)
            .collect())
    }

    async fn update(&self, identifier: Identifier, draft: D::Draft) -> RecordResult<Record<D>> {
        let details = self.validate_draft(&draft)?;
        self.ensure_reference(&details).await?;

        let record = self
            .store
            .update_one(
                &RecordFilter::ByIdentifier(identifier),
                &RecordUpdate::Replace(details),
            )
            .await?
            .ok_or_else(|| Self::not_found(identifier))?;

        info!(kind = %D::KIND, identifier = %identifier, "Replaced record details");
        Ok(record)
    }

    async fn partial_update(
        &self,
        identifier: Identifier,
        patch: D::Patch,
    ) -> RecordResult<Record<D>> {
        let changes = D::validate_patch(&patch)
            .map_err(|error| RecordError::invalid_field(D::KIND, error))?;

        let record = self
            .store
            .update_one(
                &RecordFilter::ByIdentifier(identifier),
                &RecordUpdate::Merge(changes),
            )
            .await?
            .ok_or_else(|| Self::not_found(identifier))?;

        info!(kind = %D::KIND, identifier = %identifier, "Updated record fields");
        Ok(record)
    }

    async fn delete(&self, identifier: Identifier) -> RecordResult<()> {
        let deleted = self
            .store
            .delete_one(&RecordFilter::ByIdentifier(identifier))
            .await?;

        if !deleted {
            return Err(Self::not_found(identifier));
        }

        info!(kind = %D::KIND, identifier = %identifier, "Deleted record");
        Ok(())
    }
}
