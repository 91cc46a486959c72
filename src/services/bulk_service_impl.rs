use async_trait::async_trait;
use chrono::Utc;
use futures::stream::{self, StreamExt};
use std::collections::HashSet;
use tracing::{info, warn};

use crate::{
    domain::{
        errors::{RecordError, RecordResult},
        models::{
            BulkDeleteReport, BulkUpdateItem, BulkUpdateReport, EntityDetails, ItemFailure,
            Record, RecordFilter,
        },
        value_objects::{Identifier, RecordKey},
    },
    ports::services::{BulkService, RecordService},
    services::record_service_impl::RecordServiceImpl,
};

/// Implementation of BulkService reusing the single-record validation
#[derive(Clone)]
pub struct BulkServiceImpl<D: EntityDetails> {
    records: RecordServiceImpl<D>,
}

impl<D: EntityDetails> BulkServiceImpl<D> {
    /// Create a new BulkServiceImpl sharing store, allocator and resolver with `records`
    pub fn new(records: RecordServiceImpl<D>) -> Self {
        Self { records }
    }
}

/// Drop repeated identifiers, keeping first occurrences in order
fn dedup_in_order(identifiers: Vec<Identifier>) -> Vec<Identifier> {
    let mut seen = HashSet::new();
    identifiers
        .into_iter()
        .filter(|identifier| seen.insert(*identifier))
        .collect()
}

#[async_trait]
impl<D: EntityDetails> BulkService<D> for BulkServiceImpl<D> {
    async fn bulk_create(&self, drafts: Vec<D::Draft>) -> RecordResult<Vec<Record<D>>> {
        if drafts.is_empty() {
            return Err(RecordError::invalid_input(format!(
                "No {} records supplied",
                D::KIND
            )));
        }

        let now = Utc::now();
        let mut prepared = Vec::with_capacity(drafts.len());
        for (index, draft) in drafts.iter().enumerate() {
            let details = self
                .records
                .validate_draft(draft)
                .map_err(|e| e.at_index(index))?;
            let attachment = self
                .records
                .draft_attachment(draft, now)
                .map_err(|e| e.at_index(index))?;
            prepared.push((details, attachment));
        }

        let wanted: Vec<(Option<usize>, RecordKey)> = prepared
            .iter()
            .enumerate()
            .filter_map(|(index, (details, _))| {
                details.owner_reference().map(|key| (Some(index), *key))
            })
            .collect();
        self.records.ensure_references(wanted).await?;

        let keys: Vec<RecordKey> = prepared.iter().map(|_| RecordKey::generate()).collect();
        let store = self.records.store();
        let created = self
            .records
            .allocator()
            .with_fresh_block(prepared.len(), |block| {
                let batch: Vec<Record<D>> = block
                    .iter()
                    .zip(prepared.iter().zip(keys.iter()))
                    .map(|(identifier, ((details, attachment), key))| {
                        Record::new(identifier, *key, now, details.clone())
                            .with_attachment(attachment.clone())
                    })
                    .collect();
                store.insert_many(batch)
            })
            .await?;

        info!(
            kind = %D::KIND,
            count = created.len(),
            first = %created[0].identifier,
            "Bulk created records"
        );
        Ok(created)
    }

    async fn bulk_update(
        &self,
        items: Vec<BulkUpdateItem<D::Patch>>,
    ) -> RecordResult<BulkUpdateReport> {
        if items.is_empty() {
            return Err(RecordError::invalid_input(format!(
                "No {} updates supplied",
                D::KIND
            )));
        }

        // Items are applied one after another, each on its own
        let records = &self.records;
        let outcomes: Vec<(Identifier, RecordResult<Record<D>>)> = stream::iter(items)
            .then(|item| async move {
                let identifier = item.identifier;
                let outcome = records.partial_update(identifier, item.changes).await;
                (identifier, outcome)
            })
            .collect()
            .await;

        let mut report = BulkUpdateReport::default();
        for (identifier, outcome) in outcomes {
            match outcome {
                Ok(_) => report.updated_count += 1,
                Err(RecordError::NotFound { .. }) => {
                    if !report.not_found.contains(&identifier) {
                        report.not_found.push(identifier);
                    }
                }
                Err(err) => report.failures.push(ItemFailure {
                    identifier,
                    kind: err.kind(),
                    message: err.to_string(),
                }),
            }
        }

        if !report.is_complete_success() {
            warn!(
                kind = %D::KIND,
                updated = report.updated_count,
                not_found = report.not_found.len(),
                failed = report.failures.len(),
                "Bulk update finished with rejected items"
            );
        } else {
            info!(kind = %D::KIND, updated = report.updated_count, "Bulk updated records");
        }
        Ok(report)
    }

    async fn bulk_delete(&self, identifiers: Vec<Identifier>) -> RecordResult<BulkDeleteReport> {
        if identifiers.is_empty() {
            return Err(RecordError::invalid_input(format!(
                "No {} identifiers supplied",
                D::KIND
            )));
        }

        let requested = dedup_in_order(identifiers);
        let store = self.records.store();

        let existing: HashSet<Identifier> = store
            .find_many(&RecordFilter::IdentifierIn(requested.clone()))
            .await?
            .into_iter()
            .map(|record| record.identifier)
            .collect();

        let (present, not_found): (Vec<Identifier>, Vec<Identifier>) = requested
            .into_iter()
            .partition(|identifier| existing.contains(identifier));

        let deleted_count = if present.is_empty() {
            0
        } else {
            store
                .delete_many(&RecordFilter::IdentifierIn(present))
                .await?
        };

        info!(
            kind = %D::KIND,
            deleted = deleted_count,
            not_found = not_found.len(),
            "Bulk deleted records"
        );
        Ok(BulkDeleteReport {
            deleted_count,
            not_found,
        })
    }

    async fn import_json(&self, bytes: &[u8]) -> RecordResult<Vec<Record<D>>> {
        let drafts: Vec<D::Draft> = serde_json::from_slice(bytes)
            .map_err(|e| RecordError::invalid_input(format!("Invalid JSON file: {}", e)))?;

        info!(kind = %D::KIND, count = drafts.len(), "Importing records from JSON");
        self.bulk_create(drafts).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedup_keeps_first_occurrence() {
        let ids = vec![3, 1, 3, 2, 1]
            .into_iter()
            .map(Identifier::new)
            .collect();
        let deduped: Vec<u64> = dedup_in_order(ids).iter().map(|i| i.value()).collect();
        assert_eq!(deduped, vec![3, 1, 2]);
    }
}
