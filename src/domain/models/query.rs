use crate::domain::{
    models::{
        attachment::Attachment,
        entity::{EntityDetails, Record},
    },
    value_objects::{Identifier, RecordKey},
};

/// Selects records in a collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordFilter {
    All,
    ByIdentifier(Identifier),
    IdentifierIn(Vec<Identifier>),
    ByKey(RecordKey),
    KeyIn(Vec<RecordKey>),
}

impl RecordFilter {
    /// Check if this filter matches a record
    pub fn matches<D>(&self, record: &Record<D>) -> bool {
        match self {
            RecordFilter::All => true,
            RecordFilter::ByIdentifier(identifier) => record.identifier == *identifier,
            RecordFilter::IdentifierIn(identifiers) => identifiers.contains(&record.identifier),
            RecordFilter::ByKey(key) => record.key == *key,
            RecordFilter::KeyIn(keys) => keys.contains(&record.key),
        }
    }
}

/// Atomic modification applied to a single stored record
#[derive(Debug, Clone)]
pub enum RecordUpdate<D: EntityDetails> {
    /// Overwrite all details
    Replace(D),
    /// Overwrite only the validated fields present in a patch
    Merge(D::Changes),
    /// Install a new identity proof
    SetAttachment(Attachment),
    /// Reset the identity proof to the absent sentinel
    ClearAttachment,
}

impl<D: EntityDetails> RecordUpdate<D> {
    /// Apply the update in place. Identifier, key and creation time never change.
    pub fn apply(&self, record: &mut Record<D>) {
        match self {
            RecordUpdate::Replace(details) => record.details = details.clone(),
            RecordUpdate::Merge(changes) => record.details.merge(changes),
            RecordUpdate::SetAttachment(attachment) => record.attachment.replace_with(attachment),
            RecordUpdate::ClearAttachment => record.attachment.clear(),
        }
    }
}
