use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::fmt::Debug;

use crate::domain::{
    errors::ValidationError,
    models::attachment::{Attachment, AttachmentUpload},
    value_objects::{Identifier, RecordKey},
};

/// The two kinds of records managed by the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Recipient,
    Package,
}

impl EntityKind {
    /// Name of the backing collection
    pub fn collection(&self) -> &'static str {
        match self {
            EntityKind::Recipient => "recipients",
            EntityKind::Package => "packages",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            EntityKind::Recipient => "Recipient",
            EntityKind::Package => "Package",
        }
    }

    /// What the sequential identifier is called for this kind
    pub fn identifier_label(&self) -> &'static str {
        match self {
            EntityKind::Recipient => "contact number",
            EntityKind::Package => "tracking number",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityKind::Recipient => write!(f, "recipient"),
            EntityKind::Package => write!(f, "package"),
        }
    }
}

/// Validated domain fields of one entity kind.
///
/// A `Draft` carries raw input for create and full update, a `Patch` carries
/// the optional fields of a partial update, and `Changes` is the validated
/// form of a patch that stores merge into existing details.
pub trait EntityDetails:
    Debug + Clone + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static
{
    type Draft: Debug + Clone + DeserializeOwned + Send + Sync + 'static;
    type Patch: Debug + Clone + Default + DeserializeOwned + Send + Sync + 'static;
    type Changes: Debug + Clone + Send + Sync + 'static;

    const KIND: EntityKind;

    /// Validate a draft into details
    fn from_draft(draft: &Self::Draft) -> Result<Self, ValidationError>;

    /// Identity proof supplied together with a draft, if any
    fn draft_attachment(draft: &Self::Draft) -> Option<&AttachmentUpload>;

    /// Validate the fields present in a patch
    fn validate_patch(patch: &Self::Patch) -> Result<Self::Changes, ValidationError>;

    /// Overwrite the fields present in `changes`
    fn merge(&mut self, changes: &Self::Changes);

    /// Key of the record these details point at, if the kind has an owner
    fn owner_reference(&self) -> Option<&RecordKey> {
        None
    }
}

/// A persisted record: allocator-assigned identifier, persistent key and details
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record<D> {
    pub identifier: Identifier,
    pub key: RecordKey,
    pub created_at: DateTime<Utc>,
    pub details: D,
    #[serde(default)]
    pub attachment: Attachment,
}

impl<D: EntityDetails> Record<D> {
    pub fn new(identifier: Identifier, key: RecordKey, created_at: DateTime<Utc>, details: D) -> Self {
        Self {
            identifier,
            key,
            created_at,
            details,
            attachment: Attachment::default(),
        }
    }

    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachment = attachment;
        self
    }

    /// Same record with the identity-proof bytes dropped, metadata kept
    pub fn without_attachment_data(mut self) -> Self {
        self.attachment.data = Vec::new();
        self
    }
}
