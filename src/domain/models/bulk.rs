use serde::{Deserialize, Serialize};

use crate::domain::{errors::ErrorKind, value_objects::Identifier};

/// One entry of a bulk partial update
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkUpdateItem<P> {
    pub identifier: Identifier,
    pub changes: P,
}

impl<P> BulkUpdateItem<P> {
    pub fn new(identifier: Identifier, changes: P) -> Self {
        Self {
            identifier,
            changes,
        }
    }
}

/// Why a single bulk update entry was not applied
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemFailure {
    pub identifier: Identifier,
    #[serde(serialize_with = "serialize_kind")]
    pub kind: ErrorKind,
    pub message: String,
}

fn serialize_kind<S: serde::Serializer>(kind: &ErrorKind, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(kind.as_str())
}

/// Outcome of a bulk delete
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BulkDeleteReport {
    pub deleted_count: u64,
    /// Requested identifiers with no matching record, in request order
    pub not_found: Vec<Identifier>,
}

/// Outcome of a bulk partial update
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BulkUpdateReport {
    pub updated_count: u64,
    pub not_found: Vec<Identifier>,
    pub failures: Vec<ItemFailure>,
}

impl BulkUpdateReport {
    pub fn success_count(&self) -> u64 {
        self.updated_count
    }

    /// Identifiers of entries rejected for a reason other than not existing
    pub fn failed_identifiers(&self) -> Vec<Identifier> {
        self.failures.iter().map(|f| f.identifier).collect()
    }

    pub fn is_complete_success(&self) -> bool {
        self.not_found.is_empty() && self.failures.is_empty()
    }
}
