use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::domain::{
    errors::ValidationError,
    models::{
        attachment::AttachmentUpload,
        entity::{EntityDetails, EntityKind, Record},
    },
    value_objects::{PersonName, PlaceName, Price, RecordKey, Weight},
};

/// A stored package
pub type Package = Record<PackageDetails>;

/// Delivery status of a package
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PackageStatus {
    Pending,
    InTransit,
    Delivered,
    #[serde(alias = "not delivered")]
    NotDelivered,
}

impl PackageStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PackageStatus::Pending => "pending",
            PackageStatus::InTransit => "in-transit",
            PackageStatus::Delivered => "delivered",
            PackageStatus::NotDelivered => "not-delivered",
        }
    }
}

impl FromStr for PackageStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(PackageStatus::Pending),
            "in-transit" => Ok(PackageStatus::InTransit),
            "delivered" => Ok(PackageStatus::Delivered),
            "not-delivered" | "not delivered" => Ok(PackageStatus::NotDelivered),
            _ => Err(ValidationError::UnknownStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for PackageStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated package details
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageDetails {
    /// Key of the owning recipient
    pub recipient: RecordKey,
    pub status: PackageStatus,
    pub sender_name: PersonName,
    pub origin: PlaceName,
    pub destination: PlaceName,
    pub description: Option<String>,
    pub weight: Weight,
    pub price: Price,
}

/// Raw package input for create and full update
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PackageDraft {
    pub recipient: RecordKey,
    pub status: String,
    pub sender_name: String,
    pub origin: String,
    pub destination: String,
    #[serde(default)]
    pub description: Option<String>,
    pub weight: f64,
    pub price: f64,
    #[serde(skip)]
    pub attachment: Option<AttachmentUpload>,
}

impl PackageDraft {
    pub fn with_attachment(mut self, upload: AttachmentUpload) -> Self {
        self.attachment = Some(upload);
        self
    }
}

/// Optional package fields for a partial update
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PackagePatch {
    /// Never accepted; present so the attempt is reported as a field error
    pub recipient: Option<RecordKey>,
    pub status: Option<String>,
    pub sender_name: Option<String>,
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub description: Option<String>,
    pub weight: Option<f64>,
    pub price: Option<f64>,
}

#[derive(Debug, Clone, Default)]
pub struct PackageChanges {
    pub status: Option<PackageStatus>,
    pub sender_name: Option<PersonName>,
    pub origin: Option<PlaceName>,
    pub destination: Option<PlaceName>,
    pub description: Option<Option<String>>,
    pub weight: Option<Weight>,
    pub price: Option<Price>,
}

fn normalize_description(description: &str) -> Option<String> {
    let trimmed = description.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

impl EntityDetails for PackageDetails {
    type Draft = PackageDraft;
    type Patch = PackagePatch;
    type Changes = PackageChanges;

    const KIND: EntityKind = EntityKind::Package;

    fn from_draft(draft: &PackageDraft) -> Result<Self, ValidationError> {
        Ok(PackageDetails {
            recipient: draft.recipient,
            status: draft.status.parse()?,
            sender_name: PersonName::parse("sender_name", draft.sender_name.as_str())?,
            origin: PlaceName::parse("origin", draft.origin.as_str())?,
            destination: PlaceName::parse("destination", draft.destination.as_str())?,
            description: draft.description.as_deref().and_then(normalize_description),
            weight: Weight::from_kilograms(draft.weight)?,
            price: Price::new(draft.price)?,
        })
    }

    fn draft_attachment(draft: &PackageDraft) -> Option<&AttachmentUpload> {
        draft.attachment.as_ref()
    }

    fn validate_patch(patch: &PackagePatch) -> Result<PackageChanges, ValidationError> {
        if patch.recipient.is_some() {
            return Err(ValidationError::ImmutableField {
                field: "recipient".to_string(),
            });
        }

        Ok(PackageChanges {
            status: patch.status.as_deref().map(str::parse).transpose()?,
            sender_name: patch
                .sender_name
                .as_deref()
                .map(|name| PersonName::parse("sender_name", name))
                .transpose()?,
            origin: patch
                .origin
                .as_deref()
                .map(|place| PlaceName::parse("origin", place))
                .transpose()?,
            destination: patch
                .destination
                .as_deref()
                .map(|place| PlaceName::parse("destination", place))
                .transpose()?,
            description: patch.description.as_deref().map(normalize_description),
            weight: patch.weight.map(Weight::from_kilograms).transpose()?,
            price: patch.price.map(Price::new).transpose()?,
        })
    }

    fn merge(&mut self, changes: &PackageChanges) {
        if let Some(status) = changes.status {
            self.status = status;
        }
        if let Some(sender_name) = &changes.sender_name {
            self.sender_name = sender_name.clone();
        }
        if let Some(origin) = &changes.origin {
            self.origin = origin.clone();
        }
        if let Some(destination) = &changes.destination {
            self.destination = destination.clone();
        }
        if let Some(description) = &changes.description {
            self.description = description.clone();
        }
        if let Some(weight) = changes.weight {
            self.weight = weight;
        }
        if let Some(price) = changes.price {
            self.price = price;
        }
    }

    fn owner_reference(&self) -> Option<&RecordKey> {
        Some(&self.recipient)
    }
}
