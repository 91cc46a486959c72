use serde::{Deserialize, Serialize};

use crate::domain::{
    errors::ValidationError,
    models::{
        attachment::AttachmentUpload,
        entity::{EntityDetails, EntityKind, Record},
    },
    value_objects::{Address, EmailAddress, PersonName, PhoneNumber},
};

/// A stored recipient
pub type Recipient = Record<RecipientDetails>;

/// Validated contact details of a recipient
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipientDetails {
    pub name: PersonName,
    pub email: EmailAddress,
    pub phone: PhoneNumber,
    pub address: Address,
}

/// Raw recipient input for create and full update
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RecipientDraft {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    #[serde(skip)]
    pub attachment: Option<AttachmentUpload>,
}

impl RecipientDraft {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
        address: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
            address: address.into(),
            attachment: None,
        }
    }

    pub fn with_attachment(mut self, upload: AttachmentUpload) -> Self {
        self.attachment = Some(upload);
        self
    }
}

/// Optional recipient fields for a partial update
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RecipientPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct RecipientChanges {
    pub name: Option<PersonName>,
    pub email: Option<EmailAddress>,
    pub phone: Option<PhoneNumber>,
    pub address: Option<Address>,
}

impl EntityDetails for RecipientDetails {
    type Draft = RecipientDraft;
    type Patch = RecipientPatch;
    type Changes = RecipientChanges;

    const KIND: EntityKind = EntityKind::Recipient;

    fn from_draft(draft: &RecipientDraft) -> Result<Self, ValidationError> {
        Ok(RecipientDetails {
            name: PersonName::parse("name", draft.name.as_str())?,
            email: EmailAddress::new(draft.email.clone())?,
            phone: PhoneNumber::new(draft.phone.clone())?,
            address: Address::new(draft.address.clone())?,
        })
    }

    fn draft_attachment(draft: &RecipientDraft) -> Option<&AttachmentUpload> {
        draft.attachment.as_ref()
    }

    fn validate_patch(patch: &RecipientPatch) -> Result<RecipientChanges, ValidationError> {
        Ok(RecipientChanges {
            name: patch
                .name
                .as_deref()
                .map(|name| PersonName::parse("name", name))
                .transpose()?,
            email: patch.email.clone().map(EmailAddress::new).transpose()?,
            phone: patch.phone.clone().map(PhoneNumber::new).transpose()?,
            address: patch.address.clone().map(Address::new).transpose()?,
        })
    }

    fn merge(&mut self, changes: &RecipientChanges) {
        if let Some(name) = &changes.name {
            self.name = name.clone();
        }
        if let Some(email) = &changes.email {
            self.email = email.clone();
        }
        if let Some(phone) = &changes.phone {
            self.phone = phone.clone();
        }
        if let Some(address) = &changes.address {
            self.address = address.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> RecipientDraft {
        RecipientDraft::new(
            "Ada Lovelace",
            "ada@example.com",
            "1234567890",
            "12 Analytical Engine Road",
        )
    }

    #[test]
    fn test_from_draft() {
        let details = RecipientDetails::from_draft(&draft()).unwrap();
        assert_eq!(details.name.as_str(), "Ada Lovelace");
        assert_eq!(details.phone.as_str(), "1234567890");
    }

    #[test]
    fn test_from_draft_reports_field() {
        let mut bad = draft();
        bad.name = "Ada 2".to_string();
        let err = RecipientDetails::from_draft(&bad).unwrap_err();
        assert_eq!(err.field(), "name");

        let mut bad = draft();
        bad.phone = "12345".to_string();
        let err = RecipientDetails::from_draft(&bad).unwrap_err();
        assert_eq!(err.field(), "phone");
    }

    #[test]
    fn test_merge_only_touches_present_fields() {
        let mut details = RecipientDetails::from_draft(&draft()).unwrap();
        let patch = RecipientPatch {
            email: Some("countess@example.org".to_string()),
            ..Default::default()
        };
        let changes = RecipientDetails::validate_patch(&patch).unwrap();
        details.merge(&changes);

        assert_eq!(details.email.as_str(), "countess@example.org");
        assert_eq!(details.name.as_str(), "Ada Lovelace");
    }

    #[test]
    fn test_unknown_patch_fields_are_rejected() {
        let result: Result<RecipientPatch, _> =
            serde_json::from_str(r#"{"name": "Ada", "nickname": "A"}"#);
        assert!(result.is_err());
    }
}
