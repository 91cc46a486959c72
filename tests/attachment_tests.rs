mod common;

use common::{png_upload, recipient_draft};
use parcel_records::{
    create_in_memory_app, create_sqlite_app,
    domain::{
        errors::{AttachmentError, ErrorKind, RecordError},
        models::{AttachmentType, AttachmentUpload, MAX_ATTACHMENT_SIZE},
        value_objects::Identifier,
    },
    ports::services::{AttachmentService, BulkService, RecordService},
    AppServices,
};

async fn with_recipient() -> (AppServices, Identifier) {
    let services = create_in_memory_app().await.unwrap();
    let recipient = services
        .recipient_service
        .create(recipient_draft(0))
        .await
        .unwrap();
    (services, recipient.identifier)
}

#[tokio::test]
async fn test_upload_then_download() {
    let (services, identifier) = with_recipient().await;
    let upload = png_upload();

    let record = services
        .recipient_attachment_service
        .upload(identifier, upload.clone())
        .await
        .unwrap();
    assert_eq!(record.attachment.content_type, AttachmentType::Png);
    assert_eq!(record.attachment.size, upload.bytes.len() as u64);
    assert_eq!(record.attachment.revision, 1);
    assert!(record.attachment.data.is_empty());

    let content = services
        .recipient_attachment_service
        .get(identifier)
        .await
        .unwrap();
    assert_eq!(content.bytes, upload.bytes);
    assert_eq!(content.content_type, AttachmentType::Png);
    assert_eq!(
        content.etag,
        Some(format!("{:x}", md5::compute(&upload.bytes)))
    );
}

#[tokio::test]
async fn test_replacing_bumps_revision() {
    let (services, identifier) = with_recipient().await;
    let attachments = &services.recipient_attachment_service;

    attachments.upload(identifier, png_upload()).await.unwrap();
    let replacement = AttachmentUpload::new(b"%PDF-1.7 scan".to_vec(), "application/pdf");
    let record = attachments.upload(identifier, replacement).await.unwrap();
    assert_eq!(record.attachment.revision, 2);

    let content = attachments.get(identifier).await.unwrap();
    assert_eq!(content.content_type, AttachmentType::Pdf);
    assert_eq!(content.revision, 2);
}

#[tokio::test]
async fn test_oversized_upload_is_rejected() {
    let (services, identifier) = with_recipient().await;
    let upload = AttachmentUpload::new(vec![0u8; 16], "image/jpeg")
        .with_declared_size(MAX_ATTACHMENT_SIZE + 1);

    let err = services
        .recipient_attachment_service
        .upload(identifier, upload)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidAttachment);
    assert!(matches!(
        err,
        RecordError::InvalidAttachment {
            error: AttachmentError::TooLarge { .. },
            ..
        }
    ));
}

#[tokio::test]
async fn test_unsupported_type_is_rejected() {
    let (services, identifier) = with_recipient().await;
    let upload = AttachmentUpload::new(b"hello".to_vec(), "text/plain");

    let err = services
        .recipient_attachment_service
        .upload(identifier, upload)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidAttachment);

    // Nothing was attached
    let err = services
        .recipient_attachment_service
        .get(identifier)
        .await
        .unwrap_err();
    assert!(matches!(err, RecordError::AttachmentNotFound { .. }));
}

#[tokio::test]
async fn test_upload_to_missing_record() {
    let services = create_in_memory_app().await.unwrap();
    let err = services
        .recipient_attachment_service
        .upload(Identifier::new(5), png_upload())
        .await
        .unwrap_err();
    assert!(matches!(err, RecordError::NotFound { .. }));
}

#[tokio::test]
async fn test_clear_is_idempotent() {
    let (services, identifier) = with_recipient().await;
    let attachments = &services.recipient_attachment_service;

    // Clearing without an attachment succeeds and changes nothing
    let untouched = attachments.clear(identifier).await.unwrap();
    assert!(!untouched.attachment.is_present());
    assert_eq!(untouched.attachment.revision, 0);

    attachments.upload(identifier, png_upload()).await.unwrap();
    let cleared = attachments.clear(identifier).await.unwrap();
    assert!(!cleared.attachment.is_present());
    assert_eq!(cleared.attachment.content_type, AttachmentType::Absent);

    let err = attachments.get(identifier).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let err = attachments.clear(Identifier::new(99)).await.unwrap_err();
    assert!(matches!(err, RecordError::NotFound { .. }));
}

#[tokio::test]
async fn test_draft_attachment_is_stored_on_create() {
    let services = create_in_memory_app().await.unwrap();
    let draft = recipient_draft(0).with_attachment(png_upload());

    let created = services.recipient_service.create(draft).await.unwrap();
    assert_eq!(created.attachment.content_type, AttachmentType::Png);
    assert_eq!(created.attachment.revision, 1);

    let content = services
        .recipient_attachment_service
        .get(created.identifier)
        .await
        .unwrap();
    assert_eq!(content.bytes, png_upload().bytes);
}

#[tokio::test]
async fn test_invalid_draft_attachment_in_batch() {
    let services = create_in_memory_app().await.unwrap();
    let drafts = vec![
        recipient_draft(0),
        recipient_draft(1).with_attachment(AttachmentUpload::new(b"x".to_vec(), "text/csv")),
    ];

    let err = services
        .recipient_bulk_service
        .bulk_create(drafts)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        RecordError::InvalidAttachment {
            index: Some(1),
            ..
        }
    ));
    assert!(services.recipient_service.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_attachment_survives_sqlite_round_trip() {
    let services = create_sqlite_app("sqlite::memory:".to_string()).await.unwrap();
    let recipient = services
        .recipient_service
        .create(recipient_draft(0))
        .await
        .unwrap();

    services
        .recipient_attachment_service
        .upload(recipient.identifier, png_upload())
        .await
        .unwrap();

    // Listing never carries the bytes, fetching does
    let listed = services.recipient_service.list().await.unwrap();
    assert!(listed[0].attachment.data.is_empty());
    assert_eq!(listed[0].attachment.revision, 1);

    let content = services
        .recipient_attachment_service
        .get(recipient.identifier)
        .await
        .unwrap();
    assert_eq!(content.bytes, png_upload().bytes);
}
