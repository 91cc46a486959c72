mod common;

use common::{StaleMaxStore, ids, package_draft, recipient_draft};
use parcel_records::{
    create_in_memory_app, create_sqlite_app,
    domain::{
        errors::{ErrorKind, RecordError},
        models::{BulkUpdateItem, PackagePatch, RecipientDetails, RecipientPatch, RecordFilter},
        value_objects::{Identifier, RecordKey},
    },
    ports::{
        services::{BulkService, RecordService},
        storage::DocumentStore,
    },
    services::{AllocatorConfig, BulkServiceImpl, RecordServiceImpl},
    InMemoryDocumentStore,
};
use std::sync::Arc;

#[tokio::test]
async fn test_bulk_create_is_contiguous_and_ordered() {
    let services = create_in_memory_app().await.unwrap();
    services.recipient_service.create(recipient_draft(0)).await.unwrap();

    let drafts: Vec<_> = (1..=4).map(recipient_draft).collect();
    let created = services
        .recipient_bulk_service
        .bulk_create(drafts.clone())
        .await
        .unwrap();

    let identifiers: Vec<u64> = created.iter().map(|r| r.identifier.value()).collect();
    assert_eq!(identifiers, vec![2, 3, 4, 5]);
    for (record, draft) in created.iter().zip(drafts.iter()) {
        assert_eq!(record.details.email.as_str(), draft.email);
    }
}

#[tokio::test]
async fn test_bulk_create_sqlite() {
    let services = create_sqlite_app("sqlite::memory:".to_string()).await.unwrap();
    let created = services
        .recipient_bulk_service
        .bulk_create((0..3).map(recipient_draft).collect())
        .await
        .unwrap();
    assert_eq!(created.last().unwrap().identifier, Identifier::new(3));

    let listed = services.recipient_service.list().await.unwrap();
    assert_eq!(listed.len(), 3);
}

#[tokio::test]
async fn test_bulk_create_empty_is_invalid_input() {
    let services = create_in_memory_app().await.unwrap();
    let err = services
        .recipient_bulk_service
        .bulk_create(Vec::new())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
}

#[tokio::test]
async fn test_bulk_create_rejects_whole_batch() {
    let services = create_in_memory_app().await.unwrap();
    let mut drafts: Vec<_> = (0..3).map(recipient_draft).collect();
    drafts[1].email = "not-an-email".to_string();

    let err = services
        .recipient_bulk_service
        .bulk_create(drafts)
        .await
        .unwrap_err();
    match err {
        RecordError::InvalidField { index, error, .. } => {
            assert_eq!(index, Some(1));
            assert_eq!(error.field(), "email");
        }
        other => panic!("Unexpected error: {:?}", other),
    }
    assert!(services.recipient_service.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_bulk_create_reports_every_dangling_reference() {
    let services = create_in_memory_app().await.unwrap();
    let owner = services.recipient_service.create(recipient_draft(0)).await.unwrap();
    let ghost = RecordKey::generate();

    let drafts = vec![
        package_draft(owner.key),
        package_draft(ghost),
        package_draft(owner.key),
        package_draft(ghost),
    ];
    let err = services
        .package_bulk_service
        .bulk_create(drafts)
        .await
        .unwrap_err();

    match err {
        RecordError::InvalidReference { references } => {
            let indexes: Vec<Option<usize>> = references.iter().map(|r| r.index).collect();
            assert_eq!(indexes, vec![Some(1), Some(3)]);
            assert!(references.iter().all(|r| r.key == ghost));
        }
        other => panic!("Unexpected error: {:?}", other),
    }
    assert!(services.package_service.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_bulk_create_retries_overlapping_block() {
    let inner: Arc<dyn DocumentStore<RecipientDetails>> = Arc::new(InMemoryDocumentStore::new());
    let seeded = RecordServiceImpl::new(inner.clone(), AllocatorConfig::default());
    seeded.create(recipient_draft(0)).await.unwrap();

    let stale = Arc::new(StaleMaxStore::new(inner.clone(), None, 1));
    let bulk = BulkServiceImpl::new(RecordServiceImpl::new(stale.clone(), AllocatorConfig::new(3)));

    let created = bulk
        .bulk_create((1..=3).map(recipient_draft).collect())
        .await
        .unwrap();
    let identifiers: Vec<u64> = created.iter().map(|r| r.identifier.value()).collect();
    assert_eq!(identifiers, vec![2, 3, 4]);
    assert_eq!(stale.max_reads(), 2);

    // The rejected first block left no partial rows behind
    assert_eq!(inner.find_many(&RecordFilter::All).await.unwrap().len(), 4);
}

#[tokio::test]
async fn test_bulk_delete_reports_missing() {
    let services = create_in_memory_app().await.unwrap();
    services.recipient_service.create(recipient_draft(0)).await.unwrap();

    let report = services
        .recipient_bulk_service
        .bulk_delete(ids(&[1, 2, 3]))
        .await
        .unwrap();
    assert_eq!(report.deleted_count, 1);
    assert_eq!(report.not_found, ids(&[2, 3]));

    let err = services.recipient_service.get(Identifier::new(1)).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_bulk_delete_ignores_repeats() {
    let services = create_in_memory_app().await.unwrap();
    for n in 0..2 {
        services.recipient_service.create(recipient_draft(n)).await.unwrap();
    }

    let report = services
        .recipient_bulk_service
        .bulk_delete(ids(&[2, 9, 2, 9]))
        .await
        .unwrap();
    assert_eq!(report.deleted_count, 1);
    assert_eq!(report.not_found, ids(&[9]));
    assert_eq!(services.recipient_service.list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_bulk_delete_empty_is_invalid_input() {
    let services = create_in_memory_app().await.unwrap();
    let err = services
        .package_bulk_service
        .bulk_delete(Vec::new())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
}

#[tokio::test]
async fn test_bulk_update_partial_success() {
    let services = create_in_memory_app().await.unwrap();
    let owner = services.recipient_service.create(recipient_draft(0)).await.unwrap();
    for _ in 0..2 {
        services
            .package_service
            .create(package_draft(owner.key))
            .await
            .unwrap();
    }

    let delivered = PackagePatch {
        status: Some("delivered".to_string()),
        ..Default::default()
    };
    let bogus = PackagePatch {
        status: Some("teleported".to_string()),
        ..Default::default()
    };
    let items = vec![
        BulkUpdateItem::new(Identifier::new(1), delivered.clone()),
        BulkUpdateItem::new(Identifier::new(2), bogus),
        BulkUpdateItem::new(Identifier::new(7), delivered),
    ];

    let report = services
        .package_bulk_service
        .bulk_update(items)
        .await
        .unwrap();

    assert_eq!(report.updated_count, 1);
    assert_eq!(report.not_found, ids(&[7]));
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].identifier, Identifier::new(2));
    assert_eq!(report.failures[0].kind, ErrorKind::InvalidField);
    assert_eq!(report.failed_identifiers(), ids(&[2]));
    assert!(!report.is_complete_success());

    let first = services.package_service.get(Identifier::new(1)).await.unwrap();
    assert_eq!(first.details.status.as_str(), "delivered");
    let second = services.package_service.get(Identifier::new(2)).await.unwrap();
    assert_eq!(second.details.status.as_str(), "pending");
}

#[tokio::test]
async fn test_bulk_update_empty_is_invalid_input() {
    let services = create_in_memory_app().await.unwrap();
    let items: Vec<BulkUpdateItem<RecipientPatch>> = Vec::new();
    let err = services
        .recipient_bulk_service
        .bulk_update(items)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
}

#[tokio::test]
async fn test_import_json() {
    let services = create_in_memory_app().await.unwrap();
    let body = serde_json::to_vec(&vec![recipient_draft(0), recipient_draft(1)]).unwrap();

    let created = services
        .recipient_bulk_service
        .import_json(&body)
        .await
        .unwrap();
    assert_eq!(created.len(), 2);
    assert_eq!(created[1].identifier, Identifier::new(2));
}

#[tokio::test]
async fn test_import_rejects_malformed_json() {
    let services = create_in_memory_app().await.unwrap();

    let err = services
        .recipient_bulk_service
        .import_json(b"{ not json")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);

    let err = services
        .recipient_bulk_service
        .import_json(br#"[{"name": "Ada Lovelace", "unexpected": true}]"#)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);

    let err = services
        .recipient_bulk_service
        .import_json(b"[]")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
}
