//! Tests for the all-or-nothing bulk review transaction.

use uuid::Uuid;

use webvault_core::{BulkReview, WebsiteRepository, WebsiteStatus};

use crate::test_fixtures::{seed_website, TestDatabase};

#[tokio::test]
#[ignore] // Requires DATABASE_URL with migrated database
async fn test_bulk_review_applies_to_every_row() {
    let test_db = TestDatabase::new().await;
    test_db.cleanup().await;

    let mut ids = Vec::new();
    for i in 0..5 {
        ids.push(seed_website(&test_db.db, &format!("Pending {}", i), None, false, false).await);
    }

    test_db
        .db
        .websites
        .bulk_review(
            &BulkReview {
                ids: ids.clone(),
                status: WebsiteStatus::Blocked,
            },
            "admin",
        )
        .await
        .unwrap();

    for id in ids {
        let website = test_db.db.websites.fetch(id).await.unwrap();
        assert_eq!(website.status, WebsiteStatus::Blocked);
    }

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires DATABASE_URL with migrated database
async fn test_bulk_review_with_unknown_id_mutates_nothing() {
    let test_db = TestDatabase::new().await;
    test_db.cleanup().await;

    let mut ids = Vec::new();
    for i in 0..4 {
        ids.push(seed_website(&test_db.db, &format!("Batch {}", i), None, false, false).await);
    }
    // Fifth id matches no row: the whole batch must roll back.
    ids.push(Uuid::now_v7());

    let result = test_db
        .db
        .websites
        .bulk_review(
            &BulkReview {
                ids: ids.clone(),
                status: WebsiteStatus::Inactive,
            },
            "admin",
        )
        .await;
    assert!(result.is_err());

    for id in &ids[..4] {
        let website = test_db.db.websites.fetch(*id).await.unwrap();
        assert_eq!(website.status, WebsiteStatus::Active);
    }

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires DATABASE_URL with migrated database
async fn test_bulk_review_writes_one_audit_row() {
    let test_db = TestDatabase::new().await;
    test_db.cleanup().await;

    let id = seed_website(&test_db.db, "Audited", None, false, false).await;
    test_db
        .db
        .websites
        .bulk_review(
            &BulkReview {
                ids: vec![id],
                status: WebsiteStatus::Inactive,
            },
            "reviewer@example.com",
        )
        .await
        .unwrap();

    use webvault_core::AuditLogRepository;
    let entries = test_db.db.audit.list_recent(10).await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].actor, "reviewer@example.com");
    assert_eq!(entries[0].action, "bulk_review");

    test_db.cleanup().await;
}
