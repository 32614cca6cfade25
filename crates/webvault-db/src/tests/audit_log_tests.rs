//! Tests for the audit trail: write and read back recent entries.

use serde_json::json;

use webvault_core::AuditLogRepository;

use crate::test_fixtures::TestDatabase;

#[tokio::test]
#[ignore] // Requires DATABASE_URL with migrated database
async fn test_record_and_list_recent_round_trip() {
    let test_db = TestDatabase::new().await;
    test_db.cleanup().await;

    let first = test_db
        .db
        .audit
        .record(
            "reviewer-1",
            "update_status",
            "website",
            "w-1",
            json!({ "status": "blocked" }),
        )
        .await
        .unwrap();
    let second = test_db
        .db
        .audit
        .record(
            "reviewer-2",
            "bulk_review",
            "website",
            "batch",
            json!({ "status": "active", "count": 3 }),
        )
        .await
        .unwrap();

    let logs = test_db.db.audit.list_recent(10).await.unwrap();
    assert_eq!(logs.len(), 2);

    // Newest first.
    assert_eq!(logs[0].id, second);
    assert_eq!(logs[0].actor, "reviewer-2");
    assert_eq!(logs[0].changes["count"], 3);
    assert_eq!(logs[1].id, first);
    assert_eq!(logs[1].action, "update_status");

    test_db.cleanup().await;
}
