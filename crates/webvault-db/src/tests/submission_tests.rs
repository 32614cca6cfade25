//! Tests for the submission lifecycle: status-filtered listing, single
//! fetch, and the approval transaction materializing a website row.

use serde_json::json;

use webvault_core::{
    PageParams, SubmissionRepository, SubmissionReview, SubmissionStatus, WebsiteRepository,
    WebsiteStatus,
};

use crate::test_fixtures::TestDatabase;

fn proposal(title: &str) -> serde_json::Value {
    json!({
        "title": title,
        "url": format!("https://{}.example.com", title.to_lowercase().replace(' ', "-")),
    })
}

#[tokio::test]
#[ignore] // Requires DATABASE_URL with migrated database
async fn test_status_filter_narrows_listing() {
    let test_db = TestDatabase::new().await;
    test_db.cleanup().await;

    let pending = test_db.db.submissions.create(proposal("Docs")).await.unwrap();
    let reviewed = test_db.db.submissions.create(proposal("Blog")).await.unwrap();
    test_db
        .db
        .submissions
        .review(
            reviewed,
            SubmissionReview {
                status: SubmissionStatus::Rejected,
                reviewed_by: "reviewer-1".to_string(),
            },
        )
        .await
        .unwrap();

    let listing = test_db
        .db
        .submissions
        .list(Some(SubmissionStatus::Pending), PageParams::default())
        .await
        .unwrap();
    assert_eq!(listing.total, 1);
    assert_eq!(listing.submissions[0].id, pending);

    let all = test_db
        .db
        .submissions
        .list(None, PageParams::default())
        .await
        .unwrap();
    assert_eq!(all.total, 2);

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires DATABASE_URL with migrated database
async fn test_fetch_round_trips_payload_and_review_fields() {
    let test_db = TestDatabase::new().await;
    test_db.cleanup().await;

    let id = test_db.db.submissions.create(proposal("Docs")).await.unwrap();

    let submission = test_db.db.submissions.fetch(id).await.unwrap();
    assert_eq!(submission.id, id);
    assert_eq!(submission.status, SubmissionStatus::Pending);
    assert_eq!(submission.payload["title"], "Docs");
    assert!(submission.website_id.is_none());
    assert!(submission.reviewed_by.is_none());

    let missing = test_db.db.submissions.fetch(uuid::Uuid::now_v7()).await;
    assert!(missing.is_err());

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires DATABASE_URL with migrated database
async fn test_approval_creates_active_website() {
    let test_db = TestDatabase::new().await;
    test_db.cleanup().await;

    let id = test_db.db.submissions.create(proposal("Docs")).await.unwrap();
    test_db
        .db
        .submissions
        .review(
            id,
            SubmissionReview {
                status: SubmissionStatus::Approved,
                reviewed_by: "reviewer-1".to_string(),
            },
        )
        .await
        .unwrap();

    let submission = test_db.db.submissions.fetch(id).await.unwrap();
    assert_eq!(submission.status, SubmissionStatus::Approved);
    assert_eq!(submission.reviewed_by.as_deref(), Some("reviewer-1"));

    let website_id = submission.website_id.expect("approval must link a website");
    let website = test_db.db.websites.fetch(website_id).await.unwrap();
    assert_eq!(website.status, WebsiteStatus::Active);
    assert_eq!(website.title, "Docs");

    test_db.cleanup().await;
}
