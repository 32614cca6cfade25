//! Tests for website listing: filter composition against real rows,
//! pagination bounds, and wildcard literalness.
//!
//! All tests require DATABASE_URL pointing at a migrated database.

use uuid::Uuid;

use webvault_core::{PageParams, WebsiteFilters, WebsiteRepository, WebsiteStatus};

use crate::test_fixtures::{seed_website, TestDatabase};

#[tokio::test]
#[ignore] // Requires DATABASE_URL with migrated database
async fn test_unfiltered_listing_respects_page_size_and_total() {
    let test_db = TestDatabase::new().await;
    test_db.cleanup().await;

    for i in 0..15 {
        seed_website(&test_db.db, &format!("Site {}", i), None, false, false).await;
    }

    let listing = test_db
        .db
        .websites
        .list(WebsiteFilters::default(), PageParams::default())
        .await
        .unwrap();

    // Default page size is 12; total covers the full unfiltered set.
    assert_eq!(listing.websites.len(), 12);
    assert_eq!(listing.total, 15);

    let page2 = test_db
        .db
        .websites
        .list(WebsiteFilters::default(), PageParams { page: 2, page_size: 12 })
        .await
        .unwrap();
    assert_eq!(page2.websites.len(), 3);
    assert_eq!(page2.total, 15);

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires DATABASE_URL with migrated database
async fn test_wildcards_in_query_match_literally() {
    let test_db = TestDatabase::new().await;
    test_db.cleanup().await;

    seed_website(&test_db.db, "100% Rust", None, false, false).await;
    seed_website(&test_db.db, "1000 Rust", None, false, false).await;
    seed_website(&test_db.db, "snake_case tools", None, false, false).await;
    seed_website(&test_db.db, "snakeXcase tools", None, false, false).await;

    // '%' must not behave as a wildcard: "100%" matches only the literal title.
    let listing = test_db
        .db
        .websites
        .list(
            WebsiteFilters {
                query: Some("100%".to_string()),
                ..Default::default()
            },
            PageParams::default(),
        )
        .await
        .unwrap();
    assert_eq!(listing.total, 1);
    assert_eq!(listing.websites[0].title, "100% Rust");

    // '_' must not match any-single-character.
    let listing = test_db
        .db
        .websites
        .list(
            WebsiteFilters {
                query: Some("snake_case".to_string()),
                ..Default::default()
            },
            PageParams::default(),
        )
        .await
        .unwrap();
    assert_eq!(listing.total, 1);
    assert_eq!(listing.websites[0].title, "snake_case tools");

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires DATABASE_URL with migrated database
async fn test_featured_and_min_rating_round_trip() {
    let test_db = TestDatabase::new().await;
    test_db.cleanup().await;

    let id = seed_website(&test_db.db, "Featured Docs", Some(4.0), true, false).await;
    seed_website(&test_db.db, "Plain Docs", Some(3.0), false, false).await;

    let matched = test_db
        .db
        .websites
        .list(
            WebsiteFilters {
                featured: Some(true),
                min_rating: Some(4.0),
                ..Default::default()
            },
            PageParams::default(),
        )
        .await
        .unwrap();
    assert_eq!(matched.total, 1);
    assert_eq!(matched.websites[0].id, id);

    let unmatched = test_db
        .db
        .websites
        .list(
            WebsiteFilters {
                featured: Some(false),
                min_rating: Some(4.0),
                ..Default::default()
            },
            PageParams::default(),
        )
        .await
        .unwrap();
    assert!(unmatched.websites.iter().all(|w| w.id != id));

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires DATABASE_URL with migrated database
async fn test_exclude_ads_drops_ad_rows_entirely() {
    let test_db = TestDatabase::new().await;
    test_db.cleanup().await;

    seed_website(&test_db.db, "Organic", None, false, false).await;
    seed_website(&test_db.db, "Sponsored", None, false, true).await;

    let listing = test_db
        .db
        .websites
        .list(
            WebsiteFilters {
                exclude_ads: true,
                ..Default::default()
            },
            PageParams::default(),
        )
        .await
        .unwrap();
    assert_eq!(listing.total, 1);
    assert!(!listing.websites[0].is_ad);

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires DATABASE_URL with migrated database
async fn test_update_status_changes_one_row_and_rejects_unknown_ids() {
    let test_db = TestDatabase::new().await;
    test_db.cleanup().await;

    let id = seed_website(&test_db.db, "Docs", None, false, false).await;
    let other = seed_website(&test_db.db, "Blog", None, false, false).await;

    test_db
        .db
        .websites
        .update_status(id, WebsiteStatus::Blocked)
        .await
        .unwrap();
    assert_eq!(
        test_db.db.websites.fetch(id).await.unwrap().status,
        WebsiteStatus::Blocked
    );
    assert_eq!(
        test_db.db.websites.fetch(other).await.unwrap().status,
        WebsiteStatus::Active
    );

    let missing = test_db
        .db
        .websites
        .update_status(Uuid::now_v7(), WebsiteStatus::Active)
        .await;
    assert!(missing.is_err());

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires DATABASE_URL with migrated database
async fn test_visit_count_increments_monotonically() {
    let test_db = TestDatabase::new().await;
    test_db.cleanup().await;

    let id = seed_website(&test_db.db, "Counter", None, false, false).await;
    assert_eq!(test_db.db.websites.record_visit(id).await.unwrap(), 1);
    assert_eq!(test_db.db.websites.record_visit(id).await.unwrap(), 2);

    test_db.cleanup().await;
}
