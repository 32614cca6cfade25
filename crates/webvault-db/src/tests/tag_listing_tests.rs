//! Tests for tag listing: status narrowing, counters over the searched
//! set, and slug lookup.

use uuid::Uuid;

use webvault_core::{CreateTagInput, ListTagsRequest, Patch, TagPatch, TagRepository, TagStatus};

use crate::test_fixtures::TestDatabase;
use crate::Database;

async fn seed_tag(db: &Database, name: &str, slug: &str) -> Uuid {
    let input = CreateTagInput {
        name: Some(name.to_string()),
        slug: Some(slug.to_string()),
        ..Default::default()
    };
    db.tags
        .create(input.validate().expect("seed tag must validate"))
        .await
        .expect("seed tag insert failed")
}

#[tokio::test]
#[ignore] // Requires DATABASE_URL with migrated database
async fn test_status_filter_narrows_items_but_not_counters() {
    let test_db = TestDatabase::new().await;
    test_db.cleanup().await;

    seed_tag(&test_db.db, "Rust", "rust").await;
    seed_tag(&test_db.db, "Python", "python").await;
    let retired = seed_tag(&test_db.db, "Perl", "perl").await;
    test_db
        .db
        .tags
        .update(
            retired,
            TagPatch {
                status: Patch::Value(TagStatus::Inactive),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let listing = test_db
        .db
        .tags
        .list(ListTagsRequest {
            status: Some(TagStatus::Inactive),
            ..Default::default()
        })
        .await
        .unwrap();

    // Items honor the status filter; counters describe the whole set.
    assert_eq!(listing.items.len(), 1);
    assert_eq!(listing.items[0].slug, "perl");
    assert_eq!(listing.total, 3);
    assert_eq!(listing.active, 2);
    assert_eq!(listing.inactive, 1);

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires DATABASE_URL with migrated database
async fn test_search_and_status_filters_combine() {
    let test_db = TestDatabase::new().await;
    test_db.cleanup().await;

    seed_tag(&test_db.db, "Rust Lang", "rust-lang").await;
    let web = seed_tag(&test_db.db, "Rust Web", "rust-web").await;
    seed_tag(&test_db.db, "Python", "python").await;
    test_db
        .db
        .tags
        .update(
            web,
            TagPatch {
                status: Patch::Value(TagStatus::Inactive),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let listing = test_db
        .db
        .tags
        .list(ListTagsRequest {
            search: Some("Rust".to_string()),
            status: Some(TagStatus::Inactive),
            ..Default::default()
        })
        .await
        .unwrap();

    // Counters cover the searched set, not the whole table.
    assert_eq!(listing.total, 2);
    assert_eq!(listing.active, 1);
    assert_eq!(listing.inactive, 1);
    assert_eq!(listing.items.len(), 1);
    assert_eq!(listing.items[0].slug, "rust-web");

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires DATABASE_URL with migrated database
async fn test_get_by_slug_round_trip() {
    let test_db = TestDatabase::new().await;
    test_db.cleanup().await;

    let id = seed_tag(&test_db.db, "Rust", "rust").await;

    let tag = test_db.db.tags.get_by_slug("rust").await.unwrap().unwrap();
    assert_eq!(tag.id, id);
    assert_eq!(tag.name, "Rust");

    assert!(test_db.db.tags.get_by_slug("no-such-tag").await.unwrap().is_none());

    test_db.cleanup().await;
}
