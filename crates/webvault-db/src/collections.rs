//! Collection repository implementation.
//!
//! Collections are curated, orderable groupings of websites; the
//! `collection_item` row carries the position key and an optional note.

use async_trait::async_trait;
use sqlx::{Pool, Postgres, Row};
use uuid::Uuid;

use webvault_core::{
    Collection, CollectionEntry, CollectionRepository, Error, Result, Website, WebsiteStatus,
};

/// PostgreSQL implementation of CollectionRepository.
pub struct PgCollectionRepository {
    pool: Pool<Postgres>,
}

impl PgCollectionRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

fn map_row_to_collection(row: &sqlx::postgres::PgRow) -> Collection {
    Collection {
        id: row.get("id"),
        name: row.get("name"),
        slug: row.get("slug"),
        description: row.get("description"),
        is_public: row.get("is_public"),
        created_at_utc: row.get("created_at_utc"),
        updated_at_utc: row.get("updated_at_utc"),
    }
}

#[async_trait]
impl CollectionRepository for PgCollectionRepository {
    async fn list(&self) -> Result<Vec<Collection>> {
        let rows = sqlx::query(
            "SELECT id, name, slug, description, is_public, created_at_utc, updated_at_utc
             FROM collection
             WHERE is_public = TRUE
             ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(rows.iter().map(map_row_to_collection).collect())
    }

    async fn fetch_with_entries(&self, id: Uuid) -> Result<(Collection, Vec<CollectionEntry>)> {
        let row = sqlx::query(
            "SELECT id, name, slug, description, is_public, created_at_utc, updated_at_utc
             FROM collection WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?
        .ok_or_else(|| Error::NotFound(format!("Collection {} not found", id)))?;

        let collection = map_row_to_collection(&row);

        let rows = sqlx::query(
            r#"
            SELECT
                ci.position, ci.note,
                w.id, w.title, w.url, w.description, w.favicon_url, w.screenshot_url,
                w.category_id, w.is_ad, w.ad_type, w.rating, w.visit_count,
                w.is_featured, w.is_public, w.status, w.created_at_utc, w.updated_at_utc,
                COALESCE(
                    (SELECT string_agg(t.slug, ',' ORDER BY t.slug)
                     FROM website_tag wt JOIN tag t ON t.id = wt.tag_id
                     WHERE wt.website_id = w.id),
                    ''
                ) as tags
            FROM collection_item ci
            JOIN website w ON w.id = ci.website_id
            WHERE ci.collection_id = $1
            ORDER BY ci.position
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        let entries = rows
            .into_iter()
            .map(|row| {
                let status_str: String = row.get("status");
                let status = WebsiteStatus::parse(&status_str).ok_or_else(|| {
                    Error::Internal(format!("unknown website status '{}'", status_str))
                })?;
                let tags_str: String = row.get("tags");
                let tags = if tags_str.is_empty() {
                    Vec::new()
                } else {
                    tags_str.split(',').map(String::from).collect()
                };

                Ok(CollectionEntry {
                    position: row.get("position"),
                    note: row.get("note"),
                    website: Website {
                        id: row.get("id"),
                        title: row.get("title"),
                        url: row.get("url"),
                        description: row.get("description"),
                        favicon_url: row.get("favicon_url"),
                        screenshot_url: row.get("screenshot_url"),
                        tags,
                        category_id: row.get("category_id"),
                        is_ad: row.get("is_ad"),
                        ad_type: row.get("ad_type"),
                        rating: row.get("rating"),
                        visit_count: row.get("visit_count"),
                        is_featured: row.get("is_featured"),
                        is_public: row.get("is_public"),
                        status,
                        created_at_utc: row.get("created_at_utc"),
                        updated_at_utc: row.get("updated_at_utc"),
                    },
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok((collection, entries))
    }
}
