//! Blog post repository implementation.
//!
//! The public surface only ever sees published posts; drafts and archived
//! posts are invisible to it.

use async_trait::async_trait;
use sqlx::{Pool, Postgres, Row};

use webvault_core::{
    BlogPost, BlogPostSummary, BlogRepository, BlogStatus, Error, ListPostsResponse, PageParams,
    Result,
};

/// PostgreSQL implementation of BlogRepository.
pub struct PgBlogRepository {
    pool: Pool<Postgres>,
}

impl PgBlogRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BlogRepository for PgBlogRepository {
    async fn list_published(&self, page: PageParams) -> Result<ListPostsResponse> {
        let page = page.normalize();

        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM blog_post WHERE status = 'published'")
                .fetch_one(&self.pool)
                .await
                .map_err(Error::Database)?;

        let rows = sqlx::query(
            "SELECT id, title, slug, cover_image, author, tags, published_at
             FROM blog_post
             WHERE status = 'published'
             ORDER BY published_at DESC
             LIMIT $1 OFFSET $2",
        )
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        let posts = rows
            .into_iter()
            .map(|row| BlogPostSummary {
                id: row.get("id"),
                title: row.get("title"),
                slug: row.get("slug"),
                cover_image: row.get("cover_image"),
                author: row.get("author"),
                tags: row.get::<Vec<String>, _>("tags"),
                published_at: row.get("published_at"),
            })
            .collect();

        Ok(ListPostsResponse { posts, total })
    }

    async fn get_published_by_slug(&self, slug: &str) -> Result<Option<BlogPost>> {
        let row = sqlx::query(
            "SELECT id, title, slug, status, content, cover_image, author, tags,
                    published_at, created_at_utc, updated_at_utc
             FROM blog_post
             WHERE slug = $1 AND status = 'published'",
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        row.map(|row| {
            let status_str: String = row.get("status");
            let status = BlogStatus::parse(&status_str)
                .ok_or_else(|| Error::Internal(format!("unknown blog status '{}'", status_str)))?;
            Ok(BlogPost {
                id: row.get("id"),
                title: row.get("title"),
                slug: row.get("slug"),
                status,
                content: row.get("content"),
                cover_image: row.get("cover_image"),
                author: row.get("author"),
                tags: row.get::<Vec<String>, _>("tags"),
                published_at: row.get("published_at"),
                created_at_utc: row.get("created_at_utc"),
                updated_at_utc: row.get("updated_at_utc"),
            })
        })
        .transpose()
    }
}
