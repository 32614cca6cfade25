//! Tag repository implementation.
//!
//! `website_count` is derived from the `website_tag` association table on
//! read; there is no stored counter column to drift out of sync.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Pool, Postgres, Row};
use uuid::Uuid;

use webvault_core::{
    Error, ListTagsRequest, NewTag, Patch, Result, Tag, TagListData, TagOrder, TagPatch,
    TagRepository, TagStatus,
};

use crate::escape_like;

/// Map a database row (joined with its usage count) to a Tag.
fn map_row_to_tag(row: sqlx::postgres::PgRow) -> Result<Tag> {
    let status_str: String = row.get("status");
    let status = TagStatus::parse(&status_str)
        .ok_or_else(|| Error::Internal(format!("unknown tag status '{}'", status_str)))?;

    Ok(Tag {
        id: row.get("id"),
        name: row.get("name"),
        slug: row.get("slug"),
        description: row.get("description"),
        color: row.get("color"),
        group: row.get("tag_group"),
        status,
        website_count: row.get("website_count"),
        is_trending: row.get("is_trending"),
        created_at_utc: row.get("created_at_utc"),
        updated_at_utc: row.get("updated_at_utc"),
    })
}

/// PostgreSQL implementation of TagRepository.
pub struct PgTagRepository {
    pool: Pool<Postgres>,
}

impl PgTagRepository {
    /// Create a new PgTagRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

const TAG_COLUMNS: &str = r#"
    t.id, t.name, t.slug, t.description, t.color, t.tag_group, t.status,
    t.is_trending, t.created_at_utc, t.updated_at_utc,
    COALESCE((SELECT COUNT(*) FROM website_tag wt WHERE wt.tag_id = t.id), 0) as website_count
"#;

#[async_trait]
impl TagRepository for PgTagRepository {
    async fn create(&self, tag: NewTag) -> Result<Uuid> {
        let id = webvault_core::new_v7();
        let now = Utc::now();

        sqlx::query(
            "INSERT INTO tag (id, name, slug, description, color, tag_group, status,
                              is_trending, created_at_utc, updated_at_utc)
             VALUES ($1, $2, $3, $4, $5, $6, 'active', FALSE, $7, $7)",
        )
        .bind(id)
        .bind(&tag.name)
        .bind(&tag.slug)
        .bind(&tag.description)
        .bind(&tag.color)
        .bind(&tag.group)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(id)
    }

    async fn get_by_slug(&self, slug: &str) -> Result<Option<Tag>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM tag t WHERE t.slug = $1",
            TAG_COLUMNS
        ))
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        row.map(map_row_to_tag).transpose()
    }

    async fn list(&self, req: ListTagsRequest) -> Result<TagListData> {
        let mut conds: Vec<String> = Vec::new();
        let mut search_pattern: Option<String> = None;

        if let Some(search) = req.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            search_pattern = Some(format!("%{}%", escape_like(search)));
            conds.push(format!("t.name ILIKE ${} ESCAPE '\\'", conds.len() + 1));
        }

        // Aggregate counters are computed over the searched set, before the
        // status filter narrows the items.
        let search_clause = if conds.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conds.join(" AND "))
        };

        let counts_sql = format!(
            "SELECT COUNT(*) as total,
                    COUNT(*) FILTER (WHERE t.status = 'active') as active,
                    COUNT(*) FILTER (WHERE t.status = 'inactive') as inactive
             FROM tag t {}",
            search_clause
        );
        let counts_row = {
            let mut q = sqlx::query(&counts_sql);
            if let Some(pattern) = &search_pattern {
                q = q.bind(pattern);
            }
            q.fetch_one(&self.pool).await.map_err(Error::Database)?
        };
        let total: i64 = counts_row.get("total");
        let active: i64 = counts_row.get("active");
        let inactive: i64 = counts_row.get("inactive");

        if req.status.is_some() {
            conds.push(format!("t.status = ${}", conds.len() + 1));
        }
        let items_clause = if conds.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conds.join(" AND "))
        };

        let order_clause = match req.order_by {
            TagOrder::Name => "t.name ASC",
            TagOrder::CreatedAt => "t.created_at_utc DESC",
            TagOrder::WebsiteCount => "website_count DESC, t.name ASC",
        };

        let items_sql = format!(
            "SELECT {} FROM tag t {} ORDER BY {}",
            TAG_COLUMNS, items_clause, order_clause
        );
        let rows = {
            let mut q = sqlx::query(&items_sql);
            if let Some(pattern) = &search_pattern {
                q = q.bind(pattern);
            }
            if let Some(status) = req.status {
                q = q.bind(status.as_str());
            }
            q.fetch_all(&self.pool).await.map_err(Error::Database)?
        };

        let items = rows
            .into_iter()
            .map(map_row_to_tag)
            .collect::<Result<Vec<_>>>()?;

        Ok(TagListData {
            items,
            total,
            active,
            inactive,
        })
    }

    async fn update(&self, id: Uuid, patch: TagPatch) -> Result<()> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM tag WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(Error::Database)?;
        if !exists {
            return Err(Error::NotFound(format!("Tag {} not found", id)));
        }

        let mut updates: Vec<String> = vec!["updated_at_utc = $1".to_string()];
        let now = Utc::now();
        // $1 = now, $2 = id, then dynamic params start at $3
        let mut param_idx = 3;

        let mut push = |updates: &mut Vec<String>, column: &str| {
            updates.push(format!("{} = ${}", column, param_idx));
            param_idx += 1;
        };

        if let Patch::Value(_) = &patch.name {
            push(&mut updates, "name");
        }
        if let Patch::Value(_) = &patch.slug {
            push(&mut updates, "slug");
        }
        match &patch.description {
            Patch::Value(_) => push(&mut updates, "description"),
            Patch::Null => updates.push("description = NULL".to_string()),
            Patch::Missing => {}
        }
        match &patch.color {
            Patch::Value(_) => push(&mut updates, "color"),
            Patch::Null => updates.push("color = NULL".to_string()),
            Patch::Missing => {}
        }
        match &patch.group {
            Patch::Value(_) => push(&mut updates, "tag_group"),
            Patch::Null => updates.push("tag_group = NULL".to_string()),
            Patch::Missing => {}
        }
        if let Patch::Value(_) = &patch.status {
            push(&mut updates, "status");
        }
        if let Patch::Value(_) = &patch.is_trending {
            push(&mut updates, "is_trending");
        }

        let sql = format!("UPDATE tag SET {} WHERE id = $2", updates.join(", "));

        let mut q = sqlx::query(&sql).bind(now).bind(id);
        if let Patch::Value(name) = &patch.name {
            q = q.bind(name);
        }
        if let Patch::Value(slug) = &patch.slug {
            q = q.bind(slug);
        }
        if let Patch::Value(description) = &patch.description {
            q = q.bind(description);
        }
        if let Patch::Value(color) = &patch.color {
            q = q.bind(color);
        }
        if let Patch::Value(group) = &patch.group {
            q = q.bind(group);
        }
        if let Patch::Value(status) = &patch.status {
            q = q.bind(status.as_str());
        }
        if let Patch::Value(is_trending) = &patch.is_trending {
            q = q.bind(is_trending);
        }

        q.execute(&self.pool).await.map_err(Error::Database)?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let usage: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM website_tag WHERE tag_id = $1")
                .bind(id)
                .fetch_one(&self.pool)
                .await
                .map_err(Error::Database)?;
        if usage > 0 {
            return Err(Error::InvalidInput(format!(
                "tag is still used by {} website(s)",
                usage
            )));
        }

        let result = sqlx::query("DELETE FROM tag WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;
        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!("Tag {} not found", id)));
        }
        Ok(())
    }
}
