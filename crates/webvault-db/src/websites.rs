//! Website repository implementation.
//!
//! Holds the canonical filter-composition function for website listings:
//! every path that lists websites (public browse, admin review) goes
//! through [`compose_filters`], so text escaping, tri-state flags, and
//! pagination behave identically everywhere.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Pool, Postgres, Row, Transaction};
use uuid::Uuid;

use webvault_core::{
    new_v7, BulkReview, Error, ListWebsitesResponse, NewWebsite, PageParams, Result, Website,
    WebsiteFilters, WebsiteRepository, WebsiteStatus,
};

use crate::escape_like;

/// One bound parameter produced by filter composition, in bind order.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterParam {
    Text(String),
    Id(Uuid),
    Flag(bool),
    Rating(f32),
}

/// Compose the WHERE clause for a website listing.
///
/// Each active filter contributes one independent predicate; predicates are
/// ANDed. Returns the clause (empty string when no filter is active) and
/// the parameters to bind, in placeholder order. The text query is matched
/// as a literal substring: `%`, `_`, and `\` are escaped before being
/// interpolated into the ILIKE pattern.
pub fn compose_filters(filters: &WebsiteFilters) -> (String, Vec<FilterParam>) {
    let mut conds: Vec<String> = Vec::new();
    let mut params: Vec<FilterParam> = Vec::new();

    if let Some(q) = filters.text_query() {
        params.push(FilterParam::Text(format!("%{}%", escape_like(q))));
        conds.push(format!("w.title ILIKE ${} ESCAPE '\\'", params.len()));
    }
    if let Some(category_id) = filters.category_id {
        params.push(FilterParam::Id(category_id));
        conds.push(format!("w.category_id = ${}", params.len()));
    }
    if let Some(featured) = filters.featured {
        params.push(FilterParam::Flag(featured));
        conds.push(format!("w.is_featured = ${}", params.len()));
    }
    if filters.exclude_ads {
        conds.push("w.is_ad = FALSE".to_string());
    }
    if let Some(min_rating) = filters.min_rating {
        params.push(FilterParam::Rating(min_rating));
        conds.push(format!("w.rating >= ${}", params.len()));
    }
    if let Some(status) = filters.status {
        params.push(FilterParam::Text(status.as_str().to_string()));
        conds.push(format!("w.status = ${}", params.len()));
    }
    if filters.public_only {
        conds.push("w.is_public = TRUE".to_string());
    }

    let clause = if conds.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conds.join(" AND "))
    };
    (clause, params)
}

/// Bind composed filter parameters onto a query, in order.
macro_rules! bind_filter_params {
    ($query:expr, $params:expr) => {{
        let mut q = $query;
        for param in $params {
            q = match param {
                FilterParam::Text(s) => q.bind(s),
                FilterParam::Id(id) => q.bind(id),
                FilterParam::Flag(b) => q.bind(b),
                FilterParam::Rating(r) => q.bind(r),
            };
        }
        q
    }};
}

/// Columns selected for a full website row, with tags derived from the
/// association table (the only source of truth for tag membership).
const WEBSITE_COLUMNS: &str = r#"
    w.id, w.title, w.url, w.description, w.favicon_url, w.screenshot_url,
    w.category_id, w.is_ad, w.ad_type, w.rating, w.visit_count,
    w.is_featured, w.is_public, w.status, w.created_at_utc, w.updated_at_utc,
    COALESCE(
        (SELECT string_agg(t.slug, ',' ORDER BY t.slug)
         FROM website_tag wt JOIN tag t ON t.id = wt.tag_id
         WHERE wt.website_id = w.id),
        ''
    ) as tags
"#;

/// Map a database row to a Website.
fn map_row_to_website(row: sqlx::postgres::PgRow) -> Result<Website> {
    let status_str: String = row.get("status");
    let status = WebsiteStatus::parse(&status_str)
        .ok_or_else(|| Error::Internal(format!("unknown website status '{}'", status_str)))?;

    let tags_str: String = row.get("tags");
    let tags = if tags_str.is_empty() {
        Vec::new()
    } else {
        tags_str.split(',').map(String::from).collect()
    };

    Ok(Website {
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
    })
}

/// PostgreSQL implementation of WebsiteRepository.
pub struct PgWebsiteRepository {
    pool: Pool<Postgres>,
}

impl PgWebsiteRepository {
    /// Create a new PgWebsiteRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Insert a website within an existing transaction.
    pub async fn insert_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        website: NewWebsite,
        status: WebsiteStatus,
    ) -> Result<Uuid> {
        let id = new_v7();
        let now = Utc::now();

        sqlx::query(
            "INSERT INTO website (id, title, url, description, favicon_url, screenshot_url,
                                  category_id, is_ad, ad_type, rating, visit_count,
                                  is_featured, is_public, status, created_at_utc, updated_at_utc)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, 0, $11, $12, $13, $14, $14)",
        )
        .bind(id)
        .bind(&website.title)
        .bind(&website.url)
        .bind(&website.description)
        .bind(&website.favicon_url)
        .bind(&website.screenshot_url)
        .bind(website.category_id)
        .bind(website.is_ad)
        .bind(&website.ad_type)
        .bind(website.rating)
        .bind(website.is_featured)
        .bind(website.is_public)
        .bind(status.as_str())
        .bind(now)
        .execute(&mut **tx)
        .await
        .map_err(Error::Database)?;

        for slug in &website.tags {
            // Ensure the tag exists; submitted slugs default the name to the slug.
            sqlx::query(
                "INSERT INTO tag (id, name, slug, status, is_trending, created_at_utc, updated_at_utc)
                 VALUES ($1, $2, $2, 'active', FALSE, $3, $3)
                 ON CONFLICT (slug) DO NOTHING",
            )
            .bind(new_v7())
            .bind(slug)
            .bind(now)
            .execute(&mut **tx)
            .await
            .map_err(Error::Database)?;

            sqlx::query(
                "INSERT INTO website_tag (website_id, tag_id)
                 SELECT $1, id FROM tag WHERE slug = $2
                 ON CONFLICT (website_id, tag_id) DO NOTHING",
            )
            .bind(id)
            .bind(slug)
            .execute(&mut **tx)
            .await
            .map_err(Error::Database)?;
        }

        Ok(id)
    }

    async fn exists(&self, id: Uuid) -> Result<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM website WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(exists)
    }
}

#[async_trait]
impl WebsiteRepository for PgWebsiteRepository {
    async fn insert(&self, website: NewWebsite, status: WebsiteStatus) -> Result<Uuid> {
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;
        let id = self.insert_tx(&mut tx, website, status).await?;
        tx.commit().await.map_err(Error::Database)?;
        Ok(id)
    }

    async fn fetch(&self, id: Uuid) -> Result<Website> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM website w WHERE w.id = $1",
            WEBSITE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?
        .ok_or(Error::WebsiteNotFound(id))?;

        map_row_to_website(row)
    }

    async fn list(
        &self,
        filters: WebsiteFilters,
        page: PageParams,
    ) -> Result<ListWebsitesResponse> {
        let page = page.normalize();
        let (clause, params) = compose_filters(&filters);

        // Count query: same predicate set, no limit/offset.
        let count_sql = format!("SELECT COUNT(*) FROM website w {}", clause);
        let total: i64 = {
            let q = sqlx::query_scalar(&count_sql);
            let q = bind_filter_params!(q, params.iter().cloned());
            q.fetch_one(&self.pool).await.map_err(Error::Database)?
        };

        let rows_sql = format!(
            "SELECT {} FROM website w {} ORDER BY w.created_at_utc DESC LIMIT ${} OFFSET ${}",
            WEBSITE_COLUMNS,
            clause,
            params.len() + 1,
            params.len() + 2,
        );
        let rows = {
            let q = sqlx::query(&rows_sql);
            let mut q = bind_filter_params!(q, params.into_iter());
            q = q.bind(page.limit()).bind(page.offset());
            q.fetch_all(&self.pool).await.map_err(Error::Database)?
        };

        let websites = rows
            .into_iter()
            .map(map_row_to_website)
            .collect::<Result<Vec<_>>>()?;

        Ok(ListWebsitesResponse { websites, total })
    }

    async fn record_visit(&self, id: Uuid) -> Result<i64> {
        let count: Option<i64> = sqlx::query_scalar(
            "UPDATE website SET visit_count = visit_count + 1, updated_at_utc = $1
             WHERE id = $2 RETURNING visit_count",
        )
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        count.ok_or(Error::WebsiteNotFound(id))
    }

    async fn update_status(&self, id: Uuid, status: WebsiteStatus) -> Result<()> {
        if !self.exists(id).await? {
            return Err(Error::WebsiteNotFound(id));
        }
        sqlx::query("UPDATE website SET status = $1, updated_at_utc = $2 WHERE id = $3")
            .bind(status.as_str())
            .bind(Utc::now())
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(())
    }

    async fn bulk_review(&self, review: &BulkReview, actor: &str) -> Result<()> {
        // Validation happened at the boundary; here the batch is applied as
        // one transaction, rolled back unless every id matched a row.
        let mut ids = review.ids.clone();
        ids.sort_unstable();
        ids.dedup();

        let now = Utc::now();
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;

        let result = sqlx::query(
            "UPDATE website SET status = $1, updated_at_utc = $2 WHERE id = ANY($3)",
        )
        .bind(review.status.as_str())
        .bind(now)
        .bind(&ids)
        .execute(&mut *tx)
        .await
        .map_err(Error::Database)?;

        if result.rows_affected() != ids.len() as u64 {
            // Dropping the transaction rolls it back: zero mutations land.
            return Err(Error::InvalidInput(
                "bulk review rejected: batch did not match".to_string(),
            ));
        }

        sqlx::query(
            "INSERT INTO audit_log (id, actor, action, entity_type, entity_id, changes, created_at_utc)
             VALUES ($1, $2, 'bulk_review', 'website', 'batch', $3, $4)",
        )
        .bind(new_v7())
        .bind(actor)
        .bind(serde_json::json!({
            "ids": ids,
            "status": review.status.as_str(),
        }))
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(Error::Database)?;

        tx.commit().await.map_err(Error::Database)?;
        Ok(())
    }
}
