//! Core traits for WebVault abstractions.
//!
//! These traits define the interfaces the database layer implements,
//! keeping handlers and services testable against fakes.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use uuid::Uuid;

use crate::error::Result;
use crate::models::*;
use crate::validation::{BulkReview, NewTag, NewWebsite, SubmissionReview, TagPatch};

// =============================================================================
// PAGINATION
// =============================================================================

/// Default number of rows per listing page.
pub const DEFAULT_PAGE_SIZE: i64 = 12;

/// Hard cap on caller-supplied page sizes.
pub const MAX_PAGE_SIZE: i64 = 100;

/// 1-indexed page parameters.
///
/// [`PageParams::normalize`] is the single normalization step for malformed
/// pagination: call it before anything reaches a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PageParams {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_page_size")]
    pub page_size: i64,
}

fn default_page() -> i64 {
    1
}

fn default_page_size() -> i64 {
    DEFAULT_PAGE_SIZE
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageParams {
    /// Clamp malformed values: non-positive page becomes 1, non-positive
    /// page size becomes the default, oversized page size is capped.
    pub fn normalize(self) -> Self {
        let page = self.page.max(1);
        let page_size = if self.page_size <= 0 {
            DEFAULT_PAGE_SIZE
        } else {
            self.page_size.min(MAX_PAGE_SIZE)
        };
        Self { page, page_size }
    }

    /// Row offset for the normalized page: `(page - 1) * page_size`.
    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.page_size
    }

    pub fn limit(&self) -> i64 {
        self.page_size
    }
}

// =============================================================================
// WEBSITE LISTING
// =============================================================================

/// Filter parameters for website listings.
///
/// Each active filter contributes one independent predicate; the predicates
/// are ANDed together. No active filter means an unconstrained query.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebsiteFilters {
    /// Free-text query, matched case-insensitively against the title as a
    /// literal substring. Empty or whitespace-only means "no text filter".
    pub query: Option<String>,
    /// Exact category match.
    pub category_id: Option<Uuid>,
    /// Tri-state featured filter: Some(true) / Some(false) / None (any).
    pub featured: Option<bool>,
    /// When set, advertisement rows are excluded entirely.
    #[serde(default)]
    pub exclude_ads: bool,
    /// Inclusive lower bound on rating.
    pub min_rating: Option<f32>,
    /// Exact lifecycle status match; absent means any. The public surface
    /// pins this to `active`.
    pub status: Option<WebsiteStatus>,
    /// Restrict to publicly visible rows. Set by the serving layer, never
    /// from client input.
    #[serde(skip)]
    pub public_only: bool,
}

impl WebsiteFilters {
    /// The text filter, if one is actually active.
    pub fn text_query(&self) -> Option<&str> {
        self.query
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
    }
}

/// Response for listing websites.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListWebsitesResponse {
    pub websites: Vec<Website>,
    /// Total matching rows across all pages (same predicates, no limit).
    pub total: i64,
}

/// Repository for website rows.
#[async_trait]
pub trait WebsiteRepository: Send + Sync {
    /// Insert a validated website with the given lifecycle status.
    async fn insert(&self, website: NewWebsite, status: WebsiteStatus) -> Result<Uuid>;

    /// Fetch one website by id.
    async fn fetch(&self, id: Uuid) -> Result<Website>;

    /// List websites matching the filters, plus the unpaged total.
    async fn list(&self, filters: WebsiteFilters, page: PageParams) -> Result<ListWebsitesResponse>;

    /// Increment the visit counter, returning the new value.
    async fn record_visit(&self, id: Uuid) -> Result<i64>;

    /// Apply one status transition.
    async fn update_status(&self, id: Uuid, status: WebsiteStatus) -> Result<()>;

    /// Apply a reviewed status transition to every id in the batch,
    /// all-or-nothing. `actor` is recorded in the audit log.
    async fn bulk_review(&self, review: &BulkReview, actor: &str) -> Result<()>;
}

// =============================================================================
// TAG LISTING
// =============================================================================

/// Sort orders for the tag listing endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagOrder {
    #[default]
    Name,
    CreatedAt,
    WebsiteCount,
}

/// Query parameters for listing tags.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListTagsRequest {
    /// Substring match against tag name (wildcards escaped).
    pub search: Option<String>,
    /// Exact status match; absent means any.
    pub status: Option<TagStatus>,
    /// Sort order; the wire parameter is `orderBy`.
    #[serde(default, alias = "orderBy")]
    pub order_by: TagOrder,
}

/// Tag listing payload: rows plus aggregate counters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagListData {
    pub items: Vec<Tag>,
    pub total: i64,
    pub active: i64,
    pub inactive: i64,
}

/// Repository for tags.
#[async_trait]
pub trait TagRepository: Send + Sync {
    async fn create(&self, tag: NewTag) -> Result<Uuid>;

    async fn get_by_slug(&self, slug: &str) -> Result<Option<Tag>>;

    async fn list(&self, req: ListTagsRequest) -> Result<TagListData>;

    /// Apply a validated patch. Fails with NotFound for unknown ids.
    async fn update(&self, id: Uuid, patch: TagPatch) -> Result<()>;

    /// Delete a tag. Fails with InvalidInput while websites still use it.
    async fn delete(&self, id: Uuid) -> Result<()>;
}

// =============================================================================
// CATEGORIES, COLLECTIONS, BLOG
// =============================================================================

/// Repository for browsing categories.
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Category>>;
}

/// Repository for curated collections.
#[async_trait]
pub trait CollectionRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Collection>>;

    /// Fetch a collection with its entries in position order.
    async fn fetch_with_entries(&self, id: Uuid) -> Result<(Collection, Vec<CollectionEntry>)>;
}

/// Response for listing blog posts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListPostsResponse {
    pub posts: Vec<BlogPostSummary>,
    pub total: i64,
}

/// Repository for blog posts. The public surface only sees published posts.
#[async_trait]
pub trait BlogRepository: Send + Sync {
    async fn list_published(&self, page: PageParams) -> Result<ListPostsResponse>;

    async fn get_published_by_slug(&self, slug: &str) -> Result<Option<BlogPost>>;
}

// =============================================================================
// SUBMISSIONS, AUDIT, SESSIONS
// =============================================================================

/// Response for listing submissions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListSubmissionsResponse {
    pub submissions: Vec<SubmissionRequest>,
    pub total: i64,
}

/// Repository for submission requests.
#[async_trait]
pub trait SubmissionRepository: Send + Sync {
    /// Record a proposal payload for admin review.
    async fn create(&self, payload: JsonValue) -> Result<Uuid>;

    async fn fetch(&self, id: Uuid) -> Result<SubmissionRequest>;

    async fn list(&self, status: Option<SubmissionStatus>, page: PageParams)
        -> Result<ListSubmissionsResponse>;

    /// Apply a review decision; creates the website row on approval.
    async fn review(&self, id: Uuid, review: SubmissionReview) -> Result<()>;
}

/// Append-only audit trail writer.
#[async_trait]
pub trait AuditLogRepository: Send + Sync {
    async fn record(
        &self,
        actor: &str,
        action: &str,
        entity_type: &str,
        entity_id: &str,
        changes: JsonValue,
    ) -> Result<Uuid>;

    async fn list_recent(&self, limit: i64) -> Result<Vec<AuditLog>>;
}

/// Session revocation for sign-out. Issuance lives with the identity provider.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Revoke a session token. Returns false when no such session existed.
    async fn revoke(&self, token: &str) -> Result<bool>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_clamps_non_positive_page() {
        let page = PageParams { page: 0, page_size: 12 }.normalize();
        assert_eq!(page.page, 1);
        let page = PageParams { page: -3, page_size: 12 }.normalize();
        assert_eq!(page.page, 1);
    }

    #[test]
    fn test_normalize_replaces_bad_page_size_with_default() {
        let page = PageParams { page: 2, page_size: 0 }.normalize();
        assert_eq!(page.page_size, DEFAULT_PAGE_SIZE);
        let page = PageParams { page: 2, page_size: -5 }.normalize();
        assert_eq!(page.page_size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_normalize_caps_page_size() {
        let page = PageParams { page: 1, page_size: 10_000 }.normalize();
        assert_eq!(page.page_size, MAX_PAGE_SIZE);
    }

    #[test]
    fn test_offset_is_one_indexed() {
        let page = PageParams { page: 1, page_size: 12 }.normalize();
        assert_eq!(page.offset(), 0);
        let page = PageParams { page: 3, page_size: 12 }.normalize();
        assert_eq!(page.offset(), 24);
    }

    #[test]
    fn test_default_page_size_is_twelve() {
        assert_eq!(PageParams::default().page_size, 12);
    }

    #[test]
    fn test_whitespace_query_means_no_text_filter() {
        let filters = WebsiteFilters {
            query: Some("   ".to_string()),
            ..Default::default()
        };
        assert_eq!(filters.text_query(), None);

        let filters = WebsiteFilters {
            query: Some("  rust docs ".to_string()),
            ..Default::default()
        };
        assert_eq!(filters.text_query(), Some("rust docs"));
    }
}
