//! Domain models for WebVault entities.
//!
//! These are the row-shaped types returned by the repository layer and the
//! DTOs exposed through the HTTP API. Status enums are stored as lowercase
//! text columns and parsed on read.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use uuid::Uuid;

// =============================================================================
// WEBSITE
// =============================================================================

/// Lifecycle status of a website entry.
///
/// Websites are never hard-deleted: `Blocked` and `Inactive` are the
/// removal mechanisms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WebsiteStatus {
    Active,
    Inactive,
    Pending,
    Blocked,
}

impl WebsiteStatus {
    /// Lowercase text form used in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            WebsiteStatus::Active => "active",
            WebsiteStatus::Inactive => "inactive",
            WebsiteStatus::Pending => "pending",
            WebsiteStatus::Blocked => "blocked",
        }
    }

    /// Parse from the database text form.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(WebsiteStatus::Active),
            "inactive" => Some(WebsiteStatus::Inactive),
            "pending" => Some(WebsiteStatus::Pending),
            "blocked" => Some(WebsiteStatus::Blocked),
            _ => None,
        }
    }

    /// Whether this status is a valid target for an admin review decision.
    ///
    /// `pending` is the entry state of a submission, not a review outcome.
    pub fn is_review_target(&self) -> bool {
        !matches!(self, WebsiteStatus::Pending)
    }
}

/// A directory entry: one website with its metadata and counters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Website {
    pub id: Uuid,
    pub title: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favicon_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub screenshot_url: Option<String>,
    /// Tag slugs, derived from the website_tag association table.
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<Uuid>,
    pub is_ad: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ad_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f32>,
    pub visit_count: i64,
    pub is_featured: bool,
    pub is_public: bool,
    pub status: WebsiteStatus,
    pub created_at_utc: DateTime<Utc>,
    pub updated_at_utc: DateTime<Utc>,
}

// =============================================================================
// TAG
// =============================================================================

/// Visibility status of a tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagStatus {
    Active,
    Inactive,
    Hidden,
}

impl TagStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TagStatus::Active => "active",
            TagStatus::Inactive => "inactive",
            TagStatus::Hidden => "hidden",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(TagStatus::Active),
            "inactive" => Some(TagStatus::Inactive),
            "hidden" => Some(TagStatus::Hidden),
            _ => None,
        }
    }
}

/// A tag with usage counters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tag {
    pub id: Uuid,
    pub name: String,
    /// URL-safe unique key, `[a-z0-9-]+`.
    pub slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Optional grouping label for tag pickers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    pub status: TagStatus,
    pub website_count: i64,
    pub is_trending: bool,
    pub created_at_utc: DateTime<Utc>,
    pub updated_at_utc: DateTime<Utc>,
}

// =============================================================================
// CATEGORY
// =============================================================================

/// A top-level browsing category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub display_order: i32,
    pub created_at_utc: DateTime<Utc>,
}

// =============================================================================
// COLLECTION
// =============================================================================

/// A curated, orderable grouping of websites.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collection {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub is_public: bool,
    pub created_at_utc: DateTime<Utc>,
    pub updated_at_utc: DateTime<Utc>,
}

/// Membership row linking a website into a collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionItem {
    pub id: Uuid,
    pub collection_id: Uuid,
    pub website_id: Uuid,
    /// Ordering key within the collection, ascending.
    pub position: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub created_at_utc: DateTime<Utc>,
}

/// A collection item joined with its website, as served to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionEntry {
    pub position: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub website: Website,
}

// =============================================================================
// BLOG
// =============================================================================

/// Publication status of a blog post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlogStatus {
    Draft,
    Published,
    Archived,
}

impl BlogStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BlogStatus::Draft => "draft",
            BlogStatus::Published => "published",
            BlogStatus::Archived => "archived",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "draft" => Some(BlogStatus::Draft),
            "published" => Some(BlogStatus::Published),
            "archived" => Some(BlogStatus::Archived),
            _ => None,
        }
    }
}

/// A blog post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlogPost {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub status: BlogStatus,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
    pub created_at_utc: DateTime<Utc>,
    pub updated_at_utc: DateTime<Utc>,
}

/// Listing summary for blog posts (content omitted).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlogPostSummary {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
}

// =============================================================================
// SUBMISSION
// =============================================================================

/// Review status of a submission request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionStatus {
    Pending,
    Approved,
    Rejected,
}

impl SubmissionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionStatus::Pending => "pending",
            SubmissionStatus::Approved => "approved",
            SubmissionStatus::Rejected => "rejected",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(SubmissionStatus::Pending),
            "approved" => Some(SubmissionStatus::Approved),
            "rejected" => Some(SubmissionStatus::Rejected),
            _ => None,
        }
    }
}

/// A user-submitted website proposal awaiting admin action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionRequest {
    pub id: Uuid,
    /// Set once a website row has been created from this submission.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website_id: Option<Uuid>,
    /// The proposed website fields, as submitted.
    pub payload: JsonValue,
    pub status: SubmissionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewed_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewed_at: Option<DateTime<Utc>>,
    pub created_at_utc: DateTime<Utc>,
    pub updated_at_utc: DateTime<Utc>,
}

// =============================================================================
// AUDIT LOG
// =============================================================================

/// Append-only record of an admin mutation. Written once, never updated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditLog {
    pub id: Uuid,
    pub actor: String,
    pub action: String,
    pub entity_type: String,
    pub entity_id: String,
    /// Serialized change-set describing what the action did.
    pub changes: JsonValue,
    pub created_at_utc: DateTime<Utc>,
}

// =============================================================================
// SESSION
// =============================================================================

/// Minimal session record. Authentication is delegated to the identity
/// provider; this only exists so sign-out can revoke a token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user_id: String,
    pub created_at_utc: DateTime<Utc>,
    pub expires_at_utc: DateTime<Utc>,
}
