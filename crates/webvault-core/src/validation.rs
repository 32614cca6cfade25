//! Input validation schemas for API boundaries.
//!
//! Each schema takes an untyped input (deserialized JSON) and produces
//! either a strongly-shaped value or a field-keyed map of human-readable
//! messages. Normalization policy for optional string fields: an empty or
//! whitespace-only value and an explicit `null` both mean "absent" on
//! create; on update, `null` means "clear" only where the schema allows it,
//! while an empty string means "leave untouched" (a present-but-empty form
//! field is not a clear).

use std::collections::BTreeMap;
use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use url::Url;
use uuid::Uuid;

use crate::models::{SubmissionStatus, TagStatus, WebsiteStatus};

/// Tag slugs are URL path segments: lowercase alphanumerics and hyphens.
static SLUG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z0-9-]+$").unwrap());

/// Hostname shape for the favicon proxy: dotted labels, no scheme, no path.
static DOMAIN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?i)[a-z0-9]([a-z0-9-]{0,61}[a-z0-9])?(\.[a-z0-9]([a-z0-9-]{0,61}[a-z0-9])?)+$")
        .unwrap()
});

pub const MAX_NAME_LEN: usize = 50;
pub const MAX_SLUG_LEN: usize = 50;
pub const MAX_DESCRIPTION_LEN: usize = 200;
pub const MAX_TITLE_LEN: usize = 200;

/// Inclusive rating bounds for websites.
pub const RATING_MIN: f32 = 0.0;
pub const RATING_MAX: f32 = 5.0;

// =============================================================================
// VALIDATION ERRORS
// =============================================================================

/// Field-keyed collection of human-readable validation messages.
///
/// BTreeMap keeps field order deterministic for clients and tests.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message against a field.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Messages recorded for a field, if any.
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(|v| v.as_slice())
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(|k| k.as_str())
    }

    /// Convert into `Ok(value)` when empty, `Err(self)` otherwise.
    pub fn into_result<T>(self, value: T) -> Result<T, ValidationErrors> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }

    /// Flatten into the wire shape: `{field: [messages]}`.
    pub fn as_map(&self) -> &BTreeMap<String, Vec<String>> {
        &self.0
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: Vec<&str> = self.0.keys().map(|k| k.as_str()).collect();
        write!(f, "{}", fields.join(", "))
    }
}

// =============================================================================
// PATCH SEMANTICS
// =============================================================================

/// Tri-state field for update payloads.
///
/// Distinguishes a field that was omitted from the JSON body (`Missing`)
/// from one explicitly set to `null` (`Null`) from one carrying a value.
/// Serde treats absent fields as `Default`, so update structs must mark
/// every `Patch` field `#[serde(default)]`.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Patch<T> {
    #[default]
    Missing,
    Null,
    Value(T),
}

impl<T> Patch<T> {
    pub fn is_missing(&self) -> bool {
        matches!(self, Patch::Missing)
    }

    /// The carried value, when present.
    pub fn value(&self) -> Option<&T> {
        match self {
            Patch::Value(v) => Some(v),
            _ => None,
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Patch<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<T>::deserialize(deserializer)? {
            Some(v) => Patch::Value(v),
            None => Patch::Null,
        })
    }
}

/// Normalize an optional string: trim, and map empty to absent.
pub fn normalize_opt(value: Option<String>) -> Option<String> {
    value.and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// Normalize a string patch: an empty value collapses to `Missing`
/// (a blank form field is not a clear).
fn normalize_patch(patch: Patch<String>) -> Patch<String> {
    match patch {
        Patch::Value(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                Patch::Missing
            } else {
                Patch::Value(trimmed.to_string())
            }
        }
        other => other,
    }
}

// =============================================================================
// FIELD CHECKS
// =============================================================================

fn check_slug(slug: &str, errors: &mut ValidationErrors) {
    if slug.len() > MAX_SLUG_LEN {
        errors.add("slug", format!("must be at most {} characters", MAX_SLUG_LEN));
    }
    if !SLUG_RE.is_match(slug) {
        errors.add("slug", "must contain only lowercase letters, digits, and hyphens");
    }
}

fn check_url(field: &str, raw: &str, errors: &mut ValidationErrors) {
    match Url::parse(raw) {
        Ok(parsed) if parsed.scheme() == "http" || parsed.scheme() == "https" => {}
        Ok(_) => errors.add(field, "must use http or https"),
        Err(_) => errors.add(field, "must be a well-formed URL"),
    }
}

/// Validate a bare hostname for the favicon proxy.
pub fn validate_domain(domain: &str) -> Result<String, ValidationErrors> {
    let trimmed = domain.trim().to_ascii_lowercase();
    let mut errors = ValidationErrors::new();
    if trimmed.is_empty() {
        errors.add("domain", "is required");
    } else if trimmed.len() > 253 || !DOMAIN_RE.is_match(&trimmed) {
        errors.add("domain", "must be a bare hostname like example.com");
    }
    errors.into_result(trimmed)
}

// =============================================================================
// TAG SCHEMAS
// =============================================================================

/// Untyped create-tag payload, as deserialized from the request body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateTagInput {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub color: Option<String>,
    pub group: Option<String>,
}

/// Validated create-tag value.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTag {
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub color: Option<String>,
    pub group: Option<String>,
}

impl CreateTagInput {
    pub fn validate(self) -> Result<NewTag, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let name = normalize_opt(self.name);
        let slug = normalize_opt(self.slug);
        let description = normalize_opt(self.description);
        let color = normalize_opt(self.color);
        let group = normalize_opt(self.group);

        let name = match name {
            Some(n) if n.len() <= MAX_NAME_LEN => n,
            Some(_) => {
                errors.add("name", format!("must be at most {} characters", MAX_NAME_LEN));
                String::new()
            }
            None => {
                errors.add("name", "is required");
                String::new()
            }
        };

        let slug = match slug {
            Some(s) => {
                check_slug(&s, &mut errors);
                s
            }
            None => {
                errors.add("slug", "is required");
                String::new()
            }
        };

        if let Some(d) = &description {
            if d.len() > MAX_DESCRIPTION_LEN {
                errors.add(
                    "description",
                    format!("must be at most {} characters", MAX_DESCRIPTION_LEN),
                );
            }
        }

        errors.into_result(NewTag {
            name,
            slug,
            description,
            color,
            group,
        })
    }
}

/// Untyped update-tag payload. Every field is tri-state.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTagInput {
    #[serde(default)]
    pub name: Patch<String>,
    #[serde(default)]
    pub slug: Patch<String>,
    #[serde(default)]
    pub description: Patch<String>,
    #[serde(default)]
    pub color: Patch<String>,
    #[serde(default)]
    pub group: Patch<String>,
    #[serde(default)]
    pub status: Patch<TagStatus>,
    #[serde(default)]
    pub is_trending: Patch<bool>,
}

/// Validated tag patch. `Null` on an optional field means "clear it".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TagPatch {
    pub name: Patch<String>,
    pub slug: Patch<String>,
    pub description: Patch<String>,
    pub color: Patch<String>,
    pub group: Patch<String>,
    pub status: Patch<TagStatus>,
    pub is_trending: Patch<bool>,
}

impl TagPatch {
    /// True when no field carries an update.
    pub fn is_empty(&self) -> bool {
        self.name.is_missing()
            && self.slug.is_missing()
            && self.description.is_missing()
            && self.color.is_missing()
            && self.group.is_missing()
            && self.status.is_missing()
            && self.is_trending.is_missing()
    }
}

impl UpdateTagInput {
    pub fn validate(self) -> Result<TagPatch, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let name = normalize_patch(self.name);
        let slug = normalize_patch(self.slug);
        let description = normalize_patch(self.description);
        let color = normalize_patch(self.color);
        let group = normalize_patch(self.group);

        // Required fields cannot be cleared.
        if matches!(name, Patch::Null) {
            errors.add("name", "cannot be cleared");
        }
        if matches!(slug, Patch::Null) {
            errors.add("slug", "cannot be cleared");
        }
        if matches!(self.status, Patch::Null) {
            errors.add("status", "cannot be cleared");
        }
        if matches!(self.is_trending, Patch::Null) {
            errors.add("is_trending", "cannot be cleared");
        }

        if let Patch::Value(n) = &name {
            if n.len() > MAX_NAME_LEN {
                errors.add("name", format!("must be at most {} characters", MAX_NAME_LEN));
            }
        }
        if let Patch::Value(s) = &slug {
            check_slug(s, &mut errors);
        }
        if let Patch::Value(d) = &description {
            if d.len() > MAX_DESCRIPTION_LEN {
                errors.add(
                    "description",
                    format!("must be at most {} characters", MAX_DESCRIPTION_LEN),
                );
            }
        }

        let patch = TagPatch {
            name,
            slug,
            description,
            color,
            group,
            status: self.status,
            is_trending: self.is_trending,
        };

        // Guard against accidental no-op writes silently reporting success.
        if errors.is_empty() && patch.is_empty() {
            errors.add("_", "at least one field must be present");
        }

        errors.into_result(patch)
    }
}

// =============================================================================
// WEBSITE SCHEMAS
// =============================================================================

/// Untyped create-website payload (user submission or admin entry).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateWebsiteInput {
    pub title: Option<String>,
    pub url: Option<String>,
    pub description: Option<String>,
    pub favicon_url: Option<String>,
    pub screenshot_url: Option<String>,
    pub category_id: Option<Uuid>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub rating: Option<f32>,
    #[serde(default)]
    pub is_ad: bool,
    pub ad_type: Option<String>,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default = "default_true")]
    pub is_public: bool,
}

fn default_true() -> bool {
    true
}

/// Validated create-website value.
#[derive(Debug, Clone, PartialEq)]
pub struct NewWebsite {
    pub title: String,
    pub url: String,
    pub description: Option<String>,
    pub favicon_url: Option<String>,
    pub screenshot_url: Option<String>,
    pub category_id: Option<Uuid>,
    pub tags: Vec<String>,
    pub rating: Option<f32>,
    pub is_ad: bool,
    pub ad_type: Option<String>,
    pub is_featured: bool,
    pub is_public: bool,
}

impl CreateWebsiteInput {
    pub fn validate(self) -> Result<NewWebsite, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let title = normalize_opt(self.title);
        let url = normalize_opt(self.url);
        let description = normalize_opt(self.description);
        let favicon_url = normalize_opt(self.favicon_url);
        let screenshot_url = normalize_opt(self.screenshot_url);
        let ad_type = normalize_opt(self.ad_type);

        let title = match title {
            Some(t) if t.len() <= MAX_TITLE_LEN => t,
            Some(_) => {
                errors.add("title", format!("must be at most {} characters", MAX_TITLE_LEN));
                String::new()
            }
            None => {
                errors.add("title", "is required");
                String::new()
            }
        };

        let url = match url {
            Some(u) => {
                check_url("url", &u, &mut errors);
                u
            }
            None => {
                errors.add("url", "is required");
                String::new()
            }
        };

        if let Some(f) = &favicon_url {
            check_url("favicon_url", f, &mut errors);
        }
        if let Some(s) = &screenshot_url {
            check_url("screenshot_url", s, &mut errors);
        }

        if let Some(r) = self.rating {
            if !(RATING_MIN..=RATING_MAX).contains(&r) {
                errors.add(
                    "rating",
                    format!("must be between {} and {}", RATING_MIN, RATING_MAX),
                );
            }
        }

        if ad_type.is_some() && !self.is_ad {
            errors.add("ad_type", "requires is_ad to be true");
        }

        let mut tags = Vec::with_capacity(self.tags.len());
        for raw in self.tags {
            let tag = raw.trim().to_string();
            if tag.is_empty() {
                continue;
            }
            if !SLUG_RE.is_match(&tag) {
                errors.add("tags", format!("'{}' is not a valid tag slug", tag));
                continue;
            }
            tags.push(tag);
        }

        errors.into_result(NewWebsite {
            title,
            url,
            description,
            favicon_url,
            screenshot_url,
            category_id: self.category_id,
            tags,
            rating: self.rating,
            is_ad: self.is_ad,
            ad_type,
            is_featured: self.is_featured,
            is_public: self.is_public,
        })
    }
}

// =============================================================================
// BULK REVIEW SCHEMA
// =============================================================================

/// Untyped bulk-review payload: raw identifier strings plus a target status.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BulkReviewInput {
    #[serde(default)]
    pub ids: Vec<String>,
    pub status: Option<String>,
}

/// Validated bulk-review command.
#[derive(Debug, Clone, PartialEq)]
pub struct BulkReview {
    pub ids: Vec<Uuid>,
    pub status: WebsiteStatus,
}

impl BulkReviewInput {
    /// Validate the whole batch before any mutation is attempted.
    /// A single malformed identifier rejects the entire request.
    pub fn validate(self) -> Result<BulkReview, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if self.ids.is_empty() {
            errors.add("ids", "at least one identifier is required");
        }

        let mut ids = Vec::with_capacity(self.ids.len());
        for (idx, raw) in self.ids.iter().enumerate() {
            match Uuid::parse_str(raw.trim()) {
                Ok(id) => ids.push(id),
                Err(_) => errors.add("ids", format!("entry {} is not a valid identifier", idx)),
            }
        }

        let status = match self.status.as_deref().map(str::trim) {
            Some(s) if !s.is_empty() => match WebsiteStatus::parse(s) {
                Some(status) if status.is_review_target() => status,
                Some(_) => {
                    errors.add("status", "is not a valid review outcome");
                    WebsiteStatus::Pending
                }
                None => {
                    errors.add("status", "must be one of: active, inactive, blocked");
                    WebsiteStatus::Pending
                }
            },
            _ => {
                errors.add("status", "is required");
                WebsiteStatus::Pending
            }
        };

        errors.into_result(BulkReview { ids, status })
    }
}

// =============================================================================
// SUBMISSION REVIEW SCHEMA
// =============================================================================

/// Untyped single-submission review payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReviewSubmissionInput {
    pub status: Option<String>,
    pub reviewed_by: Option<String>,
}

/// Validated single-submission review.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionReview {
    pub status: SubmissionStatus,
    pub reviewed_by: String,
}

impl ReviewSubmissionInput {
    pub fn validate(self) -> Result<SubmissionReview, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let status = match normalize_opt(self.status).as_deref() {
            Some(s) => match SubmissionStatus::parse(s) {
                Some(SubmissionStatus::Pending) => {
                    errors.add("status", "cannot move a submission back to pending");
                    SubmissionStatus::Pending
                }
                Some(status) => status,
                None => {
                    errors.add("status", "must be approved or rejected");
                    SubmissionStatus::Pending
                }
            },
            None => {
                errors.add("status", "is required");
                SubmissionStatus::Pending
            }
        };

        let reviewed_by = match normalize_opt(self.reviewed_by) {
            Some(r) => r,
            None => {
                errors.add("reviewed_by", "is required");
                String::new()
            }
        };

        errors.into_result(SubmissionReview {
            status,
            reviewed_by,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag_input(name: &str, slug: &str) -> CreateTagInput {
        CreateTagInput {
            name: Some(name.to_string()),
            slug: Some(slug.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_slug_rejects_punctuation_and_spaces() {
        let err = tag_input("My Tag", "My Tag!").validate().unwrap_err();
        assert!(err.get("slug").is_some());
    }

    #[test]
    fn test_slug_accepts_lowercase_hyphenated() {
        let tag = tag_input("My Tag", "my-tag").validate().unwrap();
        assert_eq!(tag.slug, "my-tag");
    }

    #[test]
    fn test_empty_string_normalizes_to_absent_on_create() {
        let input = CreateTagInput {
            name: Some("Rust".to_string()),
            slug: Some("rust".to_string()),
            description: Some("   ".to_string()),
            ..Default::default()
        };
        let tag = input.validate().unwrap();
        assert_eq!(tag.description, None);
    }

    #[test]
    fn test_create_tag_requires_name_and_slug() {
        let err = CreateTagInput::default().validate().unwrap_err();
        assert!(err.get("name").is_some());
        assert!(err.get("slug").is_some());
    }

    #[test]
    fn test_empty_patch_is_rejected() {
        let err = UpdateTagInput::default().validate().unwrap_err();
        assert_eq!(err.get("_").unwrap()[0], "at least one field must be present");
    }

    #[test]
    fn test_patch_distinguishes_missing_null_and_value() {
        let input: UpdateTagInput =
            serde_json::from_str(r#"{"description": null, "name": "Rust"}"#).unwrap();
        assert_eq!(input.description, Patch::Null);
        assert_eq!(input.name, Patch::Value("Rust".to_string()));
        assert!(input.color.is_missing());

        let patch = input.validate().unwrap();
        // Null clears the optional description; color stays untouched.
        assert_eq!(patch.description, Patch::Null);
        assert!(patch.color.is_missing());
    }

    #[test]
    fn test_empty_string_in_patch_means_untouched_not_cleared() {
        let input: UpdateTagInput =
            serde_json::from_str(r#"{"description": "", "name": "Rust"}"#).unwrap();
        let patch = input.validate().unwrap();
        assert!(patch.description.is_missing());
    }

    #[test]
    fn test_patch_cannot_clear_required_fields() {
        let input: UpdateTagInput = serde_json::from_str(r#"{"name": null}"#).unwrap();
        let err = input.validate().unwrap_err();
        assert_eq!(err.get("name").unwrap()[0], "cannot be cleared");
    }

    #[test]
    fn test_patch_of_only_empty_strings_is_an_empty_patch() {
        let input: UpdateTagInput =
            serde_json::from_str(r#"{"description": "", "color": "  "}"#).unwrap();
        let err = input.validate().unwrap_err();
        assert!(err.get("_").is_some());
    }

    #[test]
    fn test_website_requires_title_and_wellformed_url() {
        let input = CreateWebsiteInput {
            title: Some("".to_string()),
            url: Some("not a url".to_string()),
            ..Default::default()
        };
        let err = input.validate().unwrap_err();
        assert!(err.get("title").is_some());
        assert!(err.get("url").is_some());
    }

    #[test]
    fn test_website_rejects_non_http_scheme() {
        let input = CreateWebsiteInput {
            title: Some("FTP Mirror".to_string()),
            url: Some("ftp://mirror.example.com".to_string()),
            ..Default::default()
        };
        let err = input.validate().unwrap_err();
        assert_eq!(err.get("url").unwrap()[0], "must use http or https");
    }

    #[test]
    fn test_website_rating_bounds_are_inclusive() {
        let ok = CreateWebsiteInput {
            title: Some("Docs".to_string()),
            url: Some("https://docs.example.com".to_string()),
            rating: Some(5.0),
            ..Default::default()
        };
        assert!(ok.validate().is_ok());

        let too_high = CreateWebsiteInput {
            title: Some("Docs".to_string()),
            url: Some("https://docs.example.com".to_string()),
            rating: Some(5.1),
            ..Default::default()
        };
        assert!(too_high.validate().is_err());
    }

    #[test]
    fn test_website_ad_type_requires_ad_flag() {
        let input = CreateWebsiteInput {
            title: Some("Sponsor".to_string()),
            url: Some("https://sponsor.example.com".to_string()),
            ad_type: Some("banner".to_string()),
            is_ad: false,
            ..Default::default()
        };
        let err = input.validate().unwrap_err();
        assert!(err.get("ad_type").is_some());
    }

    #[test]
    fn test_bulk_review_rejects_whole_batch_on_one_bad_id() {
        let input = BulkReviewInput {
            ids: vec![
                Uuid::nil().to_string(),
                Uuid::nil().to_string(),
                "not-a-uuid".to_string(),
                Uuid::nil().to_string(),
                Uuid::nil().to_string(),
            ],
            status: Some("active".to_string()),
        };
        let err = input.validate().unwrap_err();
        assert!(err.get("ids").unwrap()[0].contains("entry 2"));
    }

    #[test]
    fn test_bulk_review_rejects_pending_target() {
        let input = BulkReviewInput {
            ids: vec![Uuid::nil().to_string()],
            status: Some("pending".to_string()),
        };
        let err = input.validate().unwrap_err();
        assert!(err.get("status").is_some());
    }

    #[test]
    fn test_bulk_review_requires_ids() {
        let input = BulkReviewInput {
            ids: vec![],
            status: Some("blocked".to_string()),
        };
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_validate_domain_accepts_hostnames() {
        assert_eq!(validate_domain("Example.COM").unwrap(), "example.com");
        assert!(validate_domain("docs.rs").is_ok());
    }

    #[test]
    fn test_validate_domain_rejects_urls_and_garbage() {
        assert!(validate_domain("https://example.com").is_err());
        assert!(validate_domain("example.com/path").is_err());
        assert!(validate_domain("localhost").is_err());
        assert!(validate_domain("").is_err());
    }

    #[test]
    fn test_review_submission_rejects_pending() {
        let input = ReviewSubmissionInput {
            status: Some("pending".to_string()),
            reviewed_by: Some("admin".to_string()),
        };
        assert!(input.validate().is_err());
    }
}
