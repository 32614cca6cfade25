//! Public website endpoints (JSend envelope).

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value as JsonValue};
use uuid::Uuid;

use webvault_core::{
    ListWebsitesResponse, PageParams, Website, WebsiteFilters, WebsiteStatus, DEFAULT_PAGE_SIZE,
};

use crate::envelope::JSend;
use crate::{ApiError, AppState};

/// Query string for website listings.
///
/// Fields are kept flat (no nesting) so the query string stays readable:
/// `?query=rust&featured=true&page=2`.
#[derive(Debug, Default, Deserialize)]
pub struct ListWebsitesQuery {
    pub query: Option<String>,
    #[serde(alias = "categoryId")]
    pub category_id: Option<Uuid>,
    pub featured: Option<bool>,
    #[serde(default, alias = "excludeAds")]
    pub exclude_ads: bool,
    #[serde(alias = "minRating")]
    pub min_rating: Option<f32>,
    /// Honored on the admin surface only; the public listing pins `active`.
    pub status: Option<WebsiteStatus>,
    pub page: Option<i64>,
    #[serde(alias = "pageSize")]
    pub page_size: Option<i64>,
}

impl ListWebsitesQuery {
    pub fn into_parts(self) -> (WebsiteFilters, PageParams) {
        let filters = WebsiteFilters {
            query: self.query,
            category_id: self.category_id,
            featured: self.featured,
            exclude_ads: self.exclude_ads,
            min_rating: self.min_rating,
            status: self.status,
            public_only: false,
        };
        let page = PageParams {
            page: self.page.unwrap_or(1),
            page_size: self.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
        };
        (filters, page)
    }
}

/// GET /api/websites
pub async fn list_websites(
    State(state): State<AppState>,
    Query(query): Query<ListWebsitesQuery>,
) -> Result<Json<JSend<ListWebsitesResponse>>, ApiError> {
    let (filters, page) = query.into_parts();
    let data = state.websites.list_public(filters, page).await?;
    Ok(Json(JSend::success(data)))
}

/// GET /api/websites/:id
pub async fn get_website(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<JSend<Website>>, ApiError> {
    let website = state.websites.get(id).await?;
    Ok(Json(JSend::success(website)))
}

/// POST /api/websites
///
/// Public submission intake: the body is validated against the website
/// schema, then stored as a pending submission for admin review. Nothing
/// becomes publicly visible here.
pub async fn submit_website(
    State(state): State<AppState>,
    Json(payload): Json<JsonValue>,
) -> Result<(StatusCode, Json<JSend<JsonValue>>), ApiError> {
    let id = state.websites.submit(payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(JSend::success(json!({ "submission_id": id }))),
    ))
}

/// POST /api/websites/:id/visit
pub async fn record_visit(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<JSend<JsonValue>>, ApiError> {
    let count = state.websites.record_visit(id).await?;
    Ok(Json(JSend::success(json!({ "visit_count": count }))))
}

/// GET /api/categories
pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<JSend<Vec<webvault_core::Category>>>, ApiError> {
    use webvault_core::CategoryRepository;
    let categories = state.db.categories.list().await?;
    Ok(Json(JSend::success(categories)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_defaults_to_first_page_of_twelve() {
        let query = ListWebsitesQuery::default();
        let (filters, page) = query.into_parts();
        assert_eq!(page.page, 1);
        assert_eq!(page.page_size, 12);
        assert!(filters.text_query().is_none());
        assert!(!filters.public_only);
    }

    #[test]
    fn test_query_never_sets_public_only() {
        // public_only is a serving-layer decision, not client input.
        let query = ListWebsitesQuery {
            status: Some(WebsiteStatus::Blocked),
            ..Default::default()
        };
        let (filters, _) = query.into_parts();
        assert!(!filters.public_only);
        assert_eq!(filters.status, Some(WebsiteStatus::Blocked));
    }
}
