//! Blog endpoints (JSend envelope). Only published posts are served.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;

use webvault_core::{
    BlogPost, BlogRepository, Error, ListPostsResponse, PageParams, DEFAULT_PAGE_SIZE,
};

use crate::envelope::JSend;
use crate::{ApiError, AppState};

#[derive(Debug, Default, Deserialize)]
pub struct ListPostsQuery {
    pub page: Option<i64>,
    #[serde(alias = "pageSize")]
    pub page_size: Option<i64>,
}

/// GET /api/posts
pub async fn list_posts(
    State(state): State<AppState>,
    Query(query): Query<ListPostsQuery>,
) -> Result<Json<JSend<ListPostsResponse>>, ApiError> {
    let page = PageParams {
        page: query.page.unwrap_or(1),
        page_size: query.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
    };
    let data = state.db.blog.list_published(page).await?;
    Ok(Json(JSend::success(data)))
}

/// GET /api/posts/:slug
pub async fn get_post(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<JSend<BlogPost>>, ApiError> {
    let post = state
        .db
        .blog
        .get_published_by_slug(&slug)
        .await?
        .ok_or_else(|| Error::NotFound(format!("post {}", slug)))?;
    Ok(Json(JSend::success(post)))
}
