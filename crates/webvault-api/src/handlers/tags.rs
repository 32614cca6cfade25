//! Tag endpoints (coded envelope).
//!
//! Every response here carries the coded shape: `code: 0` with a request id
//! and UTC+8 timestamp on success, a string code on failure.

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use uuid::Uuid;

use webvault_core::{CreateTagInput, Error, ListTagsRequest, TagRepository, UpdateTagInput};

use crate::envelope::{coded_error_response, request_id_from, CodedSuccess};
use crate::AppState;

/// GET /api/tags
pub async fn list_tags(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(req): Query<ListTagsRequest>,
) -> Response {
    let request_id = request_id_from(&headers);
    match state.db.tags.list(req).await {
        Ok(data) => {
            (StatusCode::OK, Json(CodedSuccess::new(data, "ok", request_id))).into_response()
        }
        Err(err) => coded_error_response(err, request_id),
    }
}

/// GET /api/tags/by-slug/:slug
pub async fn get_tag_by_slug(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(slug): Path<String>,
) -> Response {
    let request_id = request_id_from(&headers);
    match state.db.tags.get_by_slug(&slug).await {
        Ok(Some(tag)) => {
            (StatusCode::OK, Json(CodedSuccess::new(tag, "ok", request_id))).into_response()
        }
        Ok(None) => coded_error_response(
            Error::NotFound(format!("tag {} not found", slug)),
            request_id,
        ),
        Err(err) => coded_error_response(err, request_id),
    }
}

/// POST /api/tags
pub async fn create_tag(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<CreateTagInput>,
) -> Response {
    let request_id = request_id_from(&headers);
    let tag = match input.validate() {
        Ok(tag) => tag,
        Err(errors) => return coded_error_response(errors.into(), request_id),
    };
    match state.db.tags.create(tag).await {
        Ok(id) => (
            StatusCode::CREATED,
            Json(CodedSuccess::new(json!({ "id": id }), "created", request_id)),
        )
            .into_response(),
        Err(err) => coded_error_response(err, request_id),
    }
}

/// PATCH /api/tags/:id
///
/// Partial update: absent fields stay untouched, explicit nulls clear only
/// the nullable fields, and an entirely empty patch is rejected upstream by
/// validation.
pub async fn update_tag(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateTagInput>,
) -> Response {
    let request_id = request_id_from(&headers);
    let patch = match input.validate() {
        Ok(patch) => patch,
        Err(errors) => return coded_error_response(errors.into(), request_id),
    };
    match state.db.tags.update(id, patch).await {
        Ok(()) => (
            StatusCode::OK,
            Json(CodedSuccess::message_only("updated", request_id)),
        )
            .into_response(),
        Err(err) => coded_error_response(err, request_id),
    }
}

/// DELETE /api/tags/:id
pub async fn delete_tag(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Response {
    let request_id = request_id_from(&headers);
    match state.db.tags.delete(id).await {
        Ok(()) => (
            StatusCode::OK,
            Json(CodedSuccess::message_only("deleted", request_id)),
        )
            .into_response(),
        Err(err) => coded_error_response(err, request_id),
    }
}
