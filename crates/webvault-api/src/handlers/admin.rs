//! Admin review surface.
//!
//! Bulk review speaks the coded envelope; the rest of the admin surface
//! uses JSend like the public website endpoints.

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use webvault_core::{
    AuditLog, AuditLogRepository, BulkReviewInput, ListSubmissionsResponse, ListWebsitesResponse,
    PageParams, ReviewSubmissionInput, SubmissionRepository, SubmissionRequest, SubmissionStatus,
    ValidationErrors, WebsiteRepository, WebsiteStatus, DEFAULT_PAGE_SIZE,
};

use crate::envelope::{coded_error_response, request_id_from, CodedSuccess, JSend};
use crate::handlers::websites::ListWebsitesQuery;
use crate::{ApiError, AppState};

/// Header naming the admin performing a mutation, recorded in the audit log.
const ACTOR_HEADER: &str = "x-actor";

fn actor_from(headers: &HeaderMap) -> String {
    headers
        .get(ACTOR_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|s| !s.trim().is_empty())
        .unwrap_or("admin")
        .to_string()
}

/// GET /api/admin/websites
///
/// Unlike the public listing, no status or visibility scope is pinned.
pub async fn list_websites(
    State(state): State<AppState>,
    Query(query): Query<ListWebsitesQuery>,
) -> Result<Json<JSend<ListWebsitesResponse>>, ApiError> {
    let (filters, page) = query.into_parts();
    let data = state.websites.list_admin(filters, page).await?;
    Ok(Json(JSend::success(data)))
}

/// POST /api/admin/websites/bulk-review
///
/// All-or-nothing: the whole batch is validated before any row changes,
/// and a batch touching an unknown id mutates nothing.
pub async fn bulk_review_websites(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<BulkReviewInput>,
) -> Response {
    let request_id = request_id_from(&headers);
    let review = match input.validate() {
        Ok(review) => review,
        Err(errors) => return coded_error_response(errors.into(), request_id),
    };
    let actor = actor_from(&headers);
    match state.db.websites.bulk_review(&review, &actor).await {
        Ok(()) => (
            StatusCode::OK,
            Json(CodedSuccess::message_only("updated", request_id)),
        )
            .into_response(),
        Err(err) => coded_error_response(err, request_id),
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateStatusInput {
    pub status: Option<String>,
}

impl UpdateStatusInput {
    /// Same status rules as bulk review: the target must be a review
    /// outcome, never `pending`.
    fn validate(&self) -> Result<WebsiteStatus, ValidationErrors> {
        let mut errors = ValidationErrors::new();
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
        errors.into_result(status)
    }
}

/// POST /api/admin/websites/:id/status
///
/// Single-website counterpart of bulk review; the transition is recorded
/// in the audit log with the acting admin.
pub async fn update_website_status(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateStatusInput>,
) -> Result<Json<JSend<serde_json::Value>>, ApiError> {
    let status = input.validate().map_err(webvault_core::Error::from)?;
    state.db.websites.update_status(id, status).await?;

    let actor = actor_from(&headers);
    state
        .db
        .audit
        .record(
            &actor,
            "update_status",
            "website",
            &id.to_string(),
            json!({ "status": status.as_str() }),
        )
        .await?;

    Ok(Json(JSend::success(json!({
        "id": id,
        "status": status,
    }))))
}

#[derive(Debug, Default, Deserialize)]
pub struct ListSubmissionsQuery {
    pub status: Option<SubmissionStatus>,
    pub page: Option<i64>,
    #[serde(alias = "pageSize")]
    pub page_size: Option<i64>,
}

/// GET /api/admin/submissions
pub async fn list_submissions(
    State(state): State<AppState>,
    Query(query): Query<ListSubmissionsQuery>,
) -> Result<Json<JSend<ListSubmissionsResponse>>, ApiError> {
    let page = PageParams {
        page: query.page.unwrap_or(1),
        page_size: query.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
    };
    let data = state.db.submissions.list(query.status, page).await?;
    Ok(Json(JSend::success(data)))
}

/// GET /api/admin/submissions/:id
pub async fn get_submission(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<JSend<SubmissionRequest>>, ApiError> {
    let submission = state.db.submissions.fetch(id).await?;
    Ok(Json(JSend::success(submission)))
}

/// POST /api/admin/submissions/:id/review
///
/// Approval re-validates the stored payload and creates the website row in
/// the same transaction as the status flip.
pub async fn review_submission(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(input): Json<ReviewSubmissionInput>,
) -> Result<Json<JSend<serde_json::Value>>, ApiError> {
    let review = input.validate().map_err(webvault_core::Error::from)?;
    let decision = review.status;
    state.db.submissions.review(id, review).await?;

    let actor = actor_from(&headers);
    tracing::info!(
        subsystem = "admin",
        op = "review_submission",
        submission_id = %id,
        actor = %actor,
        "Submission reviewed"
    );
    Ok(Json(JSend::success(json!({
        "id": id,
        "status": decision,
    }))))
}

#[derive(Debug, Deserialize)]
pub struct AuditLogQuery {
    pub limit: Option<i64>,
}

/// GET /api/admin/audit-logs
pub async fn list_audit_logs(
    State(state): State<AppState>,
    Query(query): Query<AuditLogQuery>,
) -> Result<Json<JSend<Vec<AuditLog>>>, ApiError> {
    let limit = query.limit.unwrap_or(50).clamp(1, 500);
    let logs = state.db.audit.list_recent(limit).await?;
    Ok(Json(JSend::success(logs)))
}
