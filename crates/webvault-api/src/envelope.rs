//! Standardized API response envelopes.
//!
//! Two wire shapes coexist, per endpoint, and both are exact contracts;
//! clients parse them positionally:
//!
//! - **Coded envelope** (tag listing, admin bulk review): success carries
//!   `code: 0`; failures carry a string `code` plus `status`. Timestamps
//!   are `YYYY-MM-DD HH:mm:ss` rendered in a fixed UTC+8 offset.
//! - **JSend envelope** (website endpoints): a `status` discriminant of
//!   `success`/`fail`/`error`, so callers can branch without inspecting the
//!   HTTP status first.
//!
//! Construction is pure: no clocks are read except through [`Utc::now`] at
//! the call site of the coded constructors.

use std::collections::BTreeMap;

use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use uuid::Uuid;

use webvault_core::{Error, ValidationErrors};

/// Header carrying the request correlation id, echoed back in responses.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Hour offset of the fixed zone used by coded-envelope timestamps.
const CODED_TZ_OFFSET_HOURS: i64 = 8;

/// The request id from the incoming headers, or a fresh UUIDv7 when the
/// middleware did not supply one.
pub fn request_id_from(headers: &HeaderMap) -> String {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::now_v7().to_string())
}

/// Render a coded-envelope timestamp: `YYYY-MM-DD HH:mm:ss` in UTC+8.
pub fn coded_timestamp(now: DateTime<Utc>) -> String {
    (now + Duration::hours(CODED_TZ_OFFSET_HOURS))
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

// =============================================================================
// CODED ENVELOPE
// =============================================================================

/// Coded success payload. `code` is the number zero, always.
#[derive(Debug, Serialize)]
pub struct CodedSuccess<T> {
    pub code: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    pub message: String,
    #[serde(rename = "requestId")]
    pub request_id: String,
    pub timestamp: String,
}

impl<T: Serialize> CodedSuccess<T> {
    pub fn new(data: T, message: &str, request_id: String) -> Self {
        Self {
            code: 0,
            data: Some(data),
            message: message.to_string(),
            request_id,
            timestamp: coded_timestamp(Utc::now()),
        }
    }
}

impl CodedSuccess<()> {
    /// A success with a message but no payload (bulk operations).
    pub fn message_only(message: &str, request_id: String) -> Self {
        Self {
            code: 0,
            data: None,
            message: message.to_string(),
            request_id,
            timestamp: coded_timestamp(Utc::now()),
        }
    }
}

/// Coded failure payload. `code` is a string error code; `status`
/// distinguishes client failures from server errors.
#[derive(Debug, Serialize)]
pub struct CodedFailure {
    pub status: &'static str,
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<BTreeMap<String, Vec<String>>>,
    #[serde(rename = "requestId")]
    pub request_id: String,
    pub timestamp: String,
}

impl CodedFailure {
    pub fn fail(code: &str, message: &str, errors: Option<&ValidationErrors>, request_id: String) -> Self {
        Self {
            status: "fail",
            code: code.to_string(),
            message: message.to_string(),
            errors: errors.map(|e| e.as_map().clone()),
            request_id,
            timestamp: coded_timestamp(Utc::now()),
        }
    }

    pub fn error(code: &str, message: &str, request_id: String) -> Self {
        Self {
            status: "error",
            code: code.to_string(),
            message: message.to_string(),
            errors: None,
            request_id,
            timestamp: coded_timestamp(Utc::now()),
        }
    }
}

/// Map a core error onto a coded-envelope response.
///
/// Validation and malformed-input failures surface as 422 `fail` bodies so
/// callers can render field messages; unique-key conflicts become 409.
/// Everything else is a generic 500 whose detail goes to the log, not the
/// wire.
pub fn coded_error_response(err: Error, request_id: String) -> Response {
    match err {
        Error::Validation(errors) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(CodedFailure::fail(
                "VALIDATION",
                "validation failed",
                Some(&errors),
                request_id,
            )),
        )
            .into_response(),
        Error::InvalidInput(msg) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(CodedFailure::fail("INVALID_INPUT", &msg, None, request_id)),
        )
            .into_response(),
        Error::NotFound(msg) => (
            StatusCode::NOT_FOUND,
            Json(CodedFailure::fail("NOT_FOUND", &msg, None, request_id)),
        )
            .into_response(),
        Error::WebsiteNotFound(id) => (
            StatusCode::NOT_FOUND,
            Json(CodedFailure::fail(
                "NOT_FOUND",
                &format!("website {} not found", id),
                None,
                request_id,
            )),
        )
            .into_response(),
        Error::Unauthorized(msg) => (
            StatusCode::UNAUTHORIZED,
            Json(CodedFailure::fail("UNAUTHORIZED", &msg, None, request_id)),
        )
            .into_response(),
        Error::Database(ref db_err) if is_unique_violation(db_err) => (
            StatusCode::CONFLICT,
            Json(CodedFailure::fail(
                "CONFLICT",
                "a record with the same unique value already exists",
                None,
                request_id,
            )),
        )
            .into_response(),
        err => {
            tracing::error!(error = %err, request_id = %request_id, "Request failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(CodedFailure::error(
                    "INTERNAL",
                    "Internal server error",
                    request_id,
                )),
            )
                .into_response()
        }
    }
}

/// True when a sqlx error is a Postgres unique-constraint violation.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db) if db.kind() == sqlx::error::ErrorKind::UniqueViolation
    )
}

// =============================================================================
// JSEND ENVELOPE
// =============================================================================

/// JSend-style discriminated response body.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum JSend<T> {
    Success {
        data: T,
    },
    Fail {
        data: BTreeMap<String, Vec<String>>,
    },
    Error {
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        code: Option<String>,
    },
}

impl<T: Serialize> JSend<T> {
    pub fn success(data: T) -> Self {
        JSend::Success { data }
    }
}

impl JSend<()> {
    pub fn fail(errors: &ValidationErrors) -> Self {
        JSend::Fail {
            data: errors.as_map().clone(),
        }
    }

    /// A fail-status body for non-field failures (e.g. not-found).
    pub fn fail_with(field: &str, message: &str) -> Self {
        let mut errors = ValidationErrors::new();
        errors.add(field, message);
        JSend::Fail {
            data: errors.as_map().clone(),
        }
    }

    pub fn error(message: &str, code: Option<&str>) -> Self {
        JSend::Error {
            message: message.to_string(),
            code: code.map(str::to_string),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_coded_timestamp_is_utc_plus_eight() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 23, 30, 5).unwrap();
        assert_eq!(coded_timestamp(now), "2024-03-02 07:30:05");
    }

    #[test]
    fn test_coded_success_serializes_zero_code() {
        let body = CodedSuccess::new(
            serde_json::json!({"items": []}),
            "ok",
            "req-1".to_string(),
        );
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["code"], 0);
        assert_eq!(json["requestId"], "req-1");
        assert!(json["timestamp"].is_string());
    }

    #[test]
    fn test_coded_message_only_omits_data() {
        let body = CodedSuccess::message_only("updated", "req-2".to_string());
        let json = serde_json::to_value(&body).unwrap();
        assert!(json.get("data").is_none());
        assert_eq!(json["message"], "updated");
    }

    #[test]
    fn test_coded_failure_carries_string_code_and_errors() {
        let mut errors = ValidationErrors::new();
        errors.add("slug", "must match [a-z0-9-]+");
        let body = CodedFailure::fail("VALIDATION", "invalid input", Some(&errors), "r".into());
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["status"], "fail");
        assert_eq!(json["code"], "VALIDATION");
        assert_eq!(json["errors"]["slug"][0], "must match [a-z0-9-]+");
    }

    #[test]
    fn test_jsend_discriminant_is_single_field() {
        let ok = serde_json::to_value(JSend::success(serde_json::json!({"id": 1}))).unwrap();
        assert_eq!(ok["status"], "success");
        assert_eq!(ok["data"]["id"], 1);

        let err = serde_json::to_value(JSend::error("Internal server error", None)).unwrap();
        assert_eq!(err["status"], "error");
        assert!(err.get("code").is_none());

        let fail = serde_json::to_value(JSend::fail_with("id", "not found")).unwrap();
        assert_eq!(fail["status"], "fail");
        assert_eq!(fail["data"]["id"][0], "not found");
    }

    #[test]
    fn test_request_id_prefers_header() {
        let mut headers = HeaderMap::new();
        headers.insert(REQUEST_ID_HEADER, "abc-123".parse().unwrap());
        assert_eq!(request_id_from(&headers), "abc-123");

        let generated = request_id_from(&HeaderMap::new());
        assert_eq!(Uuid::parse_str(&generated).unwrap().get_version_num(), 7);
    }
}
