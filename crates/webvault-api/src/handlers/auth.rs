//! Sign-out endpoint. Session issuance lives with the identity provider;
//! this surface only revokes.

use axum::extract::State;
use axum::http::{header, HeaderMap};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use webvault_core::{Error, SessionRepository};

use crate::envelope::JSend;
use crate::{ApiError, AppState};

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "wv_session";

/// `Set-Cookie` value that clears the session cookie.
const CLEAR_COOKIE: &str = "wv_session=; Path=/; Max-Age=0; HttpOnly; SameSite=Lax";

/// Extract the session token from the Cookie header, if present.
fn session_token(headers: &HeaderMap) -> Option<String> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    cookies.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        if name == SESSION_COOKIE && !value.is_empty() {
            Some(value.to_string())
        } else {
            None
        }
    })
}

/// POST /api/auth/sign-out
///
/// Revokes the session named by the cookie and instructs the client to
/// clear it. A request without a live session is 401, not a silent no-op.
pub async fn sign_out(State(state): State<AppState>, headers: HeaderMap) -> Result<Response, ApiError> {
    let token = session_token(&headers)
        .ok_or_else(|| Error::Unauthorized("no active session".to_string()))?;

    let revoked = state.db.sessions.revoke(&token).await?;
    if !revoked {
        return Err(Error::Unauthorized("no active session".to_string()).into());
    }

    Ok((
        [(header::SET_COOKIE, CLEAR_COOKIE)],
        Json(JSend::success(json!({ "redirect": "/" }))),
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers_with_cookie(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, value.parse().unwrap());
        headers
    }

    #[test]
    fn test_session_token_found_among_other_cookies() {
        let headers = headers_with_cookie("theme=dark; wv_session=tok-123; lang=en");
        assert_eq!(session_token(&headers), Some("tok-123".to_string()));
    }

    #[test]
    fn test_session_token_absent() {
        assert_eq!(session_token(&HeaderMap::new()), None);
        let headers = headers_with_cookie("theme=dark");
        assert_eq!(session_token(&headers), None);
        let headers = headers_with_cookie("wv_session=");
        assert_eq!(session_token(&headers), None);
    }
}
