//! Favicon proxy endpoint.
//!
//! Lookup failures are not errors from the client's point of view: when no
//! upstream yields an icon, the handler redirects to the bundled default
//! asset. The endpoint never answers 5xx for a fetch failure.

use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Redirect, Response};
use axum::Json;
use serde::Deserialize;

use webvault_core::validate_domain;

use crate::envelope::JSend;
use crate::services::FetchedIcon;
use crate::AppState;

/// Icons are stable; let clients and CDNs hold them for a day.
const CACHE_CONTROL: &str = "public, max-age=86400, immutable";

#[derive(Debug, Default, Deserialize)]
pub struct FaviconQuery {
    pub domain: Option<String>,
}

/// Shape the lookup outcome: a fetched icon is served with cache headers,
/// exhausted upstreams become a redirect to the default asset.
fn icon_response(icon: Option<FetchedIcon>, default_asset: &str) -> Response {
    match icon {
        Some(icon) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, icon.content_type),
                (header::CACHE_CONTROL, CACHE_CONTROL.to_string()),
            ],
            icon.bytes,
        )
            .into_response(),
        None => Redirect::temporary(default_asset).into_response(),
    }
}

/// GET /api/favicon?domain=example.com
pub async fn get_favicon(
    State(state): State<AppState>,
    Query(query): Query<FaviconQuery>,
) -> Response {
    let domain = match validate_domain(query.domain.as_deref().unwrap_or("")) {
        Ok(domain) => domain,
        Err(errors) => {
            return (StatusCode::UNPROCESSABLE_ENTITY, Json(JSend::fail(&errors))).into_response();
        }
    };

    let icon = state.favicon.fetch(&domain).await;
    if icon.is_none() {
        tracing::debug!(
            subsystem = "favicon",
            op = "get_favicon",
            %domain,
            "All sources failed, redirecting to default asset"
        );
    }
    icon_response(icon, &state.config.default_favicon_asset)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_failure_redirects_to_default_asset_never_5xx() {
        let response = icon_response(None, "/assets/default-favicon.png");
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert!(!response.status().is_server_error());
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/assets/default-favicon.png"
        );
    }

    #[test]
    fn test_fetched_icon_is_served_with_cache_headers() {
        let icon = FetchedIcon {
            bytes: vec![0x00, 0x01],
            content_type: "image/png".to_string(),
        };
        let response = icon_response(Some(icon), "/assets/default-favicon.png");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers().get(header::CONTENT_TYPE).unwrap(), "image/png");
        assert_eq!(
            response.headers().get(header::CACHE_CONTROL).unwrap(),
            CACHE_CONTROL
        );
    }
}
