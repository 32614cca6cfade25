//! Favicon proxy lookup with sequential upstream fallback.

use std::time::Duration;

use tracing::{debug, warn};

use webvault_core::validate_domain;

/// Per-upstream fetch timeout. Three sequential attempts stay well under
/// typical request deadlines.
const UPSTREAM_TIMEOUT: Duration = Duration::from_secs(4);

/// Refuse to proxy icons larger than this.
const MAX_ICON_BYTES: usize = 256 * 1024;

/// The three upstream sources tried in order, stopping at first success.
pub fn upstream_sources(domain: &str) -> [String; 3] {
    [
        format!("https://www.google.com/s2/favicons?domain={}&sz=64", domain),
        format!("https://icons.duckduckgo.com/ip3/{}.ico", domain),
        format!("https://{}/favicon.ico", domain),
    ]
}

/// A successfully proxied icon.
#[derive(Debug, Clone)]
pub struct FetchedIcon {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// Outbound favicon fetcher.
#[derive(Clone)]
pub struct FaviconService {
    client: reqwest::Client,
}

impl FaviconService {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Try each upstream source in order; return the first icon that
    /// downloads successfully, or None when every source fails. Failed
    /// attempts are abandoned without compensating action.
    ///
    /// The domain must already be validated (see [`validate_domain`]);
    /// this method revalidates as a second line of defense against
    /// request forgery through crafted hostnames.
    pub async fn fetch(&self, domain: &str) -> Option<FetchedIcon> {
        let domain = validate_domain(domain).ok()?;

        for url in upstream_sources(&domain) {
            match self.try_source(&url).await {
                Ok(Some(icon)) => {
                    debug!(
                        subsystem = "favicon",
                        op = "fetch_upstream",
                        %url,
                        size = icon.bytes.len(),
                        "Favicon fetched"
                    );
                    return Some(icon);
                }
                Ok(None) => {}
                Err(e) => {
                    warn!(
                        subsystem = "favicon",
                        op = "fetch_upstream",
                        %url,
                        error = %e,
                        "Favicon source failed, trying next"
                    );
                }
            }
        }
        None
    }

    async fn try_source(&self, url: &str) -> Result<Option<FetchedIcon>, reqwest::Error> {
        let response = self
            .client
            .get(url)
            .timeout(UPSTREAM_TIMEOUT)
            .send()
            .await?;

        if !response.status().is_success() {
            return Ok(None);
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("image/x-icon")
            .to_string();
        if !content_type.starts_with("image/") {
            return Ok(None);
        }

        let bytes = response.bytes().await?;
        if bytes.is_empty() || bytes.len() > MAX_ICON_BYTES {
            return Ok(None);
        }

        Ok(Some(FetchedIcon {
            bytes: bytes.to_vec(),
            content_type,
        }))
    }
}

impl Default for FaviconService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sources_are_ordered_and_domain_scoped() {
        let sources = upstream_sources("docs.rs");
        assert!(sources[0].contains("google.com/s2/favicons?domain=docs.rs"));
        assert!(sources[1].contains("icons.duckduckgo.com/ip3/docs.rs.ico"));
        assert_eq!(sources[2], "https://docs.rs/favicon.ico");
    }

    #[tokio::test]
    async fn test_fetch_rejects_invalid_domain_without_network() {
        let service = FaviconService::new();
        // URL-shaped input never reaches an upstream.
        assert!(service.fetch("https://evil.example/x").await.is_none());
        assert!(service.fetch("").await.is_none());
    }
}
