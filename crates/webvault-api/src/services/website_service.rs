//! Website service façade.

use serde_json::Value as JsonValue;
use uuid::Uuid;

use webvault_core::{
    CreateWebsiteInput, Error, ListWebsitesResponse, PageParams, Result, Website, WebsiteFilters,
    WebsiteRepository, WebsiteStatus,
};
use webvault_db::Database;

/// Thin façade over the website repositories for the public surface.
#[derive(Clone)]
pub struct WebsiteService {
    db: Database,
}

impl WebsiteService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// List websites for public browsing: caller filters apply on top of
    /// the pinned active/public scope.
    pub async fn list_public(
        &self,
        mut filters: WebsiteFilters,
        page: PageParams,
    ) -> Result<ListWebsitesResponse> {
        filters.status = Some(WebsiteStatus::Active);
        filters.public_only = true;
        self.db.websites.list(filters, page).await
    }

    /// Admin listing: no pinned scope, all caller filters honored.
    pub async fn list_admin(
        &self,
        filters: WebsiteFilters,
        page: PageParams,
    ) -> Result<ListWebsitesResponse> {
        self.db.websites.list(filters, page).await
    }

    pub async fn get(&self, id: Uuid) -> Result<Website> {
        self.db.websites.fetch(id).await
    }

    /// Accept a user submission: the payload is validated against the
    /// website schema before anything is written, then stored verbatim as
    /// a pending submission request for admin review.
    pub async fn submit(&self, payload: JsonValue) -> Result<Uuid> {
        let input: CreateWebsiteInput = serde_json::from_value(payload.clone())
            .map_err(|e| Error::InvalidInput(format!("malformed submission: {}", e)))?;
        input.validate().map_err(Error::Validation)?;

        use webvault_core::SubmissionRepository;
        self.db.submissions.create(payload).await
    }

    /// Record one visit; returns the new count.
    pub async fn record_visit(&self, id: Uuid) -> Result<i64> {
        self.db.websites.record_visit(id).await
    }
}
