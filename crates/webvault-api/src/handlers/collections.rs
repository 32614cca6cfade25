//! Curated collection endpoints (JSend envelope).

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use webvault_core::{Collection, CollectionEntry, CollectionRepository};

use crate::envelope::JSend;
use crate::{ApiError, AppState};

/// A collection together with its ordered entries.
#[derive(Debug, Serialize)]
pub struct CollectionDetail {
    #[serde(flatten)]
    pub collection: Collection,
    pub entries: Vec<CollectionEntry>,
}

/// GET /api/collections
pub async fn list_collections(
    State(state): State<AppState>,
) -> Result<Json<JSend<Vec<Collection>>>, ApiError> {
    let collections = state.db.collections.list().await?;
    Ok(Json(JSend::success(collections)))
}

/// GET /api/collections/:id
pub async fn get_collection(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<JSend<CollectionDetail>>, ApiError> {
    let (collection, entries) = state.db.collections.fetch_with_entries(id).await?;
    Ok(Json(JSend::success(CollectionDetail {
        collection,
        entries,
    })))
}
