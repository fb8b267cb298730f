//! Snapshot and refresh endpoints.

use axum::extract::State;
use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{error, success, ApiResult};
use crate::models::Record;
use crate::store::{bookmarked_only, Snapshot};
use crate::AppState;

/// Full store state as seen by a view.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotView {
    pub revision: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loaded_at: Option<DateTime<Utc>>,
    pub bookmarked_count: usize,
    pub records: Vec<Record>,
}

impl From<&Snapshot> for SnapshotView {
    fn from(snapshot: &Snapshot) -> Self {
        Self {
            revision: snapshot.revision,
            loaded_at: snapshot.loaded_at,
            bookmarked_count: bookmarked_only(&snapshot.collection).count(),
            records: snapshot.collection.records().to_vec(),
        }
    }
}

/// GET /api/snapshot - Records plus revision and load time.
pub async fn get_snapshot(State(state): State<AppState>) -> ApiResult<SnapshotView> {
    let snapshot = state.store.snapshot();
    success(SnapshotView::from(&snapshot), snapshot.revision)
}

/// POST /api/refresh - Reload the collection from upstream.
///
/// On failure the current state is left as it was.
pub async fn refresh_collection(State(state): State<AppState>) -> ApiResult<SnapshotView> {
    match state.refresh().await {
        Ok(snapshot) => success(SnapshotView::from(&snapshot), snapshot.revision),
        Err(e) => error(e, state.store.revision()),
    }
}
