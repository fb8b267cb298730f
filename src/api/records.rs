//! Record and bookmark endpoints.

use axum::extract::{Path, State};

use super::{error, parse_record_id, success, ApiResult};
use crate::errors::AppError;
use crate::models::Record;
use crate::store::bookmarked_only;
use crate::AppState;

/// GET /api/records - List all records in load order.
pub async fn list_records(State(state): State<AppState>) -> ApiResult<Vec<Record>> {
    let snapshot = state.store.snapshot();
    success(snapshot.collection.records().to_vec(), snapshot.revision)
}

/// GET /api/records/:id - Get a single record.
pub async fn get_record(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Record> {
    let snapshot = state.store.snapshot();

    let record = parse_record_id(&id).and_then(|id| {
        snapshot
            .collection
            .get(id)
            .cloned()
            .ok_or(AppError::RecordNotFound(id))
    });
    match record {
        Ok(record) => success(record, snapshot.revision),
        Err(e) => error(e, snapshot.revision),
    }
}

/// POST /api/records/:id/toggle - Flip the bookmark flag (the view's onToggle).
pub async fn toggle_record(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Record> {
    match parse_record_id(&id).and_then(|id| state.store.toggle(id)) {
        Ok(update) => success(update.record, update.revision),
        Err(e) => error(e, state.store.revision()),
    }
}

/// PUT /api/records/:id/bookmark - Mark a record as bookmarked.
pub async fn bookmark_record(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Record> {
    set_bookmarked(&state, &id, true)
}

/// DELETE /api/records/:id/bookmark - Remove a bookmark.
pub async fn unbookmark_record(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Record> {
    set_bookmarked(&state, &id, false)
}

fn set_bookmarked(state: &AppState, id: &str, bookmarked: bool) -> ApiResult<Record> {
    match parse_record_id(id).and_then(|id| state.store.set_bookmarked(id, bookmarked)) {
        Ok(update) => success(update.record, update.revision),
        Err(e) => error(e, state.store.revision()),
    }
}

/// GET /api/bookmarks - Bookmarked records only, in load order.
pub async fn list_bookmarks(State(state): State<AppState>) -> ApiResult<Vec<Record>> {
    let snapshot = state.store.snapshot();
    let bookmarked = bookmarked_only(&snapshot.collection).cloned().collect();
    success(bookmarked, snapshot.revision)
}
