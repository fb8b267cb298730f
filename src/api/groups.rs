//! Disclosure group endpoints (accordion, dropdown, drawer).

use axum::extract::{Path, State};

use super::{error, parse_item_index, success, ApiResult};
use crate::disclosure::{GroupAction, GroupView};
use crate::AppState;

/// GET /api/groups - List all groups.
pub async fn list_groups(State(state): State<AppState>) -> ApiResult<Vec<GroupView>> {
    success(state.groups.list(), state.store.revision())
}

/// GET /api/groups/:name - Get a single group.
pub async fn get_group(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<GroupView> {
    let revision_id = state.store.revision();

    match state.groups.get(&name) {
        Ok(group) => success(group, revision_id),
        Err(e) => error(e, revision_id),
    }
}

/// POST /api/groups/:name/activate/:index - Click an item.
pub async fn activate_item(
    State(state): State<AppState>,
    Path((name, index)): Path<(String, String)>,
) -> ApiResult<GroupView> {
    match parse_item_index(&index) {
        Ok(index) => apply(&state, &name, GroupAction::Activate(index)),
        Err(e) => error(e, state.store.revision()),
    }
}

/// POST /api/groups/:name/open/:index - Hover onto an item.
pub async fn open_item(
    State(state): State<AppState>,
    Path((name, index)): Path<(String, String)>,
) -> ApiResult<GroupView> {
    match parse_item_index(&index) {
        Ok(index) => apply(&state, &name, GroupAction::Open(index)),
        Err(e) => error(e, state.store.revision()),
    }
}

/// POST /api/groups/:name/close/:index - Hover off an item.
pub async fn close_item(
    State(state): State<AppState>,
    Path((name, index)): Path<(String, String)>,
) -> ApiResult<GroupView> {
    match parse_item_index(&index) {
        Ok(index) => apply(&state, &name, GroupAction::Close(index)),
        Err(e) => error(e, state.store.revision()),
    }
}

/// POST /api/groups/:name/dismiss - Close whatever is open.
pub async fn dismiss_group(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<GroupView> {
    apply(&state, &name, GroupAction::Dismiss)
}

fn apply(state: &AppState, name: &str, action: GroupAction) -> ApiResult<GroupView> {
    let revision_id = state.store.revision();

    match state.groups.apply(name, action) {
        Ok(group) => success(group, revision_id),
        Err(e) => error(e, revision_id),
    }
}
