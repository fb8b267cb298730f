//! Server-sent events subscription to store snapshots.

use std::convert::Infallible;

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::Stream;

use super::SnapshotView;
use crate::AppState;

/// GET /api/events - One `snapshot` event now, then one per state change.
pub async fn stream_events(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.store.subscribe();

    let stream = futures::stream::unfold((rx, true), |(mut rx, first)| async move {
        // Intermediate revisions may be skipped; subscribers only need the latest.
        if !first && rx.changed().await.is_err() {
            return None;
        }
        let view = SnapshotView::from(&*rx.borrow_and_update());

        let event = Event::default()
            .event("snapshot")
            .id(view.revision.to_string())
            .json_data(&view)
            .unwrap_or_else(|e| {
                tracing::error!("Failed to encode snapshot event: {:?}", e);
                Event::default().event("error")
            });
        Some((Ok(event), (rx, false)))
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
