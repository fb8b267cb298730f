//! Bookmark store: the single owner of the loaded collection.
//!
//! State lives in a `tokio::sync::watch` channel. Every transition runs the
//! pure reducer against the current snapshot and swaps in the result while the
//! channel's lock is held, so transitions are serialized and subscribers always
//! observe whole snapshots.

mod reducer;

pub use reducer::*;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::watch;

use crate::errors::AppError;
use crate::models::{Collection, Record, RecordId};

/// Immutable view of the store at one revision.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    /// Bumped on every transition that changes state.
    pub revision: u64,
    pub collection: Arc<Collection>,
    /// When the current collection was committed; `None` before the first load.
    pub loaded_at: Option<DateTime<Utc>>,
    /// Ticket number of the last committed load.
    pub load_sequence: u64,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            revision: 0,
            collection: Arc::new(Collection::new()),
            loaded_at: None,
            load_sequence: 0,
        }
    }
}

/// Ticket handed out when a load starts. Later tickets supersede earlier ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct LoadTicket(u64);

impl LoadTicket {
    pub fn sequence(&self) -> u64 {
        self.0
    }
}

/// A record as it stood right after a bookmark intent, with the revision
/// that state was published under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordUpdate {
    pub record: Record,
    pub revision: u64,
}

/// State container shared by all handlers.
pub struct BookmarkStore {
    state: watch::Sender<Snapshot>,
    issued_loads: AtomicU64,
}

impl Default for BookmarkStore {
    fn default() -> Self {
        Self::new()
    }
}

impl BookmarkStore {
    pub fn new() -> Self {
        let (state, _) = watch::channel(Snapshot::default());
        Self {
            state,
            issued_loads: AtomicU64::new(0),
        }
    }

    /// Current snapshot.
    pub fn snapshot(&self) -> Snapshot {
        self.state.borrow().clone()
    }

    pub fn revision(&self) -> u64 {
        self.state.borrow().revision
    }

    /// Receiver that always yields the latest snapshot.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.state.subscribe()
    }

    /// Look up a single record.
    pub fn get(&self, id: RecordId) -> Result<Record, AppError> {
        self.state
            .borrow()
            .collection
            .get(id)
            .cloned()
            .ok_or(AppError::RecordNotFound(id))
    }

    /// Replace the collection unconditionally.
    ///
    /// Reloading a collection equal to the current one keeps the revision and
    /// does not wake subscribers.
    pub fn apply_load(&self, collection: Collection) -> Snapshot {
        let mut committed = Snapshot::default();
        self.state.send_if_modified(|snapshot| {
            let sequence = snapshot.load_sequence;
            let changed = commit(snapshot, collection, sequence);
            committed = snapshot.clone();
            changed
        });
        tracing::info!(
            revision = committed.revision,
            records = committed.collection.len(),
            "Collection applied"
        );
        committed
    }

    /// Start a load. The ticket must be presented to [`Self::commit_load`].
    pub fn begin_load(&self) -> LoadTicket {
        LoadTicket(self.issued_loads.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Commit a loaded collection unless a newer load already landed.
    ///
    /// Returns `None` when the response was stale and discarded.
    pub fn commit_load(&self, ticket: LoadTicket, collection: Collection) -> Option<Snapshot> {
        let mut committed = None;
        self.state.send_if_modified(|snapshot| {
            if ticket.0 <= snapshot.load_sequence {
                return false;
            }
            let changed = commit(snapshot, collection, ticket.0);
            committed = Some(snapshot.clone());
            changed
        });

        match &committed {
            Some(snapshot) => tracing::info!(
                load = ticket.0,
                revision = snapshot.revision,
                records = snapshot.collection.len(),
                "Collection loaded"
            ),
            None => tracing::warn!(
                load = ticket.0,
                "Discarding stale load response; a newer load was already applied"
            ),
        }
        committed
    }

    /// Set one record's bookmark flag and return the record afterwards.
    ///
    /// An unknown id leaves the state untouched and is reported as
    /// [`AppError::RecordNotFound`].
    pub fn set_bookmarked(
        &self,
        id: RecordId,
        bookmarked: bool,
    ) -> Result<RecordUpdate, AppError> {
        self.dispatch(id, Intent::SetBookmarked { id, bookmarked })
    }

    /// Flip one record's bookmark flag and return the record afterwards.
    pub fn toggle(&self, id: RecordId) -> Result<RecordUpdate, AppError> {
        self.dispatch(id, Intent::Toggle(id))
    }

    fn dispatch(&self, id: RecordId, intent: Intent) -> Result<RecordUpdate, AppError> {
        let mut outcome = Outcome::Unchanged;
        let mut record = None;
        let mut revision = 0;
        self.state.send_if_modified(|snapshot| {
            let reduction = reduce(&snapshot.collection, intent);
            outcome = reduction.outcome;
            let changed = outcome == Outcome::Changed;
            if changed {
                snapshot.collection = Arc::new(reduction.collection);
                snapshot.revision += 1;
            }
            record = snapshot.collection.get(id).cloned();
            revision = snapshot.revision;
            changed
        });

        match (outcome, record) {
            (Outcome::RecordNotFound(_), _) | (_, None) => {
                tracing::warn!(id, "Bookmark intent for unknown record ignored");
                Err(AppError::RecordNotFound(id))
            }
            (outcome, Some(record)) => {
                tracing::debug!(
                    id,
                    bookmarked = record.bookmarked,
                    revision,
                    changed = outcome == Outcome::Changed,
                    "Bookmark intent applied"
                );
                Ok(RecordUpdate { record, revision })
            }
        }
    }
}

/// Install a loaded collection. Returns whether subscribers should be woken.
///
/// The first load always counts as a change so `loaded_at` gets set, even for
/// an empty collection.
fn commit(snapshot: &mut Snapshot, collection: Collection, load_sequence: u64) -> bool {
    snapshot.load_sequence = load_sequence;
    let reduction = reduce(&snapshot.collection, Intent::Load(collection));
    if reduction.outcome == Outcome::Unchanged && snapshot.loaded_at.is_some() {
        return false;
    }
    snapshot.collection = Arc::new(reduction.collection);
    snapshot.loaded_at = Some(Utc::now());
    snapshot.revision += 1;
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::normalize;
    use crate::models::RawRecord;

    fn collection(ids: &[RecordId]) -> Collection {
        normalize(
            ids.iter()
                .map(|&id| RawRecord {
                    id,
                    login: format!("user{}", id),
                    avatar_url: format!("https://avatars.example.com/{}", id),
                })
                .collect(),
        )
        .unwrap()
    }

    fn bookmarked(store: &BookmarkStore) -> Vec<Record> {
        bookmarked_only(&store.snapshot().collection).cloned().collect()
    }

    #[test]
    fn test_starts_empty() {
        let store = BookmarkStore::new();
        let snapshot = store.snapshot();

        assert_eq!(snapshot.revision, 0);
        assert!(snapshot.collection.is_empty());
        assert!(snapshot.loaded_at.is_none());
        assert!(bookmarked(&store).is_empty());
    }

    #[test]
    fn test_apply_load_then_toggle() {
        let store = BookmarkStore::new();
        let loaded = store.apply_load(collection(&[1, 2]));
        assert_eq!(loaded.revision, 1);
        assert!(loaded.loaded_at.is_some());

        let update = store.set_bookmarked(1, true).unwrap();
        assert!(update.record.bookmarked);
        assert_eq!(update.revision, 2);
        assert_eq!(store.revision(), 2);
        assert_eq!(bookmarked(&store), vec![update.record.clone()]);

        let update = store.toggle(1).unwrap();
        assert!(!update.record.bookmarked);
        assert_eq!(update.revision, 3);
        assert_eq!(store.revision(), 3);
        assert!(bookmarked(&store).is_empty());
    }

    #[test]
    fn test_noop_intent_keeps_revision() {
        let store = BookmarkStore::new();
        store.apply_load(collection(&[1]));

        store.set_bookmarked(1, true).unwrap();
        let revision = store.revision();
        let update = store.set_bookmarked(1, true).unwrap();

        assert!(update.record.bookmarked);
        assert_eq!(update.revision, revision);
        assert_eq!(store.revision(), revision);
    }

    #[test]
    fn test_unknown_id_is_non_fatal() {
        let store = BookmarkStore::new();
        store.apply_load(collection(&[1, 2]));
        let before = store.snapshot();

        assert_eq!(store.toggle(9), Err(AppError::RecordNotFound(9)));
        assert_eq!(
            store.set_bookmarked(9, false),
            Err(AppError::RecordNotFound(9))
        );
        assert_eq!(store.get(9), Err(AppError::RecordNotFound(9)));
        assert_eq!(store.snapshot(), before);
    }

    #[test]
    fn test_stale_load_is_discarded() {
        let store = BookmarkStore::new();
        let first = store.begin_load();
        let second = store.begin_load();
        assert!(second > first);

        let applied = store.commit_load(second, collection(&[2])).unwrap();
        assert_eq!(applied.load_sequence, second.sequence());

        assert!(store.commit_load(first, collection(&[1])).is_none());
        assert_eq!(store.snapshot().collection.len(), 1);
        assert!(store.get(2).is_ok());
        assert!(store.get(1).is_err());
    }

    #[test]
    fn test_in_order_loads_both_apply() {
        let store = BookmarkStore::new();
        let first = store.begin_load();
        assert!(store.commit_load(first, collection(&[1])).is_some());

        let second = store.begin_load();
        let snapshot = store.commit_load(second, collection(&[1, 2, 3])).unwrap();
        assert_eq!(snapshot.collection.len(), 3);
        assert_eq!(snapshot.revision, 2);
    }

    #[test]
    fn test_identical_reload_keeps_revision() {
        let store = BookmarkStore::new();
        let first = store.apply_load(collection(&[1, 2]));
        let rx = store.subscribe();

        let again = store.apply_load(collection(&[1, 2]));
        assert_eq!(again.revision, first.revision);
        assert_eq!(again.loaded_at, first.loaded_at);
        assert!(!rx.has_changed().unwrap());

        let ticket = store.begin_load();
        let committed = store.commit_load(ticket, collection(&[1, 2])).unwrap();
        assert_eq!(committed.revision, first.revision);
        assert_eq!(committed.load_sequence, ticket.sequence());
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn test_first_empty_load_marks_loaded() {
        let store = BookmarkStore::new();
        let snapshot = store.apply_load(Collection::new());

        assert_eq!(snapshot.revision, 1);
        assert!(snapshot.loaded_at.is_some());
    }

    #[test]
    fn test_reload_clears_bookmarks() {
        let store = BookmarkStore::new();
        store.apply_load(collection(&[1, 2]));
        store.toggle(2).unwrap();

        store.apply_load(collection(&[1, 2]));
        assert!(bookmarked(&store).is_empty());
    }

    #[tokio::test]
    async fn test_subscribers_observe_transitions() {
        let store = BookmarkStore::new();
        let mut rx = store.subscribe();
        assert_eq!(rx.borrow_and_update().revision, 0);

        store.apply_load(collection(&[1]));
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().collection.len(), 1);

        store.toggle(1).unwrap();
        rx.changed().await.unwrap();
        let snapshot = rx.borrow_and_update().clone();
        assert_eq!(snapshot.revision, 2);
        assert!(snapshot.collection.get(1).unwrap().bookmarked);

        // Unknown ids do not wake subscribers.
        let _ = store.toggle(42);
        assert!(!rx.has_changed().unwrap());
    }
}
