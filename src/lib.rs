//! Bookmark Backend
//!
//! Loads a remote user collection once, keeps per-record bookmark state in memory and serves it
//! to views over REST and server-sent events.

pub mod api;
pub mod config;
pub mod disclosure;
pub mod errors;
pub mod loader;
pub mod models;
pub mod store;

use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use config::Config;
use disclosure::DisclosureRegistry;
use errors::AppError;
use loader::CollectionLoader;
use store::{BookmarkStore, Snapshot};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<BookmarkStore>,
    pub loader: Arc<CollectionLoader>,
    pub groups: Arc<DisclosureRegistry>,
}

impl AppState {
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let loader = CollectionLoader::new(config)?;
        let groups = DisclosureRegistry::from_specs(&config.groups);

        Ok(Self {
            store: Arc::new(BookmarkStore::new()),
            loader: Arc::new(loader),
            groups: Arc::new(groups),
        })
    }

    /// Fetch the collection and commit it to the store.
    ///
    /// If a newer refresh lands first, this one is discarded and the current
    /// snapshot is returned.
    pub async fn refresh(&self) -> Result<Snapshot, AppError> {
        let ticket = self.store.begin_load();
        tracing::debug!(load = ticket.sequence(), "Refreshing collection");
        let collection = self.loader.load().await?;

        Ok(self
            .store
            .commit_load(ticket, collection)
            .unwrap_or_else(|| self.store.snapshot()))
    }
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        // Records and bookmarks
        .route("/records", get(api::list_records))
        .route("/records/{id}", get(api::get_record))
        .route("/records/{id}/toggle", post(api::toggle_record))
        .route(
            "/records/{id}/bookmark",
            put(api::bookmark_record).delete(api::unbookmark_record),
        )
        .route("/bookmarks", get(api::list_bookmarks))
        // Store state
        .route("/snapshot", get(api::get_snapshot))
        .route("/refresh", post(api::refresh_collection))
        .route("/events", get(api::stream_events))
        // Disclosure groups
        .route("/groups", get(api::list_groups))
        .route("/groups/{name}", get(api::get_group))
        .route("/groups/{name}/activate/{index}", post(api::activate_item))
        .route("/groups/{name}/open/{index}", post(api::open_item))
        .route("/groups/{name}/close/{index}", post(api::close_item))
        .route("/groups/{name}/dismiss", post(api::dismiss_group));

    // Health check
    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
