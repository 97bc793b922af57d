//! dpe-survey library - Drum Pattern Evaluation survey service
//!
//! Hosts the listening survey: serves the survey page, tracks per-session
//! rating state, selects random drum pattern samples from the audio catalog,
//! and persists each submission to object storage.

use axum::Router;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

pub mod api;
pub mod catalog;
pub mod error;
pub mod ipinfo;
pub mod record;
pub mod selector;
pub mod session;
pub mod storage;
pub mod survey;

pub use error::{Error, Result};

use catalog::Catalog;
use session::Session;
use storage::StorageClient;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Per-browser-session survey state, keyed by session id
    pub sessions: Arc<RwLock<HashMap<Uuid, Session>>>,
    /// Read-only audio catalog, scanned once at startup
    pub catalog: Arc<Catalog>,
    /// Object storage writer for submission records
    pub storage: Arc<StorageClient>,
}

impl AppState {
    /// Create new application state
    pub fn new(catalog: Catalog, storage: StorageClient) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            catalog: Arc::new(catalog),
            storage: Arc::new(storage),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post, put};

    Router::new()
        .route("/", get(api::serve_index))
        .route("/static/app.js", get(api::serve_app_js))
        .merge(api::health_routes())
        .route("/api/session", post(api::create_session))
        .route("/api/session/:id", get(api::get_session))
        .route("/api/session/:id/reviewer", put(api::update_reviewer))
        .route("/api/session/:id/select", post(api::select_option))
        .route("/api/session/:id/genre", post(api::set_genre))
        .route("/api/session/:id/submit", post(api::submit))
        .route("/api/session/:id/next", post(api::next_sample))
        .route("/api/session/:id/audio", get(api::get_audio))
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state)
}
