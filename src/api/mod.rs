//! HTTP API handlers

use crate::app::api::SiteInfo;
use crate::posts::{PostStore, PostSummary};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tower_http::{compression::CompressionLayer, services::ServeDir, trace::TraceLayer};

/// Where `dx build` puts the client entry module, relative to `public_dir`
pub const DEFAULT_CLIENT_BUNDLE: &str = "/wasm/folio.js";

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<PostStore>,
    pub site_title: Arc<str>,
    /// URL of the client entry module; empty serves static pages only
    pub client_bundle: Arc<str>,
    start_time: Instant,
}

impl AppState {
    pub fn new(posts: PostStore, site_title: impl Into<Arc<str>>) -> Self {
        Self {
            posts: Arc::new(posts),
            site_title: site_title.into(),
            client_bundle: DEFAULT_CLIENT_BUNDLE.into(),
            start_time: Instant::now(),
        }
    }

    pub fn with_client_bundle(mut self, bundle: impl Into<Arc<str>>) -> Self {
        self.client_bundle = bundle.into();
        self
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

/// General status response
#[derive(Serialize)]
pub struct StatusResponse {
    pub service: &'static str,
    pub version: &'static str,
    pub git_sha: &'static str,
    pub uptime_secs: u64,
    pub posts: usize,
}

/// GET /status - Service health check
pub async fn status_handler(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        service: "folio",
        version: env!("FOLIO_VERSION"),
        git_sha: env!("FOLIO_GIT_SHA"),
        uptime_secs: state.start_time.elapsed().as_secs(),
        posts: state.posts.len(),
    })
}

/// GET /api/site - Site title and version for the client app
pub async fn site_handler(State(state): State<AppState>) -> Json<SiteInfo> {
    Json(SiteInfo {
        title: state.site_title.to_string(),
        version: env!("FOLIO_VERSION").to_string(),
    })
}

/// GET /api/posts - Published posts, newest first
pub async fn posts_handler(State(state): State<AppState>) -> Json<Vec<PostSummary>> {
    Json(state.posts.summaries())
}

/// GET /api/posts/{slug} - Single post with rendered HTML
pub async fn post_handler(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> impl IntoResponse {
    match state.posts.get(&slug) {
        Some(post) => (StatusCode::OK, Json(post.clone())).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("Post not found: {}", slug),
            }),
        )
            .into_response(),
    }
}

/// Every route the server answers. Anything unmatched is looked up in
/// `public_dir` (client bundle, audio cues, stylesheet, favicon).
pub fn router(state: AppState, public_dir: &std::path::Path) -> Router {
    Router::new()
        // Health check
        .route("/status", get(status_handler))
        // JSON API
        .route("/api/site", get(site_handler))
        .route("/api/posts", get(posts_handler))
        .route("/api/posts/{slug}", get(post_handler))
        // Server-rendered pages
        .route("/", get(crate::ui::index_page))
        .route("/posts/{slug}", get(crate::ui::post_page))
        .fallback_service(ServeDir::new(public_dir))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
