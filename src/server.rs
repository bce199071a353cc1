use std::path::Path;

use axum::{
    Json, Router,
    extract::{Path as UrlPath, State},
    response::Html,
    routing::get,
};
use serde::Serialize;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::share::{ShareError, ShareStore, ShareView};

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn load_view<S: ShareStore>(store: &S, token: &str) -> Result<ShareView, ShareError> {
    let shared = store
        .project_by_token(token)
        .await?
        .ok_or(ShareError::NotFound)?;
    Ok(ShareView::build(shared))
}

async fn share_page<S: ShareStore>(
    State(store): State<S>,
    UrlPath(token): UrlPath<String>,
) -> Result<Html<String>, ShareError> {
    let view = load_view(&store, &token).await?;
    Ok(Html(view.render_html()))
}

async fn share_json<S: ShareStore>(
    State(store): State<S>,
    UrlPath(token): UrlPath<String>,
) -> Result<Json<ShareView>, ShareError> {
    Ok(Json(load_view(&store, &token).await?))
}

/// Routes of the read-only share server
pub fn share_router<S: ShareStore>(store: S, upload_dir: impl AsRef<Path>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/share/{token}", get(share_page::<S>))
        .route("/api/share/{token}", get(share_json::<S>))
        .nest_service("/files", ServeDir::new(upload_dir.as_ref()))
        .layer(TraceLayer::new_for_http())
        .with_state(store)
}

/// Binds `addr` and serves until the process is stopped
pub async fn serve<S: ShareStore>(store: S, upload_dir: &str, addr: &str) -> anyhow::Result<()> {
    let app = share_router(store, upload_dir);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Share server listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
