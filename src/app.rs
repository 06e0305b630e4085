use std::{net::SocketAddr, path::Path};

use axum::{routing::get, Json, Router};
use serde_json::{json, Value};
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
use tracing::info;

use crate::error::ApiError;
use crate::state::AppState;
use crate::{permits, users};

pub fn build_app(state: AppState) -> Router {
    // `/api` keeps its own fallback so API paths never reach the frontend
    let api = Router::new()
        .merge(permits::router())
        .merge(users::router())
        .fallback(not_found);

    let router = Router::new()
        .route("/health", get(health))
        .nest("/api", api);

    with_frontend(router, &state.config.static_dir)
        .with_state(state)
        // allows every origin; restrict before exposing this beyond a trusted network
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    tracing::info_span!(
                        "http_request",
                        %method,
                        uri = %uri,
                        status = tracing::field::Empty
                    )
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     _latency: std::time::Duration,
                     span: &tracing::Span| {
                        let status = res.status();
                        span.record("status", tracing::field::display(status));
                        if status.is_server_error() {
                            tracing::error!(%status, "response");
                        } else {
                            tracing::info!(%status, "response");
                        }
                    },
                ),
        )
}

/// Serves the prebuilt bundle when `static_dir/index.html` exists: files
/// under `/static`, and any other unmatched path as a file or `index.html`.
fn with_frontend(router: Router<AppState>, static_dir: &Path) -> Router<AppState> {
    let index = static_dir.join("index.html");
    if !index.is_file() {
        info!(path = %static_dir.display(), "frontend bundle not found, static serving disabled");
        return router.fallback(not_found);
    }

    info!(path = %static_dir.display(), "serving frontend bundle");
    router
        .nest_service("/static", ServeDir::new(static_dir))
        .fallback_service(ServeDir::new(static_dir).fallback(ServeFile::new(index)))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn not_found() -> ApiError {
    ApiError::NotFound("Not Found")
}

pub async fn serve(app: Router, addr: SocketAddr) -> anyhow::Result<()> {
    info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
