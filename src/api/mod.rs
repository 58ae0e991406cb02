//! REST API module using Axum
//!
//! Provides HTTP endpoints for the salary prediction dashboard:
//! - `/api/v1` JSON API with a consistent envelope
//! - `/health` plain health check
//! - Static dashboard served via `rust-embed` (compiled into the binary)

pub mod envelope;
pub mod handlers;
pub mod middleware;
mod routes;

pub use handlers::DashboardState;

use axum::http::{header, Method, StatusCode, Uri};
use axum::middleware as axum_mw;
use axum::response::{IntoResponse, Response};
use axum::Router;
use rust_embed::Embed;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::config::defaults;

/// Dashboard assets compiled from `dashboard/`.
#[derive(Embed)]
#[folder = "dashboard/"]
struct DashboardAssets;

/// Serve a static asset or fall back to `index.html` for SPA routing.
async fn serve_asset(uri: Uri) -> Response {
    let path = uri.path().trim_start_matches('/');

    // Try exact file match first.
    if let Some(content) = DashboardAssets::get(path) {
        let mime = mime_guess::from_path(path).first_or_octet_stream();
        return (
            StatusCode::OK,
            [(header::CONTENT_TYPE, mime.as_ref())],
            content.data.into_owned(),
        )
            .into_response();
    }

    // SPA fallback: serve index.html for any non-API, non-file path.
    if let Some(index) = DashboardAssets::get("index.html") {
        return (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/html")],
            index.data.into_owned(),
        )
            .into_response();
    }

    (StatusCode::OK, "Salary predictor is running. Dashboard assets were not embedded.").into_response()
}

/// Build a CORS layer that is restrictive by default (same-origin only).
///
/// Set `SALARY_CORS_ORIGINS` to a comma-separated list of allowed origins
/// for development (e.g., `http://localhost:5173`).
fn build_cors_layer() -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    match std::env::var(defaults::CORS_ORIGINS_ENV) {
        Ok(origins) => {
            let allowed: Vec<_> = origins
                .split(',')
                .filter_map(|o| o.trim().parse().ok())
                .collect();
            tracing::info!(origins = %origins, "CORS: allowing configured origins");
            base.allow_origin(allowed)
        }
        // Same-origin only
        Err(_) => base,
    }
}

/// Create the complete application router with API and dashboard serving.
pub fn create_app(state: DashboardState) -> Router {
    let cors = build_cors_layer();

    Router::new()
        .nest(
            "/api/v1",
            routes::api_routes(state.clone()).layer(axum_mw::from_fn_with_state(
                state.clone(),
                middleware::stamp_model_version,
            )),
        )
        // Legacy health endpoint at /health
        .merge(routes::legacy_routes(state))
        // SPA fallback: serves the dashboard or index.html for any unmatched path
        .fallback(serve_asset)
        // Middleware
        .layer(RequestBodyLimitLayer::new(defaults::MAX_REQUEST_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
}
