//! API middleware layers.
//!
//! Stamps every API response with the version of the loaded model so a
//! client can tell which artifact produced an estimate.

use axum::extract::State;
use axum::http::header::HeaderName;
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::Response;
use tracing::warn;

use super::handlers::DashboardState;

pub const MODEL_VERSION_HEADER: &str = "x-model-version";

/// Axum middleware that adds `x-model-version: <artifact version>`.
pub async fn stamp_model_version(
    State(state): State<DashboardState>,
    request: axum::extract::Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;

    match HeaderValue::from_str(state.model.version()) {
        Ok(value) => {
            response
                .headers_mut()
                .insert(HeaderName::from_static(MODEL_VERSION_HEADER), value);
        }
        Err(_) => {
            warn!(version = %state.model.version(), "Model version is not a valid header value");
        }
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::handlers::tests::test_state;
    use axum::body::Body;
    use axum::http::Request;
    use axum::middleware;
    use axum::routing::get;
    use axum::Router;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_model_version_header_present() {
        let state = test_state();
        let app = Router::new()
            .route("/test", get(|| async { "ok" }))
            .layer(middleware::from_fn_with_state(state, stamp_model_version));

        let resp = app
            .oneshot(Request::get("/test").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(resp.headers().get(MODEL_VERSION_HEADER).unwrap(), "test-v1");
    }
}
