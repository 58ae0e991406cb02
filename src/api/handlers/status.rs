//! Service health endpoints

use axum::extract::State;
use axum::response::Response;
use axum::Json;
use serde::Serialize;

use super::DashboardState;
use crate::api::envelope::ApiResponse;

// ============================================================================
// System Health
// ============================================================================

#[derive(Debug, Serialize)]
pub struct SystemHealth {
    pub status: &'static str,
    pub service_version: &'static str,
    pub model_version: String,
    /// Name of the column the model was trained to predict, if recorded
    pub model_target: Option<String>,
    pub feature_count: usize,
    pub job_title_count: usize,
    pub job_state_count: usize,
    pub uptime_secs: u64,
}

/// GET /api/v1/system/health
pub async fn system_health(State(state): State<DashboardState>) -> Response {
    let model = &state.model;
    let categories = model.categories();
    ApiResponse::ok(SystemHealth {
        status: "ok",
        service_version: env!("CARGO_PKG_VERSION"),
        model_version: model.version().to_string(),
        model_target: model.target().map(str::to_string),
        feature_count: model.schema().len(),
        job_title_count: categories.job_titles.len(),
        job_state_count: categories.job_states.len(),
        uptime_secs: state.uptime_secs(),
    })
}

// ============================================================================
// Legacy Health Check
// ============================================================================

/// Plain health check for load balancers
#[derive(Debug, Serialize)]
pub struct LegacyHealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
}

/// GET /health
pub async fn legacy_health_check(
    State(state): State<DashboardState>,
) -> Json<LegacyHealthResponse> {
    Json(LegacyHealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.uptime_secs(),
    })
}
