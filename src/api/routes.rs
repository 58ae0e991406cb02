//! API route definitions
//!
//! Organizes endpoints for the salary dashboard:
//! - /api/v1/system/health - Service and model status
//! - /api/v1/schema - Dropdown options and input limits
//! - /api/v1/predict - Salary estimate for a form selection
//! - /api/v1/growth - Compounding growth projection
//! - /api/v1/regional/salaries - State salary sample for the map

use axum::http::Uri;
use axum::response::Response;
use axum::{routing::{get, post}, Router};

use super::envelope::ApiErrorResponse;
use super::handlers::{self, DashboardState};

/// Create all API routes for the dashboard
pub fn api_routes(state: DashboardState) -> Router {
    Router::new()
        .route("/system/health", get(handlers::system_health))
        .route("/schema", get(handlers::get_schema))
        .route("/predict", post(handlers::predict))
        .route("/growth", get(handlers::get_growth))
        .route("/regional/salaries", get(handlers::regional_salaries))
        // Unknown API paths get a JSON 404 instead of the dashboard
        .fallback(api_not_found)
        .with_state(state)
}

/// Legacy health endpoint at root level
pub fn legacy_routes(state: DashboardState) -> Router {
    Router::new()
        .route("/health", get(handlers::legacy_health_check))
        .with_state(state)
}

async fn api_not_found(uri: Uri) -> Response {
    ApiErrorResponse::not_found(format!("No API endpoint at {}", uri.path()))
}
