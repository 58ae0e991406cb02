//! Salary-by-state endpoint for the map view

use axum::extract::State;
use axum::response::Response;

use super::DashboardState;
use crate::api::envelope::ApiResponse;
use crate::regional::summarize;

/// GET /api/v1/regional/salaries
pub async fn regional_salaries(State(state): State<DashboardState>) -> Response {
    ApiResponse::ok(summarize(&state.config.regional.states))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::handlers::tests::test_state;

    #[tokio::test]
    async fn test_default_sample() {
        let resp = regional_salaries(State(test_state())).await;
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let v: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(v["data"]["states"].as_array().unwrap().len(), 5);
        assert_eq!(v["data"]["min_salary"], 100_000.0);
        assert_eq!(v["data"]["max_salary"], 130_000.0);
    }
}
