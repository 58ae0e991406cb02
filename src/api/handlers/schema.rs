//! Form schema endpoint: everything the dashboard needs to build its widgets

use axum::extract::State;
use axum::response::Response;
use serde::Serialize;
use std::collections::BTreeSet;

use super::DashboardState;
use crate::api::envelope::ApiResponse;
use crate::config::{GrowthConfig, InputLimits};
use crate::encoder::ScalarFeature;

#[derive(Debug, Serialize)]
pub struct SchemaResponse<'a> {
    /// Sorted, for the job-title dropdown
    pub job_titles: &'a BTreeSet<String>,
    /// Sorted, for the state dropdown
    pub job_states: &'a BTreeSet<String>,
    /// Scalar inputs the model actually uses
    pub scalar_features: Vec<ScalarFeature>,
    /// Columns the encoder always sets to 0
    pub unassigned_features: Vec<&'a str>,
    pub input_limits: &'a InputLimits,
    pub growth: &'a GrowthConfig,
}

/// GET /api/v1/schema
pub async fn get_schema(State(state): State<DashboardState>) -> Response {
    let schema = state.model.schema();
    let categories = schema.categories();
    ApiResponse::ok(SchemaResponse {
        job_titles: &categories.job_titles,
        job_states: &categories.job_states,
        scalar_features: schema.scalar_features(),
        unassigned_features: schema.unassigned().collect(),
        input_limits: &state.config.inputs,
        growth: &state.config.growth,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::handlers::tests::test_state;

    #[tokio::test]
    async fn test_schema_lists_categories() {
        let resp = get_schema(State(test_state())).await;
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let v: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(v["data"]["job_titles"], serde_json::json!(["Analyst", "Engineer"]));
        assert_eq!(v["data"]["job_states"], serde_json::json!(["CA", "NY"]));
        assert_eq!(
            v["data"]["scalar_features"],
            serde_json::json!(["rating", "company_age", "python"])
        );
        assert_eq!(v["data"]["input_limits"]["rating_max"], 5.0);
        assert_eq!(v["data"]["growth"]["default_years"], 5);
    }
}
