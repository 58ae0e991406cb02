//! Salary growth projection endpoint

use axum::extract::{Query, State};
use axum::response::Response;
use serde::{Deserialize, Serialize};

use super::DashboardState;
use crate::api::envelope::{ApiErrorResponse, ApiResponse};
use crate::format::format_usd;
use crate::growth::{project, GrowthProjection};

/// Missing parameters fall back to the configured page defaults.
#[derive(Debug, Default, Deserialize)]
pub struct GrowthQuery {
    pub base: Option<f64>,
    pub rate: Option<f64>,
    pub years: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct GrowthResponse {
    #[serde(flatten)]
    pub projection: GrowthProjection,
    pub years: u32,
    pub final_salary: f64,
    pub formatted_final: String,
}

/// GET /api/v1/growth?base=&rate=&years=
pub async fn get_growth(
    State(state): State<DashboardState>,
    Query(q): Query<GrowthQuery>,
) -> Response {
    let growth = &state.config.growth;
    let base = q.base.unwrap_or(growth.default_base);
    let rate = q.rate.unwrap_or(growth.default_rate_percent);
    let years = q.years.unwrap_or(growth.default_years);

    if let Err(msg) = growth.check(base, rate, years) {
        return ApiErrorResponse::bad_request(msg);
    }

    let projection = project(base, rate, years);
    let final_salary = projection.final_salary();
    ApiResponse::ok(GrowthResponse {
        projection,
        years,
        final_salary,
        formatted_final: format_usd(final_salary),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::handlers::tests::test_state;
    use axum::http::StatusCode;

    async fn body_json(resp: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_growth_defaults() {
        let resp = get_growth(State(test_state()), Query(GrowthQuery::default())).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let v = body_json(resp).await;
        let salaries: Vec<f64> = v["data"]["points"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["salary"].as_f64().unwrap())
            .collect();
        assert_eq!(salaries, vec![100.0, 105.0, 110.25, 115.76, 121.55, 127.63]);
        assert_eq!(v["data"]["final_salary"], 127.63);
        assert_eq!(v["data"]["formatted_final"], "$127.63");
    }

    #[tokio::test]
    async fn test_growth_years_out_of_range() {
        let q = GrowthQuery {
            years: Some(40),
            ..GrowthQuery::default()
        };
        let resp = get_growth(State(test_state()), Query(q)).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_growth_negative_base() {
        let q = GrowthQuery {
            base: Some(-10.0),
            ..GrowthQuery::default()
        };
        let resp = get_growth(State(test_state()), Query(q)).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_growth_huge_base_rejected() {
        let q = GrowthQuery {
            base: Some(1e300),
            rate: Some(20.0),
            years: Some(10),
        };
        let resp = get_growth(State(test_state()), Query(q)).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let v = body_json(resp).await;
        assert_eq!(v["error"]["code"], "BAD_REQUEST");
    }
}
