//! Salary estimation endpoint

use axum::extract::State;
use axum::response::Response;
use serde::Serialize;
use tracing::{debug, error};

use super::DashboardState;
use crate::api::envelope::{ApiErrorResponse, ApiResponse};
use crate::encoder::{EncodeError, FeatureRow, UserSelection};
use crate::format::format_usd;

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub estimate: f64,
    /// Estimate as shown on the page, e.g. `$126,850.00`
    pub formatted: String,
    /// The encoded row the model was given
    pub row: FeatureRow,
}

/// POST /api/v1/predict
pub async fn predict(
    State(state): State<DashboardState>,
    axum::Json(selection): axum::Json<UserSelection>,
) -> Response {
    if let Err(msg) = state.config.inputs.check(&selection) {
        return ApiErrorResponse::bad_request(msg);
    }

    let prediction = match state.model.estimate(&selection) {
        Ok(p) => p,
        Err(e @ EncodeError::UnknownCategory { .. }) => {
            debug!(error = %e, "Rejected prediction request");
            return ApiErrorResponse::unknown_category(e.to_string());
        }
    };

    if !prediction.estimate.is_finite() {
        error!(
            job_title = %selection.job_title,
            job_state = %selection.job_state,
            "Model returned a non-finite estimate"
        );
        return ApiErrorResponse::internal("Model returned a non-finite estimate");
    }

    debug!(
        job_title = %selection.job_title,
        job_state = %selection.job_state,
        estimate = prediction.estimate,
        "Prediction served"
    );

    ApiResponse::ok(PredictResponse {
        estimate: prediction.estimate,
        formatted: format_usd(prediction.estimate),
        row: prediction.row,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::handlers::tests::test_state;
    use crate::encoder::ToolFlags;
    use axum::http::StatusCode;

    fn selection(title: &str, state: &str, rating: f64) -> UserSelection {
        UserSelection {
            job_title: title.to_string(),
            job_state: state.to_string(),
            rating,
            company_age: 5,
            tools: ToolFlags {
                python: true,
                ..ToolFlags::default()
            },
        }
    }

    async fn body_json(resp: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_predict_ok() {
        let resp = predict(
            State(test_state()),
            axum::Json(selection("Engineer", "CA", 4.0)),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);

        let v = body_json(resp).await;
        assert_eq!(v["data"]["estimate"], 90_500.0);
        assert_eq!(v["data"]["formatted"], "$90,500.00");
        assert_eq!(v["data"]["row"]["Job Title_Engineer"], 1.0);
        assert_eq!(v["data"]["row"]["job_state_NY"], 0.0);
    }

    #[tokio::test]
    async fn test_predict_unknown_title() {
        let resp = predict(
            State(test_state()),
            axum::Json(selection("Astronaut", "CA", 4.0)),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let v = body_json(resp).await;
        assert_eq!(v["error"]["code"], "UNKNOWN_CATEGORY");
        assert!(v["error"]["message"].as_str().unwrap().contains("Astronaut"));
    }

    #[tokio::test]
    async fn test_predict_rating_out_of_range() {
        let resp = predict(
            State(test_state()),
            axum::Json(selection("Engineer", "CA", 7.5)),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
