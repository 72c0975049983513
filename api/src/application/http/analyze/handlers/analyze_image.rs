use allergy_agents_core::domain::{
    common::entities::app_errors::CoreError,
    food_analysis::{
        entities::{AnalysisRequest, AnalysisResult},
        ports::FoodAnalysisService,
    },
};
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use tracing::{debug, error};
use validator::Validate;

use crate::application::http::{
    analyze::validators::AnalyzeRequestBody,
    server::{
        api_entities::{
            api_error::{ApiError, ApiErrorResponse},
            response::Response,
        },
        app_state::AppState,
    },
};

#[utoipa::path(
    post,
    path = "/analyze",
    tag = "analyze",
    summary = "Analyze a food label photo",
    description = "Reads the ingredient label in the image and checks it against the given allergies",
    request_body = AnalyzeRequestBody,
    responses(
        (status = 200, body = AnalysisResult),
        (status = 400, body = ApiErrorResponse, description = "Image and allergies are required"),
        (status = 413, body = ApiErrorResponse, description = "Image too large"),
        (status = 500, body = ApiErrorResponse, description = "Failed to analyze image"),
    ),
)]
pub async fn analyze_image(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeRequestBody>, JsonRejection>,
) -> Result<Response<AnalysisResult>, ApiError> {
    let Json(body) = payload.map_err(|rejection| {
        debug!("Rejected analyze body: {}", rejection.body_text());

        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge(format!(
                "Image too large. Max size is {} bytes",
                state.site.limits.max_image_bytes
            ))
        } else {
            ApiError::from(CoreError::MissingRequiredFields)
        }
    })?;

    body.validate()
        .map_err(|_| ApiError::from(CoreError::MissingRequiredFields))?;

    let request = AnalysisRequest::new(
        body.image.unwrap_or_default(),
        body.allergies.unwrap_or_default(),
    );

    let result = state.service.analyze(request).await.map_err(|e| {
        error!("Error analyzing image: {}", e);
        ApiError::from(e)
    })?;

    Ok(Response::OK(result))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::{Value, json};

    use crate::application::http::test::{fake_gemini, gemini_reply, sample_analysis, test_server};

    const IMAGE: &str = "data:image/png;base64,iVBORw0KGgo=";

    #[tokio::test]
    async fn test_missing_fields_return_400() {
        let server = test_server("http://127.0.0.1:9");

        for body in [
            json!({ "allergies": "peanuts" }),
            json!({ "image": IMAGE }),
            json!({ "image": "", "allergies": "peanuts" }),
            json!({ "image": IMAGE, "allergies": "" }),
            json!({ "image": 42, "allergies": "peanuts" }),
            json!([]),
        ] {
            let response = server.post("/api/analyze").json(&body).await;
            response.assert_status(StatusCode::BAD_REQUEST);
            response.assert_json(&json!({ "error": "Image and allergies are required" }));
        }
    }

    #[tokio::test]
    async fn test_oversized_body_returns_413() {
        let server = test_server("http://127.0.0.1:9");
        let image = format!("data:image/png;base64,{}", "A".repeat(15 * 1024 * 1024));

        let response = server
            .post("/api/analyze")
            .json(&json!({ "image": image, "allergies": "peanuts" }))
            .await;

        response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
        response.assert_json(&json!({
            "error": format!("Image too large. Max size is {} bytes", 10 * 1024 * 1024)
        }));
    }

    #[tokio::test]
    async fn test_non_json_body_returns_400() {
        let server = test_server("http://127.0.0.1:9");

        let response = server.post("/api/analyze").text("image=x").await;
        response.assert_status(StatusCode::BAD_REQUEST);
        response.assert_json(&json!({ "error": "Image and allergies are required" }));
    }

    #[tokio::test]
    async fn test_model_failure_returns_500() {
        let (base_url, _) =
            fake_gemini(StatusCode::SERVICE_UNAVAILABLE, json!({ "error": "overloaded" })).await;
        let server = test_server(&base_url);

        let response = server
            .post("/api/analyze")
            .json(&json!({ "image": IMAGE, "allergies": "peanuts" }))
            .await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        response.assert_json(&json!({ "error": "Failed to analyze image" }));
    }

    #[tokio::test]
    async fn test_incomplete_model_output_returns_500() {
        let mut analysis = sample_analysis();
        analysis.as_object_mut().unwrap().remove("food_brand");
        let (base_url, _) = fake_gemini(StatusCode::OK, gemini_reply(&analysis)).await;
        let server = test_server(&base_url);

        let response = server
            .post("/api/analyze")
            .json(&json!({ "image": IMAGE, "allergies": "peanuts" }))
            .await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        response.assert_json(&json!({ "error": "Failed to analyze image" }));
    }

    #[tokio::test]
    async fn test_analyze_returns_model_result() {
        let (base_url, seen) = fake_gemini(StatusCode::OK, gemini_reply(&sample_analysis())).await;
        let server = test_server(&base_url);

        let response = server
            .post("/api/analyze")
            .json(&json!({ "image": IMAGE, "allergies": "peanuts" }))
            .await;

        response.assert_status_ok();
        response.assert_json(&sample_analysis());

        let requests = seen.lock().unwrap();
        assert_eq!(requests.len(), 1);

        let parts = &requests[0]["contents"][0]["parts"];
        let inline = parts
            .as_array()
            .unwrap()
            .iter()
            .find_map(|part| part.get("inline_data"))
            .unwrap();
        assert_eq!(inline["mime_type"], "image/png");
        assert_eq!(inline["data"], "iVBORw0KGgo=");

        let system: &Value = &requests[0]["system_instruction"]["parts"][0]["text"];
        assert!(system.as_str().unwrap().contains("USER'S ALLERGIES: peanuts"));
    }
}
