use std::time::Duration;

use allergy_agents_core::domain::{
    common::entities::app_errors::CoreError,
    food_analysis::entities::{AnalysisRequest, AnalysisResult},
    session::ports::AnalysisGateway,
};
use reqwest::{Client, StatusCode};
use serde::Serialize;
use tracing::error;
use url::Url;

use crate::application::http::server::api_entities::api_error::ApiErrorResponse;

/// Sends analysis requests to a running `allergy-agents serve`.
#[derive(Debug, Clone)]
pub struct HttpAnalysisGateway {
    client: Client,
    endpoint: Url,
}

#[derive(Debug, Serialize)]
struct AnalyzePayload<'a> {
    image: &'a str,
    allergies: &'a str,
}

impl HttpAnalysisGateway {
    pub fn new(server_url: &Url, timeout: Duration) -> Result<Self, CoreError> {
        let mut base = server_url.clone();
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let endpoint = base
            .join("api/analyze")
            .map_err(|e| CoreError::InvalidConfiguration(format!("server url: {}", e)))?;

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CoreError::InvalidConfiguration(format!("HTTP client: {}", e)))?;

        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

impl AnalysisGateway for HttpAnalysisGateway {
    async fn submit(&self, request: AnalysisRequest) -> Result<AnalysisResult, CoreError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&AnalyzePayload {
                image: &request.image,
                allergies: &request.allergies,
            })
            .send()
            .await
            .map_err(|e| {
                error!(request_id = %request.id, "Analyze request failed: {}", e);
                CoreError::ExternalServiceError(e.to_string())
            })?;

        let status = response.status();
        if status == StatusCode::BAD_REQUEST {
            return Err(CoreError::MissingRequiredFields);
        }

        if !status.is_success() {
            let message = response
                .json::<ApiErrorResponse>()
                .await
                .map(|body| body.error)
                .unwrap_or_default();
            error!(request_id = %request.id, "Analyze endpoint returned {}: {}", status, message);
            return Err(CoreError::ExternalServiceError(format!(
                "{} {}",
                status, message
            )));
        }

        response.json::<AnalysisResult>().await.map_err(|e| {
            error!(request_id = %request.id, "Unreadable analyze response: {}", e);
            CoreError::SchemaValidation(e.to_string())
        })
    }
}
