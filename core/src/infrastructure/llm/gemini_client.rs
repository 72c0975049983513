use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::domain::{
    common::{LLMConfig, entities::app_errors::CoreError},
    food_analysis::{encoding::InlineImage, ports::LLMClient},
};

#[derive(Debug, Clone)]
pub struct GeminiLLMClient {
    api_key: String,
    model_name: String,
    base_url: String,
    client: Client,
}

#[derive(Debug, Serialize)]
struct GeminiRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part {
    Text { text: String },
    InlineData { inline_data: InlineData },
}

#[derive(Debug, Serialize)]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    response_mime_type: String,
    response_schema: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<ContentResponse>,
}

#[derive(Debug, Deserialize)]
struct ContentResponse {
    #[serde(default)]
    parts: Vec<PartResponse>,
}

#[derive(Debug, Deserialize)]
struct PartResponse {
    text: Option<String>,
}

impl GeminiLLMClient {
    pub fn new(config: &LLMConfig) -> Result<Self, CoreError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| CoreError::InvalidConfiguration(format!("HTTP client: {}", e)))?;

        Ok(Self {
            api_key: config.gemini_api_key.clone(),
            model_name: config.gemini_model.clone(),
            base_url: config.gemini_base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    async fn call_gemini_api(&self, request: GeminiRequest) -> Result<String, CoreError> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.base_url, self.model_name
        );

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Gemini API request failed: {}", e);
                CoreError::ExternalServiceError(format!("LLM API error: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!("Gemini API error: {} - {}", status, error_text);
            return Err(CoreError::ExternalServiceError(format!(
                "LLM API returned error: {} - {}",
                status, error_text
            )));
        }

        let gemini_response: GeminiResponse = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse Gemini response: {}", e);
            CoreError::ExternalServiceError(format!("Failed to parse LLM response: {}", e))
        })?;

        gemini_response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().find_map(|p| p.text))
            .ok_or_else(|| {
                tracing::error!("Gemini API returned no candidate text");
                CoreError::ExternalServiceError("No response from LLM".to_string())
            })
    }
}

impl LLMClient for GeminiLLMClient {
    async fn generate_with_image(
        &self,
        system_instruction: Option<String>,
        prompt: String,
        image: InlineImage,
        response_schema: serde_json::Value,
    ) -> Result<String, CoreError> {
        let request = GeminiRequest {
            system_instruction: system_instruction.map(|text| Content {
                role: None,
                parts: vec![Part::Text { text }],
            }),
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![
                    Part::Text { text: prompt },
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: image.mime_type,
                            data: image.data,
                        },
                    },
                ],
            }],
            generation_config: Some(GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema,
            }),
        };

        self.call_gemini_api(request).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use axum::{
        Json, Router,
        extract::{Path, State},
        http::{HeaderMap, StatusCode},
        routing::post,
    };
    use serde_json::{Value, json};

    use super::*;

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<(String, Option<String>, Value)>>>);

    async fn fake_gemini(status: StatusCode, reply: Value) -> (String, Captured) {
        let captured = Captured::default();

        let app = Router::new()
            .route(
                "/v1beta/models/{model}",
                post(
                    move |State(captured): State<Captured>,
                          Path(model): Path<String>,
                          headers: HeaderMap,
                          Json(body): Json<Value>| {
                        let reply = reply.clone();
                        async move {
                            let key = headers
                                .get("x-goog-api-key")
                                .and_then(|v| v.to_str().ok())
                                .map(|s| s.to_string());
                            captured.0.lock().unwrap().push((model, key, body));
                            (status, Json(reply))
                        }
                    },
                ),
            )
            .with_state(captured.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{}/v1beta", addr), captured)
    }

    fn client(base_url: String) -> GeminiLLMClient {
        GeminiLLMClient::new(&LLMConfig {
            gemini_api_key: "test-key".to_string(),
            gemini_model: "gemini-test".to_string(),
            gemini_base_url: base_url,
            request_timeout: Duration::from_secs(5),
            inline_system_prompt: false,
        })
        .unwrap()
    }

    fn image() -> InlineImage {
        InlineImage {
            mime_type: "image/png".to_string(),
            data: "iVBORw0KGgo=".to_string(),
        }
    }

    #[tokio::test]
    async fn test_generate_with_image_builds_gemini_request() {
        let reply = json!({
            "candidates": [{ "content": { "parts": [{ "text": "{\"safe\":true}" }] } }]
        });
        let (base_url, captured) = fake_gemini(StatusCode::OK, reply).await;

        let text = client(base_url)
            .generate_with_image(
                Some("system text".to_string()),
                "task text".to_string(),
                image(),
                json!({ "type": "object" }),
            )
            .await
            .unwrap();

        assert_eq!(text, "{\"safe\":true}");

        let calls = captured.0.lock().unwrap();
        let (model, key, body) = &calls[0];
        assert_eq!(model, "gemini-test:generateContent");
        assert_eq!(key.as_deref(), Some("test-key"));
        assert_eq!(
            body["system_instruction"]["parts"][0]["text"],
            "system text"
        );
        assert_eq!(body["contents"][0]["parts"][0]["text"], "task text");
        assert_eq!(
            body["contents"][0]["parts"][1]["inline_data"],
            json!({ "mime_type": "image/png", "data": "iVBORw0KGgo=" })
        );
        assert_eq!(
            body["generation_config"]["response_mime_type"],
            "application/json"
        );
    }

    #[tokio::test]
    async fn test_system_instruction_is_omitted_when_absent() {
        let reply = json!({
            "candidates": [{ "content": { "parts": [{ "text": "{}" }] } }]
        });
        let (base_url, captured) = fake_gemini(StatusCode::OK, reply).await;

        client(base_url)
            .generate_with_image(None, "task".to_string(), image(), json!({}))
            .await
            .unwrap();

        let calls = captured.0.lock().unwrap();
        assert!(calls[0].2.get("system_instruction").is_none());
    }

    #[tokio::test]
    async fn test_error_status_becomes_external_service_error() {
        let (base_url, _) = fake_gemini(
            StatusCode::TOO_MANY_REQUESTS,
            json!({ "error": { "message": "quota" } }),
        )
        .await;

        let err = client(base_url)
            .generate_with_image(None, "task".to_string(), image(), json!({}))
            .await
            .unwrap_err();

        assert!(matches!(err, CoreError::ExternalServiceError(msg) if msg.contains("429")));
    }

    #[tokio::test]
    async fn test_empty_candidates_is_an_error() {
        let (base_url, _) = fake_gemini(StatusCode::OK, json!({ "candidates": [] })).await;

        let err = client(base_url)
            .generate_with_image(None, "task".to_string(), image(), json!({}))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            CoreError::ExternalServiceError("No response from LLM".to_string())
        );
    }
}
