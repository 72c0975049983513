use tracing::{Instrument, info, info_span};

use crate::domain::{
    common::{entities::app_errors::CoreError, services::Service},
    food_analysis::{
        encoding::{InlineImage, payload_digest},
        entities::{AnalysisRequest, AnalysisResult},
        ports::{FoodAnalysisService, LLMClient},
        prompts::{
            ANALYSIS_TASK_INSTRUCTION, PROMPT_VERSION, PromptOptions, create_analysis_prompt,
            create_system_message,
        },
        schema::get_analysis_result_schema,
    },
};

impl<LLM> FoodAnalysisService for Service<LLM>
where
    LLM: LLMClient,
{
    async fn analyze(&self, request: AnalysisRequest) -> Result<AnalysisResult, CoreError> {
        // 1. Shape check before anything is built
        if !request.has_required_fields() {
            return Err(CoreError::MissingRequiredFields);
        }

        let span = info_span!(
            "analyze",
            request_id = %request.id,
            prompt_version = PROMPT_VERSION,
            image_len = request.image.len(),
            image_sha256 = %payload_digest(&request.image),
        );

        async move {
            // 2. Encode image
            let image = InlineImage::from_payload(&request.image);

            // 3. Compose instructions
            let (system_instruction, prompt) = if self.inline_system_prompt {
                let prompt = create_analysis_prompt(PromptOptions {
                    user_allergies: &request.allergies,
                    user_message: None,
                });
                (None, prompt)
            } else {
                (
                    Some(create_system_message(&request.allergies)),
                    ANALYSIS_TASK_INSTRUCTION.to_string(),
                )
            };

            // 4. Call LLM
            let raw_response = self
                .llm_client
                .generate_with_image(
                    system_instruction,
                    prompt,
                    image,
                    get_analysis_result_schema(),
                )
                .await?;

            // 5. Validate against the schema
            let result = AnalysisResult::from_model_output(&raw_response).inspect_err(|e| {
                tracing::error!("Invalid analysis response: {}", e);
            })?;

            info!(
                safe = result.safe,
                detected = result.detected_allergens.len(),
                ingredients = result.ingredients.len(),
                "Analysis completed"
            );

            Ok(result)
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use serde_json::json;

    use super::*;

    #[derive(Debug, Clone)]
    struct RecordedCall {
        system_instruction: Option<String>,
        prompt: String,
        image: InlineImage,
        response_schema: serde_json::Value,
    }

    #[derive(Clone)]
    struct StubLLM {
        reply: Result<String, CoreError>,
        calls: Arc<Mutex<Vec<RecordedCall>>>,
    }

    impl StubLLM {
        fn replying(reply: Result<String, CoreError>) -> Self {
            Self {
                reply,
                calls: Arc::new(Mutex::new(Vec::new())),
            }
        }

        fn calls(&self) -> Vec<RecordedCall> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl LLMClient for StubLLM {
        async fn generate_with_image(
            &self,
            system_instruction: Option<String>,
            prompt: String,
            image: InlineImage,
            response_schema: serde_json::Value,
        ) -> Result<String, CoreError> {
            self.calls.lock().unwrap().push(RecordedCall {
                system_instruction,
                prompt,
                image,
                response_schema,
            });
            self.reply.clone()
        }
    }

    fn model_reply() -> String {
        json!({
            "safe": false,
            "food_name": "Trail Mix",
            "food_brand": "Unknown Brand",
            "detected_allergens": ["peanuts"],
            "potential_allergens": [],
            "safe_ingredients": ["raisins"],
            "warning_ingredients": [],
            "unsafe_ingredients": ["peanuts"],
            "ingredients": ["raisins", "peanuts"],
            "analysis": "Contains peanuts."
        })
        .to_string()
    }

    #[tokio::test]
    async fn test_analyze_sends_one_request_with_system_instruction() {
        let llm = StubLLM::replying(Ok(model_reply()));
        let service = Service::new(llm.clone(), false);

        let result = service
            .analyze(AnalysisRequest::new(
                "data:image/png;base64,iVBORw0KGgo=".to_string(),
                "peanuts".to_string(),
            ))
            .await
            .unwrap();

        assert_eq!(result.detected_allergens, vec!["peanuts"]);

        let calls = llm.calls();
        assert_eq!(calls.len(), 1);
        let call = &calls[0];
        assert_eq!(call.image.mime_type, "image/png");
        assert_eq!(call.image.data, "iVBORw0KGgo=");
        assert_eq!(call.prompt, ANALYSIS_TASK_INSTRUCTION);
        assert!(
            call.system_instruction
                .as_deref()
                .unwrap()
                .contains("USER'S ALLERGIES: peanuts")
        );
        assert_eq!(call.response_schema, get_analysis_result_schema());
    }

    #[tokio::test]
    async fn test_analyze_inlines_system_prompt_when_configured() {
        let llm = StubLLM::replying(Ok(model_reply()));
        let service = Service::new(llm.clone(), true);

        service
            .analyze(AnalysisRequest::new("abc".to_string(), "milk".to_string()))
            .await
            .unwrap();

        let call = &llm.calls()[0];
        assert_eq!(call.system_instruction, None);
        assert!(call.prompt.contains("USER'S ALLERGIES: milk"));
        assert!(call.prompt.ends_with(ANALYSIS_TASK_INSTRUCTION));
        assert_eq!(call.image.mime_type, "image/jpeg");
    }

    #[tokio::test]
    async fn test_missing_fields_rejected_before_any_call() {
        let llm = StubLLM::replying(Ok(model_reply()));
        let service = Service::new(llm.clone(), false);

        for (image, allergies) in [("", "peanuts"), ("abc", ""), ("", "")] {
            let err = service
                .analyze(AnalysisRequest::new(image.to_string(), allergies.to_string()))
                .await
                .unwrap_err();
            assert_eq!(err, CoreError::MissingRequiredFields);
        }

        assert!(llm.calls().is_empty());
    }

    #[tokio::test]
    async fn test_schema_violation_fails_the_call() {
        let llm = StubLLM::replying(Ok(json!({ "safe": true }).to_string()));
        let service = Service::new(llm, false);

        let err = service
            .analyze(AnalysisRequest::new("abc".to_string(), "soy".to_string()))
            .await
            .unwrap_err();

        assert!(matches!(err, CoreError::SchemaValidation(_)));
    }

    #[tokio::test]
    async fn test_llm_failure_is_propagated() {
        let llm = StubLLM::replying(Err(CoreError::ExternalServiceError(
            "timed out".to_string(),
        )));
        let service = Service::new(llm, false);

        let err = service
            .analyze(AnalysisRequest::new("abc".to_string(), "soy".to_string()))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            CoreError::ExternalServiceError("timed out".to_string())
        );
    }
}
