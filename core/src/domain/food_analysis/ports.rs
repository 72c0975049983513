use std::future::Future;

use crate::domain::{
    common::entities::app_errors::CoreError,
    food_analysis::{
        encoding::InlineImage,
        entities::{AnalysisRequest, AnalysisResult},
    },
};

/// LLM Client trait for calling multimodal models
#[cfg_attr(test, mockall::automock)]
pub trait LLMClient: Send + Sync {
    /// Sends one image with its instructions and returns the raw JSON text
    /// the model produced under `response_schema`.
    fn generate_with_image(
        &self,
        system_instruction: Option<String>,
        prompt: String,
        image: InlineImage,
        response_schema: serde_json::Value,
    ) -> impl Future<Output = Result<String, CoreError>> + Send;
}

/// Service trait for the analysis pipeline
#[cfg_attr(test, mockall::automock)]
pub trait FoodAnalysisService: Send + Sync {
    fn analyze(
        &self,
        request: AnalysisRequest,
    ) -> impl Future<Output = Result<AnalysisResult, CoreError>> + Send;
}
