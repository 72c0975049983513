use std::future::Future;

use crate::domain::{
    common::{entities::app_errors::CoreError, services::Service},
    food_analysis::{
        entities::{AnalysisRequest, AnalysisResult},
        ports::{FoodAnalysisService, LLMClient},
    },
};

/// Whatever answers an analysis request for a session: the remote HTTP
/// endpoint, or the pipeline in-process.
#[cfg_attr(test, mockall::automock)]
pub trait AnalysisGateway: Send + Sync {
    fn submit(
        &self,
        request: AnalysisRequest,
    ) -> impl Future<Output = Result<AnalysisResult, CoreError>> + Send;
}

impl<LLM> AnalysisGateway for Service<LLM>
where
    LLM: LLMClient,
{
    async fn submit(&self, request: AnalysisRequest) -> Result<AnalysisResult, CoreError> {
        self.analyze(request).await
    }
}
